pub mod attack;
pub mod iso;

pub use attack::TechniqueMatcher;
pub use iso::ControlMatcher;
