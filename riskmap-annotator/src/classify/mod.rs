pub mod stride;

pub use stride::StrideClassifier;
