pub mod attack;
pub mod iso;
pub mod stride;
