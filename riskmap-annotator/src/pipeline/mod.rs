pub mod annotate;
pub mod config;
pub mod extract;
pub mod segment;
pub mod similarity;

pub use annotate::Annotator;
pub use config::AnnotateConfig;
