//! Main library crate for the riskmap annotator

// Re-export the main modules needed for integration tests
pub mod classify;
pub mod matchers;
pub mod observability;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use riskmap_core::domain::{AnnotatedRisk, AnnotationReport, StrideCategory};
