//! Shared domain types and reference corpora for the riskmap annotator

pub mod common;
pub mod corpus;
pub mod domain;

pub use domain::*;
