use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Corpus error: {message}")]
    Corpus { message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, RiskmapError>;
