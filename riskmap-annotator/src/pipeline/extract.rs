use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use riskmap_core::common::error::{Result, RiskmapError};

use crate::observability::metrics;

/// Text pulled from a PDF, page texts joined with newlines.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// Extract the embedded text layer of a PDF file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn extract_text_from_pdf<P: AsRef<Path>>(path: P) -> Result<ExtractedText> {
    let bytes = fs::read(path.as_ref())?;
    extract_text_from_bytes(&bytes)
}

/// Extract the embedded text layer of an in-memory PDF.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<ExtractedText> {
    let start = std::time::Instant::now();
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| RiskmapError::Pdf(e.to_string()))?;

    let page_count = pages.len();
    let text = pages.join("\n");

    debug!("Extracted {} pages, {} bytes of text", page_count, text.len());
    metrics::extract::pages_extracted(page_count);
    metrics::extract::duration(start.elapsed().as_secs_f64());

    Ok(ExtractedText { text, page_count })
}
