//! Résumé text extraction for uploaded files.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("PDF reading error: {0}")]
    Pdf(String),

    #[error("PDF extraction aborted: {0}")]
    Aborted(String),
}

pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Extracts plain text from an uploaded résumé.
///
/// PDFs go through `pdf-extract` on the blocking pool; anything else is read as UTF-8 text.
/// The result is trimmed and may be empty.
pub async fn extract_resume_text(data: Bytes) -> Result<String, ResumeError> {
    if !is_pdf(&data) {
        debug!("Upload is not a PDF, reading {} bytes as text", data.len());
        return Ok(String::from_utf8_lossy(&data).trim().to_string());
    }

    // pdf-extract panics on some malformed documents; the join error carries that out.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| ResumeError::Aborted(e.to_string()))?
        .map_err(|e| ResumeError::Pdf(e.to_string()))?;

    Ok(text.trim().to_string())
}
