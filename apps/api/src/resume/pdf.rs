//! PDF text extraction for uploaded resumes.
//!
//! Each page's text items are joined with single spaces, pages with newlines, and the
//! result is trimmed. Parsing is CPU-bound and runs on the blocking pool.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::resume::ResumeError;

/// Below this many characters the extracted text is treated as unusable
/// (image-only scans, empty documents) and analysis is refused.
pub const MIN_RESUME_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not read PDF: {0}")]
    Unreadable(String),
}

/// Extracts the visible text of a PDF document.
pub async fn extract_text(pdf_bytes: Bytes) -> Result<String, ExtractError> {
    let size = pdf_bytes.len();
    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&pdf_bytes)
    })
    .await
    .map_err(|e| {
        // pdf-extract panics on some malformed inputs; the join error carries it.
        warn!("PDF parser aborted: {e}");
        ExtractError::Unreadable("the PDF parser aborted on this document".to_string())
    })?
    .map_err(|e| ExtractError::Unreadable(e.to_string()))?;

    let text = join_pages(&pages);
    debug!(
        "Extracted {} characters from {} page(s) ({} bytes)",
        text.chars().count(),
        pages.len(),
        size
    );
    Ok(text)
}

/// Collapses whitespace inside each page, joins pages with `\n`, and trims.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Fails with `InsufficientContent` when `text` is shorter than `MIN_RESUME_CHARS`.
pub fn ensure_sufficient_content(text: &str) -> Result<(), ResumeError> {
    let found = text.trim().chars().count();
    if found < MIN_RESUME_CHARS {
        return Err(ResumeError::InsufficientContent {
            found,
            minimum: MIN_RESUME_CHARS,
        });
    }
    Ok(())
}
