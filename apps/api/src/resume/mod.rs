// Resume pipeline: PDF text extraction → AI analysis → structured result,
// plus the optimization pass and per-user form drafts.
// All LLM calls go through llm_client; no direct provider calls here.

pub mod analyzer;
pub mod draft;
pub mod handlers;
pub mod optimizer;
pub mod pdf;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resume::pdf::ExtractError;

#[derive(Debug, Error)]
pub enum ResumeError {
    /// A required input was absent or blank. Raised before any network call.
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("Extracted text is too short to analyze ({found} characters, need at least {minimum})")]
    InsufficientContent { found: usize, minimum: usize },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Returns the trimmed value, or `None` when the input is absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
