// Free-form generation endpoints: resume builder, prompt engineer, summarizer, content writer.
// Each is a single completion call that returns the model's text as-is.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error(transparent)]
    Llm(#[from] LlmError),
}
