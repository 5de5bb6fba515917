// Chat: per-user conversation store, its persistence seam, and the send-message flow.
// Conversations are persisted as one JSON list per user, rewritten on every mutation.

pub mod handlers;
pub mod prompts;
pub mod repository;
pub mod sequencer;
pub mod service;
pub mod store;

use thiserror::Error;
use uuid::Uuid;

use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Conversation {0} not found")]
    NotFound(Uuid),

    #[error("Message content cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    Llm(#[from] LlmError),
}
