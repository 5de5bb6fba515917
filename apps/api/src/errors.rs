use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat::ConversationError;
use crate::generation::GenerationError;
use crate::llm_client::LlmError;
use crate::resume::pdf::ExtractError;
use crate::resume::ResumeError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    InsufficientContent(String),

    #[error("{0}")]
    UnreadableDocument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream AI provider failure (non-2xx or unreachable). Carries the provider's text.
    #[error("AI provider error: {0}")]
    Provider(String),

    /// The provider could not be reached or the exchange broke off (timeout, DNS, TLS).
    #[error("Could not reach the AI provider: {0}")]
    Transport(String),

    #[error("The AI returned an empty response. Please try again.")]
    EmptyResponse,

    #[error("The AI response could not be understood. Please try again. ({0})")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::MissingInput(_) => (StatusCode::BAD_REQUEST, "MISSING_INPUT"),
            AppError::InsufficientContent(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_CONTENT")
            }
            AppError::UnreadableDocument(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNREADABLE_DOCUMENT")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR"),
            AppError::Transport(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TRANSPORT_ERROR"),
            AppError::EmptyResponse => (StatusCode::INTERNAL_SERVER_ERROR, "EMPTY_RESPONSE"),
            AppError::MalformedResponse(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_AI_RESPONSE")
            }
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message. Internal errors are logged and replaced with a generic text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Provider(_)
            | AppError::Transport(_)
            | AppError::MalformedResponse(_)
            | AppError::Storage(_) => {
                tracing::error!("{self}");
                self.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": self.public_message(),
            "code": code
        }));

        (status, body).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Provider { status, body } => {
                AppError::Provider(format!("status {status}: {body}"))
            }
            LlmError::Transport(e) => AppError::Transport(e.to_string()),
            LlmError::EmptyResponse => AppError::EmptyResponse,
            LlmError::MalformedResponse(detail) => AppError::MalformedResponse(detail),
        }
    }
}

impl From<ResumeError> for AppError {
    fn from(err: ResumeError) -> Self {
        match err {
            ResumeError::MissingInput(_) => AppError::MissingInput(err.to_string()),
            ResumeError::InsufficientContent { .. } => AppError::InsufficientContent(format!(
                "{err}. Scanned or image-only PDFs are not supported."
            )),
            ResumeError::Extract(ExtractError::Unreadable(msg)) => {
                AppError::UnreadableDocument(format!("Could not read PDF: {msg}"))
            }
            ResumeError::Llm(e) => e.into(),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingInput(_) => AppError::MissingInput(err.to_string()),
            GenerationError::Llm(e) => e.into(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<ConversationError> for AppError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound(id) => AppError::NotFound(format!("Conversation {id}")),
            ConversationError::EmptyMessage => AppError::Validation(err.to_string()),
            ConversationError::Llm(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", rejection.body_text()))
    }
}
