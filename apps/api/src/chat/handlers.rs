//! Axum route handlers for stored conversations and the stateless chat endpoint.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::prompts::DEFAULT_CHAT_TEMPERATURE;
use crate::chat::service::{ChatOptions, SendOutcome};
use crate::chat::store::{ConversationStore, Persistence};
use crate::errors::AppError;
use crate::llm_client::{ChatMessage, CompletionRequest};
use crate::models::conversation::Conversation;
use crate::render::render_markdown;
use crate::routes::extract::{AppJson, AppPath};
use crate::routes::UserIdQuery;
use crate::state::AppState;

const MAX_TEMPERATURE: f32 = 2.0;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub title: Option<String>,
    pub initial_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
    pub active_id: Option<Uuid>,
    pub persistence: Persistence,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation: Conversation,
    pub active_id: Option<Uuid>,
    pub persistence: Persistence,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub conversation: Conversation,
    pub reply: String,
    pub reply_html: String,
    pub superseded: bool,
    pub persistence: Persistence,
}

#[derive(Debug, Deserialize)]
pub struct ChatgptRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ChatgptResponse {
    pub reply: String,
}

impl From<&ConversationStore> for ConversationListResponse {
    fn from(store: &ConversationStore) -> Self {
        Self {
            conversations: store.conversations().to_vec(),
            active_id: store.active_id(),
            persistence: store.persistence().clone(),
        }
    }
}

impl From<SendOutcome> for SendMessageResponse {
    fn from(outcome: SendOutcome) -> Self {
        Self {
            reply_html: render_markdown(&outcome.reply),
            conversation: outcome.conversation,
            reply: outcome.reply,
            superseded: outcome.superseded,
            persistence: outcome.persistence,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Conversation handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/conversations
pub async fn handle_list_conversations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let session = state.chat.session(params.user_id()?).await;
    let store = session.lock().await;
    Ok(Json(ConversationListResponse::from(&*store)))
}

/// POST /api/conversations
///
/// Creates a conversation (optionally seeded with a first user message) and selects it.
pub async fn handle_create_conversation(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    AppJson(request): AppJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), AppError> {
    let session = state.chat.session(params.user_id()?).await;
    let mut store = session.lock().await;
    let id = store
        .create(
            request.title.as_deref(),
            request.initial_message.as_deref(),
        )
        .await;
    let response = conversation_response(&store, id)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/conversations
pub async fn handle_clear_conversations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let session = state.chat.session(params.user_id()?).await;
    let mut store = session.lock().await;
    store.clear().await;
    Ok(Json(ConversationListResponse::from(&*store)))
}

/// DELETE /api/conversations/:id
pub async fn handle_delete_conversation(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let session = state.chat.session(params.user_id()?).await;
    let mut store = session.lock().await;
    store.delete(id).await?;
    Ok(Json(ConversationListResponse::from(&*store)))
}

/// POST /api/conversations/:id/select
pub async fn handle_select_conversation(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ConversationResponse>, AppError> {
    let session = state.chat.session(params.user_id()?).await;
    let mut store = session.lock().await;
    store.select(id)?;
    Ok(Json(conversation_response(&store, id)?))
}

/// POST /api/conversations/:id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    Query(params): Query<UserIdQuery>,
    AppJson(request): AppJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    send(&state, params.user_id()?, Some(id), request).await
}

/// POST /api/conversations/messages
///
/// Sends to the active conversation, or starts a new one if none is active.
pub async fn handle_send_to_active(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    AppJson(request): AppJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    send(&state, params.user_id()?, None, request).await
}

async fn send(
    state: &AppState,
    user_id: &str,
    conversation_id: Option<Uuid>,
    request: SendMessageRequest,
) -> Result<Json<SendMessageResponse>, AppError> {
    let temperature = request.temperature.map(validate_temperature).transpose()?;
    let outcome = state
        .chat
        .send_message(
            state.llm.as_ref(),
            user_id,
            conversation_id,
            request.content.as_deref().unwrap_or_default(),
            ChatOptions {
                model: request.model,
                temperature,
            },
        )
        .await?;
    Ok(Json(outcome.into()))
}

fn conversation_response(store: &ConversationStore, id: Uuid) -> Result<ConversationResponse, AppError> {
    let conversation = store
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Conversation {id}")))?;
    Ok(ConversationResponse {
        conversation,
        active_id: store.active_id(),
        persistence: store.persistence().clone(),
    })
}

fn validate_temperature(temperature: f32) -> Result<f32, AppError> {
    if (0.0..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(AppError::Validation(format!(
            "temperature must be between 0 and {MAX_TEMPERATURE}"
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stateless chat
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chatgpt
///
/// Forwards a full message list to the model. Errors, including body rejections, are
/// returned as plain text.
pub async fn handle_chatgpt(
    State(state): State<AppState>,
    request: Result<Json<ChatgptRequest>, JsonRejection>,
) -> Result<Json<ChatgptResponse>, (StatusCode, String)> {
    let Json(request) = request.map_err(|rejection| (rejection.status(), rejection.body_text()))?;
    chatgpt(&state, request).await.map_err(|e| {
        let (status, _) = e.status_and_code();
        (status, e.public_message())
    })
}

async fn chatgpt(state: &AppState, request: ChatgptRequest) -> Result<Json<ChatgptResponse>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::Validation("messages cannot be empty".to_string()));
    }
    let temperature = request
        .temperature
        .map(validate_temperature)
        .transpose()?
        .unwrap_or(DEFAULT_CHAT_TEMPERATURE);

    let reply = state
        .llm
        .complete(CompletionRequest {
            model: request.model,
            temperature,
            messages: request.messages,
        })
        .await?;
    Ok(Json(ChatgptResponse { reply }))
}
