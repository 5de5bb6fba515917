//! Chat orchestration: per-user sessions and the send-message flow.
//!
//! Flow: append user message → persist → LLM call (no lock held) → append reply if the
//! request is still the latest for that conversation → persist.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::prompts::{CHAT_SYSTEM, DEFAULT_CHAT_TEMPERATURE};
use crate::chat::repository::ConversationRepository;
use crate::chat::store::{ConversationStore, Persistence};
use crate::chat::ConversationError;
use crate::llm_client::{ChatCompletion, ChatMessage, CompletionRequest};
use crate::models::conversation::{Conversation, Role};

/// Caller-selected sampling options for a chat turn.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub conversation: Conversation,
    pub reply: String,
    /// A newer send on the same conversation started while this one was in flight,
    /// so this reply was not stored.
    pub superseded: bool,
    pub persistence: Persistence,
}

type SharedStore = Arc<Mutex<ConversationStore>>;

const MAX_SESSIONS: u64 = 10_000;
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Lazily loads one `ConversationStore` per user. Sessions idle past `SESSION_IDLE` or
/// beyond `MAX_SESSIONS` are dropped and reloaded from the repository on next use.
pub struct ChatService {
    repository: Arc<dyn ConversationRepository>,
    sessions: Cache<String, SharedStore>,
}

impl ChatService {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self::with_limits(repository, MAX_SESSIONS, SESSION_IDLE)
    }

    pub fn with_limits(
        repository: Arc<dyn ConversationRepository>,
        max_sessions: u64,
        idle: Duration,
    ) -> Self {
        Self {
            repository,
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Returns the user's store, loading it from the repository on first access.
    /// Concurrent first accesses for one user share a single load; other users never wait on it.
    /// A cached store whose load failed retries it here until the stored list has been read.
    pub async fn session(&self, user_id: &str) -> SharedStore {
        let repository = self.repository.clone();
        let entry = self
            .sessions
            .entry(user_id.to_string())
            .or_insert_with(async move {
                Arc::new(Mutex::new(ConversationStore::load(user_id, repository).await))
            })
            .await;

        let fresh = entry.is_fresh();
        let store = entry.into_value();
        if !fresh {
            store.lock().await.retry_load().await;
        }
        store
    }

    /// Sends a user message. Targets `conversation_id`, else the active conversation,
    /// else a new conversation named after the message.
    pub async fn send_message(
        &self,
        llm: &dyn ChatCompletion,
        user_id: &str,
        conversation_id: Option<Uuid>,
        content: &str,
        options: ChatOptions,
    ) -> Result<SendOutcome, ConversationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        let session = self.session(user_id).await;

        let (target, ticket, history) = {
            let mut store = session.lock().await;
            let target = match conversation_id.or(store.active_id()) {
                Some(id) => {
                    store.append(id, Role::User, content).await?;
                    store.select(id)?;
                    id
                }
                None => store.create(None, Some(content)).await,
            };
            let ticket = store.issue_ticket(target);
            let history = store
                .get(target)
                .map(build_history)
                .ok_or(ConversationError::NotFound(target))?;
            (target, ticket, history)
        };

        let request = CompletionRequest {
            model: options.model,
            temperature: options.temperature.unwrap_or(DEFAULT_CHAT_TEMPERATURE),
            messages: history,
        };
        let reply = llm.complete(request).await?;

        let mut store = session.lock().await;
        let superseded = !store.finish_ticket(ticket);
        if superseded {
            warn!("Discarding superseded reply for conversation {target}");
        } else {
            store.append(target, Role::Assistant, &reply).await?;
        }

        let conversation = store
            .get(target)
            .cloned()
            .ok_or(ConversationError::NotFound(target))?;
        if store.persistence().is_degraded() {
            warn!("Conversations for {user_id} are not being saved");
        }
        info!(
            "Chat turn complete: conversation={}, messages={}, superseded={}",
            target,
            conversation.messages.len(),
            superseded
        );

        Ok(SendOutcome {
            conversation,
            reply,
            superseded,
            persistence: store.persistence().clone(),
        })
    }
}

/// System prompt followed by the stored messages in order. Stored system notes are kept.
fn build_history(conversation: &Conversation) -> Vec<ChatMessage> {
    std::iter::once(ChatMessage::new(Role::System, CHAT_SYSTEM))
        .chain(
            conversation
                .messages
                .iter()
                .map(|m| ChatMessage::new(m.role, m.content.clone())),
        )
        .collect()
}
