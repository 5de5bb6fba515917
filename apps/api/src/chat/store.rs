//! Per-user conversation store.
//!
//! Holds the ordered conversation list (newest first) and the active conversation.
//! Every mutation rewrites the whole list through the repository. A failed write never
//! fails the mutation: it is reported as `Persistence::Degraded` so callers can warn the
//! user that their history may not survive a restart.
//!
//! A store whose load failed never writes over the stored list, since that list may still
//! hold history it could not read. It stays degraded until `retry_load` succeeds; only an
//! explicit `clear` replaces the stored list before then.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;
use crate::chat::sequencer::{RequestSequencer, Ticket};
use crate::chat::ConversationError;
use crate::models::conversation::{Conversation, Message, Role};

pub const DEFAULT_TITLE: &str = "New chat";
const TITLE_MAX_CHARS: usize = 40;

/// Outcome of the most recent load or save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Persistence {
    Ok,
    Degraded { reason: String },
}

impl Persistence {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Persistence::Degraded { .. })
    }
}

pub struct ConversationStore {
    user_id: String,
    conversations: Vec<Conversation>,
    active_id: Option<Uuid>,
    repository: Arc<dyn ConversationRepository>,
    persistence: Persistence,
    /// The stored list was read successfully, so writing it back cannot lose history.
    loaded: bool,
    sequencer: RequestSequencer,
}

impl ConversationStore {
    /// Loads the user's conversations. Unreadable data starts an empty, degraded store
    /// that keeps changes in memory only.
    pub async fn load(user_id: &str, repository: Arc<dyn ConversationRepository>) -> Self {
        let mut store = Self {
            user_id: user_id.to_string(),
            conversations: Vec::new(),
            active_id: None,
            repository,
            persistence: Persistence::Ok,
            loaded: false,
            sequencer: RequestSequencer::default(),
        };
        store.retry_load().await;
        store
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reads the stored list if it has not been read yet. Conversations created while the
    /// store was degraded stay in front of the stored ones and are saved with them.
    pub async fn retry_load(&mut self) {
        if self.loaded {
            return;
        }
        match self.repository.load(&self.user_id).await {
            Ok(stored) => {
                let pending = !self.conversations.is_empty();
                if pending {
                    info!(
                        "Stored conversations for {} readable again, merging {} unsaved",
                        self.user_id,
                        self.conversations.len()
                    );
                }
                self.conversations.extend(stored);
                if self.active_id.is_none() {
                    self.active_id = self.conversations.first().map(|c| c.id);
                }
                self.loaded = true;
                self.persistence = Persistence::Ok;
                if pending {
                    self.persist().await;
                }
            }
            Err(e) => {
                warn!("Failed to load conversations for {}: {e}", self.user_id);
                self.persistence = Persistence::Degraded {
                    reason: format!(
                        "stored conversations could not be loaded, changes are not being saved: {e}"
                    ),
                };
            }
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: Uuid) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active_id
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Creates a conversation, makes it active, and optionally seeds it with a user message.
    /// Without an explicit title the first message names the conversation.
    pub async fn create(&mut self, title: Option<&str>, initial_message: Option<&str>) -> Uuid {
        let initial_message = initial_message.map(str::trim).filter(|m| !m.is_empty());
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => initial_message.map(derive_title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        };

        let mut conversation = Conversation::new(title);
        if let Some(content) = initial_message {
            conversation.push(Message::new(Role::User, content));
        }
        let id = conversation.id;

        self.conversations.insert(0, conversation);
        self.active_id = Some(id);
        self.persist().await;
        id
    }

    /// Appends a message to the end of a conversation.
    pub async fn append(
        &mut self,
        conversation_id: Uuid,
        role: Role,
        content: &str,
    ) -> Result<Message, ConversationError> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or(ConversationError::NotFound(conversation_id))?;

        let message = Message::new(role, content);
        conversation.push(message.clone());
        self.persist().await;
        Ok(message)
    }

    /// Removes a conversation. If it was active, the newest remaining one becomes active.
    pub async fn delete(&mut self, conversation_id: Uuid) -> Result<(), ConversationError> {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != conversation_id);
        if self.conversations.len() == before {
            return Err(ConversationError::NotFound(conversation_id));
        }

        self.sequencer.forget(conversation_id);
        if self.active_id == Some(conversation_id) {
            self.active_id = self.conversations.first().map(|c| c.id);
        }
        self.persist().await;
        Ok(())
    }

    /// Wipes the list, including a stored list that could not be read.
    pub async fn clear(&mut self) {
        self.conversations.clear();
        self.active_id = None;
        self.sequencer.clear();
        self.loaded = true;
        self.persist().await;
    }

    /// Selection is session state only and is not written to storage.
    pub fn select(&mut self, conversation_id: Uuid) -> Result<(), ConversationError> {
        if self.get(conversation_id).is_none() {
            return Err(ConversationError::NotFound(conversation_id));
        }
        self.active_id = Some(conversation_id);
        Ok(())
    }

    pub fn issue_ticket(&mut self, conversation_id: Uuid) -> Ticket {
        self.sequencer.issue(conversation_id)
    }

    pub fn finish_ticket(&mut self, ticket: Ticket) -> bool {
        self.sequencer.finish(ticket)
    }

    async fn persist(&mut self) {
        if !self.loaded {
            warn!(
                "Not saving conversations for {}: the stored list was never read",
                self.user_id
            );
            return;
        }
        self.persistence = match self
            .repository
            .save(&self.user_id, &self.conversations)
            .await
        {
            Ok(()) => Persistence::Ok,
            Err(e) => {
                warn!("Failed to persist conversations for {}: {e}", self.user_id);
                Persistence::Degraded {
                    reason: format!("conversations could not be saved: {e}"),
                }
            }
        };
    }
}

/// First line of the message, capped at 40 characters with an ellipsis when cut.
fn derive_title(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or(message).trim();
    if first_line.chars().count() <= TITLE_MAX_CHARS {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
    format!("{}...", cut.trim_end())
}
