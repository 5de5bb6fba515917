//! Conversation persistence seam.
//!
//! Default: `KvConversationRepository` over whichever `KvStore` is configured.
//! Tests use the in-memory store or a failing store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::conversation::Conversation;
use crate::storage::{validate_user_id, KvStore, StorageError};

/// Key prefix for a user's conversation list. The `v1` suffix is the format version.
pub const CONVERSATIONS_KEY_PREFIX: &str = "chatgpt_convos_v1_";

pub fn conversations_key(user_id: &str) -> String {
    format!("{CONVERSATIONS_KEY_PREFIX}{user_id}")
}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// A user with nothing stored yet has an empty list.
    async fn load(&self, user_id: &str) -> Result<Vec<Conversation>, StorageError>;
    /// Replaces the user's whole list.
    async fn save(&self, user_id: &str, conversations: &[Conversation]) -> Result<(), StorageError>;
}

pub struct KvConversationRepository {
    store: Arc<dyn KvStore>,
}

impl KvConversationRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ConversationRepository for KvConversationRepository {
    async fn load(&self, user_id: &str) -> Result<Vec<Conversation>, StorageError> {
        validate_user_id(user_id)?;
        match self.store.get(&conversations_key(user_id)).await? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, user_id: &str, conversations: &[Conversation]) -> Result<(), StorageError> {
        validate_user_id(user_id)?;
        let data = serde_json::to_string(conversations)?;
        self.store.put(&conversations_key(user_id), data).await
    }
}
