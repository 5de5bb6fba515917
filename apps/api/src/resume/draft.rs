//! Per-user resume form drafts, so a half-filled generator form survives a reload.

use std::sync::Arc;

use serde_json::Value;

use crate::storage::{validate_user_id, KvStore, StorageError};

const DRAFT_KEY_PREFIX: &str = "resumeData_";

#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KvStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, user_id: &str) -> Result<Option<Value>, StorageError> {
        let key = draft_key(user_id)?;
        match self.store.get(&key).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    pub async fn save(&self, user_id: &str, draft: &Value) -> Result<(), StorageError> {
        let key = draft_key(user_id)?;
        self.store.put(&key, serde_json::to_string(draft)?).await
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), StorageError> {
        let key = draft_key(user_id)?;
        self.store.delete(&key).await
    }
}

fn draft_key(user_id: &str) -> Result<String, StorageError> {
    validate_user_id(user_id)?;
    Ok(format!("{DRAFT_KEY_PREFIX}{user_id}"))
}
