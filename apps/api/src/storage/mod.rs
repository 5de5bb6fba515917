// Key-value persistence for per-user state (conversation lists, resume drafts).
// Values are whole JSON documents rewritten on every change; there is no delta log.

pub mod file;
#[cfg(test)]
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

const MAX_USER_ID_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Pluggable string store. Swapped at startup: Redis when `REDIS_URL` is set, files otherwise.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn put(&self, key: &str, value: String) -> Result<(), StorageError>;
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// User ids become part of storage keys and file names, so the alphabet is restricted.
pub fn validate_user_id(user_id: &str) -> Result<(), StorageError> {
    let valid = !user_id.is_empty()
        && user_id.len() <= MAX_USER_ID_LEN
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(format!(
            "user id must be 1-{MAX_USER_ID_LEN} characters of [A-Za-z0-9_-]"
        )))
    }
}

/// Opens the configured backend.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KvStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = redis::RedisStore::connect(url).await?;
            info!("Redis store initialized");
            Ok(Arc::new(store))
        }
        None => {
            let store = file::FileStore::open(&config.storage_dir).await?;
            info!("File store initialized at {}", config.storage_dir);
            Ok(Arc::new(store))
        }
    }
}
