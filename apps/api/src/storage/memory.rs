//! In-process store used as a test double for the file and Redis backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::{KvStore, StorageError};

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Fails every operation, standing in for a full disk or an unreachable Redis.
pub struct FailingStore;

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "store offline").into())
    }

    async fn put(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded").into())
    }

    async fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "store offline").into())
    }
}

/// A `MemoryStore` that fails a set number of reads, and optionally every write.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing_gets: AtomicUsize,
    failing_puts: AtomicBool,
}

impl FlakyStore {
    pub fn failing_gets(self, count: usize) -> Self {
        self.failing_gets.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_puts(self) -> Self {
        self.failing_puts.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let fail = self
            .failing_gets
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out").into());
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.failing_puts.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded").into());
        }
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }
}
