pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use teloxide::types::ChatId;

pub use memory::MemoryStore;
pub use postgres::Database;

/// Names of the append-only fallback lists kept per chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Bookings,
    Messages,
    ChatHistory,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Bookings => "physioBookings",
            StorageKey::Messages => "physioMessages",
            StorageKey::ChatHistory => "chatHistory",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum StoreError {
    DatabaseError(String),
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(e) => write!(f, "Database error: {}", e),
            StoreError::SerializationError(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}

/// Local key-value store of JSON arrays, scoped per chat. Lists only grow.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn load(&self, owner: ChatId, key: StorageKey) -> Result<Vec<serde_json::Value>, StoreError>;

    async fn append(&self, owner: ChatId, key: StorageKey, entry: serde_json::Value) -> Result<(), StoreError>;
}

pub async fn append_record<T: Serialize + Sync>(
    store: &dyn LocalStore,
    owner: ChatId,
    key: StorageKey,
    record: &T,
) -> Result<(), StoreError> {
    let entry = serde_json::to_value(record)?;
    store.append(owner, key, entry).await
}

pub async fn load_records<T: DeserializeOwned>(
    store: &dyn LocalStore,
    owner: ChatId,
    key: StorageKey,
) -> Result<Vec<T>, StoreError> {
    store
        .load(owner, key)
        .await?
        .into_iter()
        .map(|entry| serde_json::from_value(entry).map_err(StoreError::from))
        .collect()
}
