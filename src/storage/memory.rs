use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::types::ChatId;
use tokio::sync::RwLock;

use super::{LocalStore, StorageKey, StoreError};

type Lists = Arc<RwLock<HashMap<(ChatId, StorageKey), Vec<serde_json::Value>>>>;

/// Process-local store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    lists: Lists,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn load(&self, owner: ChatId, key: StorageKey) -> Result<Vec<serde_json::Value>, StoreError> {
        let lists = self.lists.read().await;
        Ok(lists.get(&(owner, key)).cloned().unwrap_or_default())
    }

    async fn append(&self, owner: ChatId, key: StorageKey, entry: serde_json::Value) -> Result<(), StoreError> {
        let mut lists = self.lists.write().await;
        lists.entry((owner, key)).or_default().push(entry);
        Ok(())
    }
}
