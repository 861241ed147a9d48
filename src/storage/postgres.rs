use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use teloxide::types::ChatId;

use super::{LocalStore, StorageKey, StoreError};

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_store (
                chat_id BIGINT NOT NULL,
                key TEXT NOT NULL,
                entries JSONB NOT NULL DEFAULT '[]',
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                PRIMARY KEY (chat_id, key)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_local_store_key ON local_store (key)"
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LocalStore for Database {
    async fn load(&self, owner: ChatId, key: StorageKey) -> Result<Vec<serde_json::Value>, StoreError> {
        let row = sqlx::query(
            "SELECT entries FROM local_store WHERE chat_id = $1 AND key = $2"
        )
        .bind(owner.0)
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let entries: serde_json::Value = row.try_get("entries")?;
        match entries {
            serde_json::Value::Array(items) => Ok(items),
            other => Err(StoreError::SerializationError(format!(
                "{} for {} is not an array: {}",
                key, owner, other
            ))),
        }
    }

    async fn append(&self, owner: ChatId, key: StorageKey, entry: serde_json::Value) -> Result<(), StoreError> {
        // Wrapped in a one-element array so that array entries are not spliced in.
        sqlx::query(
            r#"
            INSERT INTO local_store (chat_id, key, entries, updated_at)
            VALUES ($1, $2, jsonb_build_array($3::jsonb), NOW())
            ON CONFLICT (chat_id, key)
            DO UPDATE SET
                entries = local_store.entries || EXCLUDED.entries,
                updated_at = NOW()
            "#
        )
        .bind(owner.0)
        .bind(key.as_str())
        .bind(entry)
        .execute(&self.pool)
        .await?;

        log::debug!("💾 Appended to {} for chat {}", key, owner);

        Ok(())
    }
}
