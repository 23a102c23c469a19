//! # Key-Value Repository
//!
//! String values by string key. The latest `set` for a key wins.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StorageResult;

/// Repository for raw key-value records.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM key_value_store WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Returns whether a record existed.
    pub async fn remove(&self, key: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM key_value_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Storage, StorageConfig};

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        assert_eq!(storage.kv().get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let kv = storage.kv();

        kv.set("k", "one").await.unwrap();
        kv.set("k", "two").await.unwrap();

        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_remove() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        let kv = storage.kv();

        kv.set("k", "v").await.unwrap();
        assert!(kv.remove("k").await.unwrap());
        assert!(!kv.remove("k").await.unwrap());
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_pool_fails() {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        storage.close().await;

        assert!(storage.kv().set("k", "v").await.is_err());
    }
}
