//! SQLite conversation store.
//!
//! Implements `ConversationStore` from `chatrelay-core`. Each conversation is
//! one row in `conversation_logs`; the whole ordered turn sequence is stored
//! as a JSON array and replaced on every save.

use chatrelay_core::conversation::store::ConversationStore;
use chatrelay_types::chat::{ConversationId, Turn};
use chatrelay_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationStore`.
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Number of stored conversation logs.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM conversation_logs")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(n as u64)
    }
}

impl ConversationStore for SqliteConversationStore {
    async fn load(&self, id: &ConversationId) -> Result<Option<Vec<Turn>>, RepositoryError> {
        let row = sqlx::query("SELECT messages FROM conversation_logs WHERE conversation_id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("messages")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let turns: Vec<Turn> = serde_json::from_str(&raw).map_err(|e| {
                    RepositoryError::Serialization(format!("invalid stored log for {id}: {e}"))
                })?;
                Ok(Some(turns))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, id: &ConversationId, turns: &[Turn]) -> Result<(), RepositoryError> {
        let messages = serde_json::to_string(turns)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO conversation_logs (conversation_id, messages, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (conversation_id) DO UPDATE SET messages = excluded.messages, updated_at = excluded.updated_at"#,
        )
        .bind(id.as_str())
        .bind(&messages)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM conversation_logs WHERE conversation_id = ?")
            .bind(id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
