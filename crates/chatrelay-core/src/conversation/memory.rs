//! Process-local conversation store.
//!
//! Backs `chatrelay serve --ephemeral` and the core test suites. Contents live
//! only as long as the store value does.

use chatrelay_types::chat::{ConversationId, Turn};
use chatrelay_types::error::RepositoryError;
use dashmap::DashMap;

use super::store::ConversationStore;

/// `ConversationStore` backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    entries: DashMap<ConversationId, Vec<Turn>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with a stored log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, id: &ConversationId) -> Result<Option<Vec<Turn>>, RepositoryError> {
        Ok(self.entries.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, id: &ConversationId, turns: &[Turn]) -> Result<(), RepositoryError> {
        self.entries.insert(id.clone(), turns.to_vec());
        Ok(())
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        self.entries.remove(id);
        Ok(())
    }
}
