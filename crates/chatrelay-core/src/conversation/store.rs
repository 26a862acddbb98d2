//! ConversationStore trait definition.
//!
//! The durable backing copy of every conversation log. One record per
//! conversation identity; the value is the full ordered turn sequence.

use chatrelay_types::chat::{ConversationId, Turn};
use chatrelay_types::error::RepositoryError;

/// Durable, identity-partitioned storage for conversation logs.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteConversationStore`)
/// plus [`super::memory::InMemoryConversationStore`] here for tests and
/// ephemeral serving. Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Each conversation actor is the only writer of its own partition, so
/// implementations need no cross-partition coordination.
pub trait ConversationStore: Send + Sync + 'static {
    /// Load the persisted log. `None` means nothing has ever been stored (or
    /// it was cleared); that is not an error.
    fn load(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Vec<Turn>>, RepositoryError>> + Send;

    /// Replace the persisted log with `turns` (upsert). Must be durable when
    /// the future resolves to `Ok`.
    fn save(
        &self,
        id: &ConversationId,
        turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete the persisted log. No-op if nothing is stored.
    fn delete(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
