use thiserror::Error;

use crate::llm::LlmError;

/// Errors from durable store operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by a conversation actor.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// The backing store read/write did not complete. In-memory state has
    /// been kept in line with the last durable state.
    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    /// Unknown operation or unsupported method on the actor surface.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors surfaced by the chat orchestrator to its callers.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    /// The inference call failed or returned no usable text. The user's
    /// turn has already been persisted and is not rolled back.
    #[error("inference error: {0}")]
    Inference(#[from] LlmError),

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}
