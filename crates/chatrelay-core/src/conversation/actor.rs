//! Per-conversation state actor.
//!
//! A `ConversationActor` is the sole reader and writer of one conversation's
//! [`MessageLog`]. Every operation takes the actor's mutex for its whole
//! duration, including store I/O, so operations on one identity are handled
//! strictly one at a time and in arrival order (tokio's mutex is FIFO-fair).
//! Actors for different identities share nothing but the store.
//!
//! A multi-step exchange (user turn, inference, reply) runs through a
//! [`ConversationExchange`], which keeps the mutex for every step in between.
//!
//! Lifecycle: `Uninitialized` (no in-memory log) until the first operation
//! rehydrates from the store, then `Active`. [`ConversationActor::deactivate`]
//! drops back to `Uninitialized`; the identity itself is never destroyed.

use std::sync::Arc;

use chatrelay_types::chat::{
    AppendMessageResponse, ClearResponse, ConversationId, ListMessagesResponse, Turn, TurnRole,
};
use chatrelay_types::error::ConversationError;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::log::MessageLog;
use super::request::{ConversationRequest, ConversationResponse};
use super::store::ConversationStore;

/// Single-writer actor owning one conversation log.
pub struct ConversationActor<S: ConversationStore> {
    id: ConversationId,
    store: Arc<S>,
    /// `None` = uninitialized; the log must be rehydrated before use.
    state: Mutex<Option<MessageLog>>,
}

impl<S: ConversationStore> ConversationActor<S> {
    /// Create an uninitialized actor. No I/O happens until the first operation.
    pub fn new(id: ConversationId, store: Arc<S>) -> Self {
        Self {
            id,
            store,
            state: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Whether the in-memory log is loaded. Waits for in-flight operations.
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Load the persisted log into `slot` if it is not loaded yet.
    async fn rehydrate<'a>(
        &self,
        slot: &'a mut Option<MessageLog>,
    ) -> Result<&'a mut MessageLog, ConversationError> {
        if slot.is_none() {
            let turns = self.store.load(&self.id).await?.unwrap_or_default();
            debug!(conversation_id = %self.id, turns = turns.len(), "Rehydrated conversation");
            *slot = Some(MessageLog::from(turns));
        }
        Ok(slot.get_or_insert_with(MessageLog::new))
    }

    /// Full log in order. Never mutates.
    pub async fn list_messages(&self) -> Result<Vec<Turn>, ConversationError> {
        let mut state = self.state.lock().await;
        let log = self.rehydrate(&mut state).await?;
        Ok(log.snapshot())
    }

    /// Take the actor's lock for a sequence of operations.
    ///
    /// Every other operation on this identity queues until the returned
    /// exchange is dropped.
    pub async fn begin_exchange(&self) -> ConversationExchange<'_, S> {
        ConversationExchange {
            actor: self,
            state: self.state.lock().await,
        }
    }

    /// Append a turn stamped with the server clock and persist the whole log.
    ///
    /// The turn only enters the in-memory log after the store accepted the
    /// new sequence, so a failed write leaves memory equal to the last
    /// durable state.
    pub async fn append_message(
        &self,
        role: TurnRole,
        content: impl Into<String>,
    ) -> Result<Turn, ConversationError> {
        let mut state = self.state.lock().await;
        self.append_locked(&mut state, role, content.into()).await
    }

    async fn append_locked(
        &self,
        slot: &mut Option<MessageLog>,
        role: TurnRole,
        content: String,
    ) -> Result<Turn, ConversationError> {
        let log = self.rehydrate(slot).await?;

        let turn = Turn::new(role, content);
        let mut pending = log.snapshot();
        pending.push(turn.clone());

        if let Err(e) = self.store.save(&self.id, &pending).await {
            warn!(conversation_id = %self.id, error = %e, "Failed to persist appended turn");
            return Err(e.into());
        }

        let len = log.append(turn.clone());
        debug!(conversation_id = %self.id, %role, len, "Appended turn");
        Ok(turn)
    }

    /// Delete the persisted log and empty the in-memory one. Idempotent.
    ///
    /// Clearing does not need the old contents, so an uninitialized actor
    /// skips rehydration and becomes active with an empty log.
    pub async fn clear(&self) -> Result<(), ConversationError> {
        let mut state = self.state.lock().await;

        if let Err(e) = self.store.delete(&self.id).await {
            warn!(conversation_id = %self.id, error = %e, "Failed to delete conversation log");
            return Err(e.into());
        }

        *state = Some(MessageLog::new());
        debug!(conversation_id = %self.id, "Cleared conversation");
        Ok(())
    }

    /// Drop the in-memory log; the next operation rehydrates from the store.
    pub async fn deactivate(&self) {
        let mut state = self.state.lock().await;
        if state.take().is_some() {
            debug!(conversation_id = %self.id, "Deactivated conversation");
        }
    }

    /// Dispatch a routed request to the matching operation.
    pub async fn handle(
        &self,
        request: ConversationRequest,
    ) -> Result<ConversationResponse, ConversationError> {
        match request {
            ConversationRequest::ListMessages => {
                let messages = self.list_messages().await?;
                Ok(ConversationResponse::List(ListMessagesResponse { messages }))
            }
            ConversationRequest::AppendMessage(m) => {
                let message = self.append_message(m.role, m.content).await?;
                Ok(ConversationResponse::Append(AppendMessageResponse {
                    success: true,
                    message,
                }))
            }
            ConversationRequest::Clear => {
                self.clear().await?;
                Ok(ConversationResponse::Clear(ClearResponse { success: true }))
            }
        }
    }
}

/// Exclusive hold on one actor across several operations.
pub struct ConversationExchange<'a, S: ConversationStore> {
    actor: &'a ConversationActor<S>,
    state: MutexGuard<'a, Option<MessageLog>>,
}

impl<S: ConversationStore> ConversationExchange<'_, S> {
    pub async fn list_messages(&mut self) -> Result<Vec<Turn>, ConversationError> {
        let log = self.actor.rehydrate(&mut self.state).await?;
        Ok(log.snapshot())
    }

    pub async fn append_message(
        &mut self,
        role: TurnRole,
        content: impl Into<String>,
    ) -> Result<Turn, ConversationError> {
        self.actor
            .append_locked(&mut self.state, role, content.into())
            .await
    }
}
