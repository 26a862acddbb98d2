//! Identity -> actor resolution.
//!
//! The registry hands out exactly one [`ConversationActor`] per
//! [`ConversationId`] for the lifetime of the process. Entries are never
//! removed; deactivation only unloads an actor's in-memory log.

use std::sync::Arc;

use chatrelay_types::chat::ConversationId;
use dashmap::DashMap;
use tracing::debug;

use super::actor::ConversationActor;
use super::store::ConversationStore;

/// Process-wide map of conversation actors sharing one store.
pub struct ConversationRegistry<S: ConversationStore> {
    store: Arc<S>,
    actors: DashMap<ConversationId, Arc<ConversationActor<S>>>,
}

impl<S: ConversationStore> ConversationRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            actors: DashMap::new(),
        }
    }

    /// Resolve the actor for `id`, creating an uninitialized one on first use.
    ///
    /// Concurrent callers racing on a new identity all receive the same actor;
    /// the entry API holds the shard lock across the check and the insert.
    pub fn get_or_create(&self, id: &ConversationId) -> Arc<ConversationActor<S>> {
        if let Some(actor) = self.actors.get(id) {
            return Arc::clone(actor.value());
        }

        let entry = self.actors.entry(id.clone()).or_insert_with(|| {
            debug!(conversation_id = %id, "Created conversation actor");
            Arc::new(ConversationActor::new(id.clone(), Arc::clone(&self.store)))
        });
        Arc::clone(entry.value())
    }

    /// Unload one actor's in-memory log. Returns `false` if the identity was
    /// never resolved.
    pub async fn deactivate(&self, id: &ConversationId) -> bool {
        // Clone out of the map so no shard guard is held across the await.
        let actor = self.actors.get(id).map(|a| Arc::clone(a.value()));
        match actor {
            Some(actor) => {
                actor.deactivate().await;
                true
            }
            None => false,
        }
    }

    /// Unload every actor's in-memory log.
    pub async fn deactivate_all(&self) {
        let actors: Vec<_> = self
            .actors
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for actor in actors {
            actor.deactivate().await;
        }
    }

    /// Number of identities resolved so far.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::chat::TurnRole;

    use crate::conversation::memory::InMemoryConversationStore;

    fn registry() -> ConversationRegistry<InMemoryConversationStore> {
        ConversationRegistry::new(Arc::new(InMemoryConversationStore::new()))
    }

    #[test]
    fn test_same_id_resolves_same_actor() {
        let registry = registry();
        let id = ConversationId::from("conv_a");
        let first = registry.get_or_create(&id);
        let second = registry.get_or_create(&id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_any_string_is_a_valid_identity() {
        let registry = registry();
        let empty = registry.get_or_create(&ConversationId::from(""));
        let unicode = registry.get_or_create(&ConversationId::from("會話 🚀"));
        assert!(!Arc::ptr_eq(&empty, &unicode));
        assert_eq!(empty.id().as_str(), "");
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_yields_one_actor() {
        let registry = Arc::new(registry());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.get_or_create(&ConversationId::from("racy"))
            }));
        }
        let mut actors = Vec::new();
        for h in handles {
            actors.push(h.await.unwrap());
        }
        assert!(actors.iter().all(|a| Arc::ptr_eq(a, &actors[0])));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_identities_are_isolated() {
        let registry = registry();
        let a = registry.get_or_create(&ConversationId::from("A"));
        let b = registry.get_or_create(&ConversationId::from("B"));

        a.append_message(TurnRole::User, "only in A").await.unwrap();
        b.append_message(TurnRole::User, "only in B").await.unwrap();
        b.clear().await.unwrap();

        let a_turns = a.list_messages().await.unwrap();
        assert_eq!(a_turns.len(), 1);
        assert_eq!(a_turns[0].content, "only in A");
        assert!(b.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_then_rehydrate() {
        let registry = registry();
        let id = ConversationId::from("conv_d");
        let actor = registry.get_or_create(&id);
        actor.append_message(TurnRole::User, "hi").await.unwrap();
        let before = actor.list_messages().await.unwrap();

        assert!(registry.deactivate(&id).await);
        assert!(!actor.is_active().await);
        assert!(!registry.deactivate(&ConversationId::from("unknown")).await);

        // The identity survives deactivation.
        assert!(Arc::ptr_eq(&actor, &registry.get_or_create(&id)));
        assert_eq!(actor.list_messages().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_deactivate_all_unloads_every_actor() {
        let registry = registry();
        let ids: Vec<ConversationId> = (0..3).map(|i| ConversationId::new(format!("c{i}"))).collect();
        for id in &ids {
            registry
                .get_or_create(id)
                .append_message(TurnRole::User, "x")
                .await
                .unwrap();
        }

        registry.deactivate_all().await;
        for id in &ids {
            let actor = registry.get_or_create(id);
            assert!(!actor.is_active().await);
            assert_eq!(actor.list_messages().await.unwrap().len(), 1);
        }
        assert_eq!(registry.store().len(), 3);
    }
}
