//! Application state wiring the store, registry, and orchestrator together.
//!
//! The core types are generic over `ConversationStore`; `AppState` pins them
//! to [`RelayStore`], which is SQLite normally and in-memory for
//! `serve --ephemeral`.

use std::path::PathBuf;
use std::sync::Arc;

use chatrelay_core::chat::orchestrator::{ChatOrchestrator, ChatSettings};
use chatrelay_core::conversation::memory::InMemoryConversationStore;
use chatrelay_core::conversation::registry::ConversationRegistry;
use chatrelay_core::conversation::store::ConversationStore;
use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_core::llm::provider::LlmProvider;
use chatrelay_infra::config::{load_config, resolve_data_dir};
use chatrelay_infra::llm::{create_provider, resolve_api_key};
use chatrelay_infra::sqlite::conversation::SqliteConversationStore;
use chatrelay_infra::sqlite::pool::DatabasePool;
use chatrelay_types::chat::{ConversationId, Turn};
use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::RepositoryError;
use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Durable store selected at startup.
pub enum RelayStore {
    Sqlite(SqliteConversationStore),
    Memory(InMemoryConversationStore),
}

impl ConversationStore for RelayStore {
    async fn load(&self, id: &ConversationId) -> Result<Option<Vec<Turn>>, RepositoryError> {
        match self {
            RelayStore::Sqlite(store) => store.load(id).await,
            RelayStore::Memory(store) => store.load(id).await,
        }
    }

    async fn save(&self, id: &ConversationId, turns: &[Turn]) -> Result<(), RepositoryError> {
        match self {
            RelayStore::Sqlite(store) => store.save(id, turns).await,
            RelayStore::Memory(store) => store.save(id, turns).await,
        }
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        match self {
            RelayStore::Sqlite(store) => store.delete(id).await,
            RelayStore::Memory(store) => store.delete(id).await,
        }
    }
}

pub type ConcreteOrchestrator = ChatOrchestrator<RelayStore>;

/// Stand-in used when the configured provider cannot be built.
///
/// History and clear keep working; every chat fails with the reason.
struct UnconfiguredProvider {
    reason: String,
    capabilities: ProviderCapabilities,
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Provider {
            message: format!("inference provider not configured: {}", self.reason),
        })
    }
}

/// Shared state for CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
    /// `None` when running on the in-memory store.
    pub db_pool: Option<DatabasePool>,
}

impl AppState {
    /// Resolve the data dir, load config, open the store, and build the provider.
    pub async fn init(ephemeral: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;
        let config = load_config(&data_dir).await;

        let (store, db_pool) = if ephemeral {
            tracing::info!("Using in-memory conversation store; nothing will be persisted");
            (RelayStore::Memory(InMemoryConversationStore::new()), None)
        } else {
            let pool = DatabasePool::open(&data_dir).await?;
            tracing::debug!(data_dir = %data_dir.display(), "Opened conversation database");
            (
                RelayStore::Sqlite(SqliteConversationStore::new(pool.clone())),
                Some(pool),
            )
        };

        let provider = match create_provider(&config.provider, resolve_api_key(&config.provider)) {
            Ok(provider) => provider,
            Err(e) => {
                let reason = match e {
                    LlmError::AuthenticationFailed => {
                        format!("no API key in ${}", config.provider.api_key_env)
                    }
                    other => other.to_string(),
                };
                tracing::warn!("{reason}; chat requests will fail");
                BoxLlmProvider::new(UnconfiguredProvider {
                    reason,
                    capabilities: ProviderCapabilities {
                        max_output_tokens: 0,
                    },
                })
            }
        };

        Ok(Self::new(store, provider, config, data_dir, db_pool))
    }

    /// Wire state from already-built parts.
    pub fn new(
        store: RelayStore,
        provider: BoxLlmProvider,
        config: RelayConfig,
        data_dir: PathBuf,
        db_pool: Option<DatabasePool>,
    ) -> Self {
        let registry = Arc::new(ConversationRegistry::new(Arc::new(store)));
        let orchestrator = ChatOrchestrator::new(registry, provider, ChatSettings::from(&config));

        Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }

    /// Unload every conversation and close the database.
    pub async fn shutdown(&self) {
        self.orchestrator.registry().deactivate_all().await;
        if let Some(pool) = &self.db_pool {
            pool.close().await;
        }
    }
}
