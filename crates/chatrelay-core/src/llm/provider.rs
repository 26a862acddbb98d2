//! LlmProvider trait definition.
//!
//! The one abstraction every inference backend implements. The orchestrator
//! only ever calls `complete`; there is no streaming on this path.

use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for inference backends (OpenAI, Mistral, Workers AI, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Wrap an
/// implementation in [`super::box_provider::BoxLlmProvider`] when the
/// concrete type is only known at runtime.
///
/// Implementations live in chatrelay-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "cloudflare").
    fn name(&self) -> &str;

    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
