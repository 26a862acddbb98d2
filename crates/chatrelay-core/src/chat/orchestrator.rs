//! Chat orchestrator.
//!
//! Drives one chat exchange against a conversation actor: persist the user
//! turn, window the history, call inference, persist the reply. The whole
//! exchange holds the actor's lock, so a second request for the same
//! conversation waits for the first reply. Other conversations are not
//! affected by a slow provider.

use std::sync::Arc;

use chatrelay_types::chat::{ConversationId, Turn, TurnRole};
use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ChatError;
use chatrelay_types::llm::{CompletionRequest, LlmError};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::conversation::registry::ConversationRegistry;
use crate::conversation::store::ConversationStore;
use crate::llm::box_provider::BoxLlmProvider;

use super::window::context_window;

/// Per-exchange inference parameters.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Trailing turns sent to inference.
    pub context_window: usize,
    /// Empty selects the provider's configured model.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub system_prompt: Option<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from(&RelayConfig::default())
    }
}

impl From<&RelayConfig> for ChatSettings {
    fn from(config: &RelayConfig) -> Self {
        Self {
            context_window: config.chat.context_window.max(1),
            model: config.provider.model.clone().unwrap_or_default(),
            max_tokens: config.chat.max_tokens,
            temperature: Some(config.chat.temperature),
            system_prompt: config.chat.system_prompt.clone(),
        }
    }
}

/// Result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: ConversationId,
}

/// Coordinates conversation actors with the inference provider.
pub struct ChatOrchestrator<S: ConversationStore> {
    registry: Arc<ConversationRegistry<S>>,
    provider: BoxLlmProvider,
    settings: ChatSettings,
}

impl<S: ConversationStore> ChatOrchestrator<S> {
    pub fn new(
        registry: Arc<ConversationRegistry<S>>,
        provider: BoxLlmProvider,
        settings: ChatSettings,
    ) -> Self {
        Self {
            registry,
            provider,
            settings,
        }
    }

    pub fn registry(&self) -> &Arc<ConversationRegistry<S>> {
        &self.registry
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Run one exchange: user turn in, assistant reply out.
    ///
    /// The user turn is durable before inference starts. If inference fails
    /// the user turn stays in the log and no assistant turn is written.
    pub async fn chat(
        &self,
        conversation_id: &ConversationId,
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        let actor = self.registry.get_or_create(conversation_id);
        let mut exchange = actor.begin_exchange().await;

        exchange.append_message(TurnRole::User, message).await?;
        let turns = exchange.list_messages().await?;

        let request = self.build_request(&turns);
        debug!(
            conversation_id = %conversation_id,
            stored = turns.len(),
            window = request.messages.len(),
            "Built completion request"
        );

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            conversation_id = %conversation_id,
        );
        let response = match self.provider.complete(&request).instrument(span).await {
            Ok(response) => response,
            Err(e) => {
                warn!(conversation_id = %conversation_id, error = %e, "Inference failed");
                return Err(e.into());
            }
        };

        if response.content.trim().is_empty() {
            warn!(conversation_id = %conversation_id, "Inference returned no usable text");
            return Err(LlmError::EmptyResponse.into());
        }

        exchange
            .append_message(TurnRole::Assistant, response.content.clone())
            .await?;
        drop(exchange);

        info!(
            conversation_id = %conversation_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "Chat exchange complete"
        );

        Ok(ChatReply {
            response: response.content,
            conversation_id: conversation_id.clone(),
        })
    }

    /// Full stored log for a conversation.
    pub async fn history(&self, conversation_id: &ConversationId) -> Result<Vec<Turn>, ChatError> {
        let actor = self.registry.get_or_create(conversation_id);
        Ok(actor.list_messages().await?)
    }

    /// Empty a conversation's log.
    pub async fn clear(&self, conversation_id: &ConversationId) -> Result<(), ChatError> {
        let actor = self.registry.get_or_create(conversation_id);
        actor.clear().await?;
        Ok(())
    }

    fn build_request(&self, turns: &[Turn]) -> CompletionRequest {
        let limit = self.provider.capabilities().max_output_tokens;
        let max_tokens = if limit > 0 && self.settings.max_tokens > limit {
            debug!(
                configured = self.settings.max_tokens,
                limit,
                provider = self.provider.name(),
                "Clamping max_tokens to provider limit"
            );
            limit
        } else {
            self.settings.max_tokens
        };

        CompletionRequest {
            model: self.settings.model.clone(),
            messages: context_window(turns, self.settings.context_window.max(1)),
            system: self.settings.system_prompt.clone(),
            max_tokens,
            temperature: self.settings.temperature,
        }
    }
}
