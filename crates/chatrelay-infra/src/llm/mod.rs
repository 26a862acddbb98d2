//! Inference provider implementations.
//!
//! Concrete [`LlmProvider`](chatrelay_core::llm::provider::LlmProvider)
//! implementations plus [`create_provider`], which builds the configured one
//! behind a [`BoxLlmProvider`].

pub mod openai_compat;

use secrecy::SecretString;

use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_types::config::ProviderSettings;
use chatrelay_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config;

/// Read the API key named by `settings.api_key_env` from the environment.
///
/// Returns `None` when the variable is unset or empty.
pub fn resolve_api_key(settings: &ProviderSettings) -> Option<SecretString> {
    std::env::var(&settings.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxLlmProvider`] from [`ProviderSettings`].
///
/// `base_url` overrides the well-known endpoint for any provider name.
/// Cloudflare requires `account_id` unless `base_url` is set.
///
/// # Errors
///
/// - [`LlmError::AuthenticationFailed`] when no API key is available.
/// - [`LlmError::InvalidRequest`] for an unknown provider without `base_url`,
///   a `base_url` without a model, or Cloudflare without an account id.
pub fn create_provider(
    settings: &ProviderSettings,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let model = settings.model.as_deref().unwrap_or_default();

    let oai_config = match (settings.base_url.as_deref(), settings.name.as_str()) {
        (Some(_), _) if model.is_empty() => {
            return Err(LlmError::InvalidRequest(
                "a custom base_url requires an explicit model".into(),
            ));
        }
        (Some(base_url), name) => config::custom_defaults(name, base_url, key, model),
        (None, "openai") => config::openai_defaults(key, model),
        (None, "gemini") => config::gemini_defaults(key, model),
        (None, "mistral") => config::mistral_defaults(key, model),
        (None, "cloudflare") => {
            let account_id = settings.account_id.as_deref().ok_or_else(|| {
                LlmError::InvalidRequest("cloudflare provider requires account_id".into())
            })?;
            config::cloudflare_defaults(key, account_id, model)
        }
        (None, other) => {
            return Err(LlmError::InvalidRequest(format!(
                "unknown provider '{other}' (set base_url for custom endpoints)"
            )));
        }
    };

    tracing::info!(
        provider = %oai_config.provider_name,
        model = %oai_config.model,
        base_url = %oai_config.base_url,
        "Inference provider configured"
    );

    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
}
