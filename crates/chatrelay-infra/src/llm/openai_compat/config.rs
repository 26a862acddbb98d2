//! Configuration types and per-provider defaults for OpenAI-compatible providers.
//!
//! Every supported backend speaks the OpenAI chat completions protocol; each
//! gets a factory returning an [`OpenAiCompatConfig`] with its base URL and
//! limits.

use chatrelay_types::llm::ProviderCapabilities;
use secrecy::SecretString;

/// Configuration for an OpenAI-compatible provider.
///
/// Does not derive Debug; `api_key` is a secret.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "cloudflare").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves `model` empty.
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const MISTRAL_DEFAULT_MODEL: &str = "mistral-small-latest";
pub const CLOUDFLARE_DEFAULT_MODEL: &str = "@cf/meta/llama-3.3-70b-instruct-fp8-fast";

fn model_or<'a>(model: &'a str, default: &'a str) -> &'a str {
    if model.is_empty() {
        default
    } else {
        model
    }
}

/// OpenAI. Base URL `https://api.openai.com/v1`; 16K output.
///
/// In every factory below an empty `model` selects the provider's default.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model_or(model, OPENAI_DEFAULT_MODEL).into(),
        capabilities: ProviderCapabilities {
            max_output_tokens: 16_384,
        },
    }
}

/// Google Gemini through its OpenAI-compatible beta endpoint; 64K output.
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        model: model_or(model, GEMINI_DEFAULT_MODEL).into(),
        capabilities: ProviderCapabilities {
            max_output_tokens: 65_536,
        },
    }
}

/// Mistral AI. Base URL `https://api.mistral.ai/v1`; 32K output.
pub fn mistral_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "mistral".into(),
        base_url: "https://api.mistral.ai/v1".into(),
        api_key,
        model: model_or(model, MISTRAL_DEFAULT_MODEL).into(),
        capabilities: ProviderCapabilities {
            max_output_tokens: 32_768,
        },
    }
}

/// Cloudflare Workers AI through the account-scoped OpenAI-compatible endpoint.
///
/// Base URL: `https://api.cloudflare.com/client/v4/accounts/{account_id}/ai/v1`.
pub fn cloudflare_defaults(
    api_key: SecretString,
    account_id: &str,
    model: &str,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "cloudflare".into(),
        base_url: format!("https://api.cloudflare.com/client/v4/accounts/{account_id}/ai/v1"),
        api_key,
        model: model_or(model, CLOUDFLARE_DEFAULT_MODEL).into(),
        capabilities: ProviderCapabilities {
            max_output_tokens: 4_096,
        },
    }
}

/// Any other OpenAI-compatible endpoint. There is no default model here;
/// the output limit is a conservative guess.
pub fn custom_defaults(
    provider_name: &str,
    base_url: &str,
    api_key: SecretString,
    model: &str,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: provider_name.into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_output_tokens: 4_096,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("test-key".to_string())
    }

    #[test]
    fn test_cloudflare_base_url_includes_account() {
        let config = cloudflare_defaults(key(), "acct42", "");
        assert_eq!(
            config.base_url,
            "https://api.cloudflare.com/client/v4/accounts/acct42/ai/v1"
        );
        assert_eq!(config.model, CLOUDFLARE_DEFAULT_MODEL);
    }

    #[test]
    fn test_cloudflare_explicit_model_kept() {
        let config = cloudflare_defaults(key(), "acct42", "@cf/mistral/mistral-7b-instruct-v0.1");
        assert_eq!(config.model, "@cf/mistral/mistral-7b-instruct-v0.1");
    }

    #[test]
    fn test_empty_model_selects_provider_default() {
        assert_eq!(openai_defaults(key(), "").model, OPENAI_DEFAULT_MODEL);
        assert_eq!(mistral_defaults(key(), "").model, MISTRAL_DEFAULT_MODEL);
        assert_eq!(gemini_defaults(key(), "gemini-2.5-pro").model, "gemini-2.5-pro");
    }

    #[test]
    fn test_custom_trims_trailing_slash() {
        let config = custom_defaults("local", "http://localhost:11434/v1/", key(), "llama3");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.provider_name, "local");
    }
}
