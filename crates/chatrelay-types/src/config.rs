//! Global configuration types for chatrelay.
//!
//! `RelayConfig` represents the top-level `config.toml` that controls the
//! listen address, the chat context window, and the inference provider.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.chatrelay/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub provider: ProviderSettings,
}

/// HTTP listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Per-request chat behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of trailing turns sent to inference. At least 1 is used.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Optional system prompt prepended to every inference call. Never stored
    /// in a conversation log.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_context_window() -> usize {
    10
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: None,
        }
    }
}

/// Which inference provider to call and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Well-known name ("openai", "mistral", "gemini", "cloudflare") or any
    /// label when `base_url` is set.
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Model id. Unset selects the provider's default model.
    #[serde(default)]
    pub model: Option<String>,
    /// Override the provider's default endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Cloudflare account id (Workers AI only).
    #[serde(default)]
    pub account_id: Option<String>,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            model: None,
            base_url: None,
            api_key_env: default_api_key_env(),
            account_id: None,
        }
    }
}
