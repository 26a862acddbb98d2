//! Configuration loader for chatrelay.
//!
//! Reads `config.toml` from the data directory (`~/.chatrelay/` by default)
//! into [`RelayConfig`]. A missing or malformed file falls back to defaults.

use std::path::{Path, PathBuf};

use chatrelay_types::config::RelayConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATRELAY_DATA_DIR";

/// Resolve the data directory.
///
/// `CHATRELAY_DATA_DIR` wins, then `~/.chatrelay`, then `./.chatrelay`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatrelay");
    }

    PathBuf::from(".chatrelay")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults, logged at debug.
/// - Unreadable or unparsable file: defaults, logged at warn.
/// - `chat.context_window = 0`: raised to 1 so inference always sees the
///   current user turn.
pub async fn load_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(mut config) => {
            if config.chat.context_window == 0 {
                tracing::warn!(
                    "chat.context_window = 0 in {} would send no turns, using 1",
                    config_path.display()
                );
                config.chat.context_window = 1;
            }
            tracing::debug!("Loaded configuration from {}", config_path.display());
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.chat.context_window, 10);
        assert_eq!(config.provider.name, "openai");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 9000

[chat]
context_window = 4
system_prompt = "You are terse."

[provider]
name = "cloudflare"
model = "@cf/meta/llama-3.3-70b-instruct-fp8-fast"
api_key_env = "CLOUDFLARE_API_TOKEN"
account_id = "abc123"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chat.context_window, 4);
        assert_eq!(config.chat.max_tokens, 1024);
        assert_eq!(config.chat.system_prompt.as_deref(), Some("You are terse."));
        assert_eq!(config.provider.name, "cloudflare");
        assert_eq!(config.provider.account_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 8787);
    }

    #[tokio::test]
    async fn load_config_zero_context_window_is_raised_to_one() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "[chat]\ncontext_window = 0\n")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.chat.context_window, 1);
        assert_eq!(config.chat.max_tokens, 1024);
    }

    #[test]
    fn resolve_data_dir_ends_with_chatrelay_or_env() {
        let dir = resolve_data_dir();
        match std::env::var(DATA_DIR_ENV) {
            Ok(env) => assert_eq!(dir, PathBuf::from(env)),
            Err(_) => assert!(dir.ends_with(".chatrelay")),
        }
    }
}
