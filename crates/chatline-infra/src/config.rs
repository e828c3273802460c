//! Client configuration loader.
//!
//! Reads `config.toml` (`~/.chatline/config.toml` by default) into
//! [`ClientConfig`]. A missing or malformed file falls back to defaults.

use std::path::{Path, PathBuf};

use chatline_types::config::ClientConfig;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CHATLINE_CONFIG_DIR";

/// Resolve the directory holding `config.toml`.
///
/// `CHATLINE_CONFIG_DIR` wins; otherwise `~/.chatline`, or `.chatline`
/// relative to the working directory when no home directory is known.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".chatline"))
        .unwrap_or_else(|| PathBuf::from(".chatline"))
}

pub fn default_config_path() -> PathBuf {
    resolve_config_dir().join("config.toml")
}

/// Load client configuration from `path`.
///
/// - Missing file: [`ClientConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_client_config(path: &Path) -> ClientConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use chatline_types::config::ToolResultRole;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn load_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
endpoint = "http://10.0.0.5:9000/chat"
tool_result_role = "user"
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(&path).await;
        assert_eq!(config.endpoint, "http://10.0.0.5:9000/chat");
        assert_eq!(config.tool_result_role, ToolResultRole::User);
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.idle_timeout_secs, 120);
    }

    #[tokio::test]
    async fn load_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(&path, "temperature = [not valid").await.unwrap();

        let config = load_client_config(&path).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn config_dir_env_override() {
        // SAFETY: No other test reads CHATLINE_CONFIG_DIR; restored immediately.
        unsafe {
            std::env::set_var(CONFIG_DIR_ENV, "/tmp/chatline-test-config");
        }
        let path = default_config_path();
        unsafe {
            std::env::remove_var(CONFIG_DIR_ENV);
        }
        assert_eq!(path, PathBuf::from("/tmp/chatline-test-config/config.toml"));
    }
}
