use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MingleConfig {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub completion: CompletionConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_url: String,
    /// Long-poll timeout in seconds for `getUpdates`.
    pub poll_timeout: u64,
    /// Bot token. Environment-only (`TELEGRAM_TOKEN`), never read from TOML.
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompletionConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// API key. Environment-only (`OPENAI_API_KEY`), never read from TOML.
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

impl Default for MingleConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            telegram: TelegramConfig::default(),
            completion: CompletionConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.telegram.org".into(),
            poll_timeout: 30,
            token: None,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".into(),
            model: "gpt-3.5-turbo-instruct".into(),
            max_tokens: 150,
            temperature: 0.7,
            api_key: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_mingle_dir()
            .join("profiles.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

/// Returns `~/.mingle/`
pub fn default_mingle_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".mingle")
}

/// Returns the default config file path: `~/.mingle/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mingle_dir().join("config.toml")
}

impl MingleConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MingleConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MINGLE_DB, MINGLE_LOG_LEVEL,
    /// TELEGRAM_TOKEN, OPENAI_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MINGLE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MINGLE_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("TELEGRAM_TOKEN") {
            self.telegram.token = Some(val);
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.completion.api_key = Some(val);
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MingleConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.telegram.poll_timeout, 30);
        assert_eq!(config.completion.model, "gpt-3.5-turbo-instruct");
        assert_eq!(config.completion.max_tokens, 150);
        assert!(config.storage.db_path.ends_with("profiles.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"

[telegram]
poll_timeout = 10

[completion]
model = "gpt-4o-mini"

[storage]
db_path = "/tmp/test.db"
"#;
        let config: MingleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.telegram.poll_timeout, 10);
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        // defaults still apply for unset fields
        assert_eq!(config.completion.max_tokens, 150);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MingleConfig::default();
        std::env::set_var("MINGLE_DB", "/tmp/override.db");
        std::env::set_var("MINGLE_LOG_LEVEL", "trace");
        std::env::set_var("TELEGRAM_TOKEN", "tok");
        std::env::set_var("OPENAI_API_KEY", "key");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.telegram.token.as_deref(), Some("tok"));
        assert_eq!(config.completion.api_key.as_deref(), Some("key"));

        // Clean up
        std::env::remove_var("MINGLE_DB");
        std::env::remove_var("MINGLE_LOG_LEVEL");
        std::env::remove_var("TELEGRAM_TOKEN");
        std::env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    fn secrets_never_come_from_toml() {
        let toml_str = r#"
[telegram]
token = "leaked"

[completion]
api_key = "leaked"
"#;
        let config: MingleConfig = toml::from_str(toml_str).unwrap();
        assert!(config.telegram.token.is_none());
        assert!(config.completion.api_key.is_none());
    }
}
