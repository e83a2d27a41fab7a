//! Client configuration
//!
//! Every field has a default so an empty file (or no file) is a valid
//! configuration. Values are layered: defaults, then the TOML file, then
//! `SOLSOCIAL_*` environment variables, then explicit `key=value` overrides.

use crate::errors::SocialError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment prefix for overrides (`SOLSOCIAL_POLLING_INTERVAL_MS=5000`).
pub const ENV_PREFIX: &str = "SOLSOCIAL_";

/// Dotted keys accepted by [`ClientConfig::set_from_string`].
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.request_timeout_ms",
    "api.auth_token",
    "polling.interval_ms",
    "polling.page_size",
    "receipts.min_signature_len",
    "notifications.max_notifications",
    "notifications.max_mentions",
    "storage.data_dir",
];

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Feed polling settings.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Receipt validation settings.
    #[serde(default)]
    pub receipts: ReceiptConfig,
    /// Notification retention settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Bearer token for the signed-in wallet.
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Feed polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Interval between ticks.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// Items requested per tick.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Receipt configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptConfig {
    /// Minimum plausible signature length.
    #[serde(default = "default_min_signature_len")]
    pub min_signature_len: usize,
}

/// Notification retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Notifications kept (and persisted).
    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,
    /// Recent mentions kept (and persisted).
    #[serde(default = "default_max_mentions")]
    pub max_mentions: usize,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_poll_interval_ms() -> u64 {
    30_000
}

fn default_page_size() -> u32 {
    20
}

fn default_min_signature_len() -> usize {
    32
}

fn default_max_notifications() -> usize {
    50
}

fn default_max_mentions() -> usize {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            auth_token: None,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            page_size: default_page_size(),
        }
    }
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            min_signature_len: default_min_signature_len(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_notifications: default_max_notifications(),
            max_mentions: default_max_mentions(),
        }
    }
}

impl PollingConfig {
    /// Tick interval as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ClientConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SocialError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, SocialError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SocialError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `SOLSOCIAL_*` environment overrides.
    pub fn merge_with_env(&mut self) -> Result<(), SocialError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from an explicit variable list (used by tests).
    ///
    /// Prefixed variables that name no config key are skipped with a warning;
    /// a bad value for a known key is still an error.
    pub fn merge_with_vars(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), SocialError> {
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match env_key_to_dotted(rest) {
                Some(dotted) if CONFIG_KEYS.contains(&dotted.as_str()) => {
                    self.set_from_string(&dotted, &value)?;
                }
                _ => tracing::warn!(variable = %key, "ignoring unknown config variable"),
            }
        }
        Ok(())
    }

    /// Set a single value by dotted key (`polling.interval_ms`).
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), SocialError> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SocialError> {
            value
                .trim()
                .parse()
                .map_err(|_| SocialError::config(format!("Invalid value for {key}: {value}")))
        }

        match key {
            "api.base_url" => self.api.base_url = value.trim().trim_end_matches('/').to_string(),
            "api.request_timeout_ms" => self.api.request_timeout_ms = parse(key, value)?,
            "api.auth_token" => {
                self.api.auth_token = Some(value.to_string()).filter(|s| !s.is_empty());
            }
            "polling.interval_ms" => self.polling.interval_ms = parse(key, value)?,
            "polling.page_size" => self.polling.page_size = parse(key, value)?,
            "receipts.min_signature_len" => self.receipts.min_signature_len = parse(key, value)?,
            "notifications.max_notifications" => {
                self.notifications.max_notifications = parse(key, value)?;
            }
            "notifications.max_mentions" => self.notifications.max_mentions = parse(key, value)?,
            "storage.data_dir" => self.storage.data_dir = value.to_string(),
            other => return Err(SocialError::config(format!("Unknown config key: {other}"))),
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SocialError> {
        if self.api.base_url.trim().is_empty() {
            return Err(SocialError::config("api.base_url must not be empty"));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(SocialError::config("api.request_timeout_ms must be > 0"));
        }
        if self.polling.interval_ms == 0 {
            return Err(SocialError::config("polling.interval_ms must be > 0"));
        }
        if self.polling.page_size == 0 {
            return Err(SocialError::config("polling.page_size must be > 0"));
        }
        if self.receipts.min_signature_len == 0 {
            return Err(SocialError::config(
                "receipts.min_signature_len must be > 0",
            ));
        }
        Ok(())
    }

    /// Data directory, falling back to the platform data dir.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("solsocial")
}

/// `POLLING_INTERVAL_MS` → `polling.interval_ms`; the first `_` splits section and field.
fn env_key_to_dotted(rest: &str) -> Option<String> {
    let lower = rest.to_ascii_lowercase();
    let (section, field) = lower.split_once('_')?;
    Some(format!("{section}.{field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.polling.interval(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = ClientConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://api.example.social"

            [polling]
            interval_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.social");
        assert_eq!(config.polling.interval_ms, 5000);
        assert_eq!(config.polling.page_size, 20);
        assert_eq!(config.notifications.max_notifications, 50);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config
            .merge_with_vars(vec![
                ("SOLSOCIAL_POLLING_INTERVAL_MS".into(), "1000".into()),
                ("SOLSOCIAL_API_BASE_URL".into(), "https://x.test/".into()),
                ("UNRELATED".into(), "1".into()),
            ])
            .unwrap();
        assert_eq!(config.polling.interval_ms, 1000);
        assert_eq!(config.api.base_url, "https://x.test");
    }

    #[test]
    fn test_unknown_env_variable_is_skipped() {
        let mut config = ClientConfig::default();
        config
            .merge_with_vars(vec![
                ("SOLSOCIAL_DATA_DIR".into(), "/tmp/elsewhere".into()),
                ("SOLSOCIAL_LOG".into(), "debug".into()),
                ("SOLSOCIAL_POLLING_PAGE_SIZE".into(), "5".into()),
            ])
            .unwrap();
        let mut expected = ClientConfig::default();
        expected.polling.page_size = 5;
        assert_eq!(config, expected);

        // A known key with a bad value still fails.
        let err = config
            .merge_with_vars(vec![("SOLSOCIAL_POLLING_PAGE_SIZE".into(), "lots".into())])
            .unwrap_err();
        assert!(matches!(err, SocialError::Config { .. }));
    }

    #[test]
    fn test_config_keys_are_all_settable() {
        let mut config = ClientConfig::default();
        for key in CONFIG_KEYS {
            let textual = matches!(*key, "api.base_url" | "api.auth_token" | "storage.data_dir");
            let value = if textual { "value" } else { "7" };
            config.set_from_string(key, value).unwrap();
        }
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let mut config = ClientConfig::default();
        let err = config.set_from_string("polling.page_size", "lots").unwrap_err();
        assert!(matches!(err, SocialError::Config { .. }));
        assert!(config.set_from_string("nope.key", "1").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = ClientConfig::default();
        config.polling.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[receipts]\nmin_signature_len = 40\n").unwrap();
        let config = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(config.receipts.min_signature_len, 40);

        assert!(ClientConfig::load_from_file(&dir.path().join("missing.toml")).is_err());
    }
}
