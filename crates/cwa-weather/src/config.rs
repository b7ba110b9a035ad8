//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables. The binary applies `--port` last.

use crate::forecast::Alignment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default CWA open-data API base URL.
pub const DEFAULT_BASE_URL: &str = "https://opendata.cwa.gov.tw/api";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Listening socket and deployment info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment name, only reported in logs
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: default_environment(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

/// CWA API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, without the `/v1/rest/datastore/...` path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// CWA authorization key. Requests fail with a configuration error while unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How weather element series are merged into periods
    #[serde(default)]
    pub alignment: Alignment,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            alignment: Alignment::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl UpstreamConfig {
    /// The API key, treating an empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Overlay `API_KEY`, `PORT` and `ENVIRONMENT_NAME` from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay environment-style settings read through `lookup`.
    ///
    /// `API_KEY` wins over the legacy `CWA_API_KEY`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY").or_else(|| lookup("CWA_API_KEY")) {
            self.upstream.api_key = Some(key);
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }

        if let Some(environment) = lookup("ENVIRONMENT_NAME") {
            self.server.environment = environment;
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.environment, "development");
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.upstream.alignment, Alignment::Index);
        assert!(config.upstream.api_key().is_none());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
upstream:
  api_key: CWA-TEST
  alignment: time
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.api_key(), Some("CWA-TEST"));
        assert_eq!(config.upstream.alignment, Alignment::Time);
        assert_eq!(config.upstream.timeout_secs, 10);
    }

    #[test]
    fn test_parse_invalid_alignment() {
        let result = Config::parse("upstream:\n  alignment: fuzzy\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 8080\n  environment: staging").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, "staging");
    }

    #[test]
    fn test_from_missing_file() {
        let result = Config::from_file("/nonexistent/cwa-weather.yaml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::parse("server:\n  port: 8080\n").unwrap();
        config
            .apply_env_with(env(&[
                ("API_KEY", "from-env"),
                ("PORT", "9000"),
                ("ENVIRONMENT_NAME", "production"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.environment, "production");
        assert_eq!(config.upstream.api_key(), Some("from-env"));
    }

    #[test]
    fn test_env_legacy_key_fallback() {
        let mut config = Config::default();
        config
            .apply_env_with(env(&[("CWA_API_KEY", "legacy")]))
            .unwrap();
        assert_eq!(config.upstream.api_key(), Some("legacy"));

        let mut config = Config::default();
        config
            .apply_env_with(env(&[("CWA_API_KEY", "legacy"), ("API_KEY", "primary")]))
            .unwrap();
        assert_eq!(config.upstream.api_key(), Some("primary"));
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = Config::default();
        let err = config
            .apply_env_with(env(&[("PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let mut config = Config::default();
        config.apply_env_with(env(&[("API_KEY", "  ")])).unwrap();
        assert!(config.upstream.api_key().is_none());
    }
}
