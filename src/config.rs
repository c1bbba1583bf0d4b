//! Environment-driven runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "Bookforge";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {detail}")]
    Invalid { name: &'static str, detail: String },
}

/// Runtime configuration assembled from the environment.
///
/// A missing API key is not an error: the service starts without an
/// upstream client and serves fallback artifacts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    pub access_tokens: Vec<String>,
    pub llm_timeout_secs: u64,
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENAI_API_KEY").filter(|v| !v.trim().is_empty());

        let base_url = lookup("OPENAI_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = lookup("OPENAI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                detail: format!("{bind_raw}: {e}"),
            })?;

        let access_tokens = lookup("ACCESS_TOKENS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let llm_timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "LLM_TIMEOUT_SECS",
                detail: format!("{raw}: {e}"),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let db_path = lookup("ARTIFACT_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_key,
            base_url,
            model,
            bind_addr,
            access_tokens,
            llm_timeout_secs,
            db_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.access_tokens.is_empty());
        assert_eq!(config.llm_timeout_secs, 120);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn blank_api_key_treated_as_absent() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn access_tokens_split_and_trimmed() {
        let config = config_from(&[("ACCESS_TOKENS", "alpha, beta ,,gamma")]).unwrap();
        assert_eq!(config.access_tokens, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn invalid_bind_addr_is_an_error() {
        let err = config_from(&[("BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }

    #[test]
    fn invalid_timeout_is_an_error() {
        let err = config_from(&[("LLM_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("LLM_TIMEOUT_SECS"));
    }

    #[test]
    fn full_environment_round_trip() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("OPENAI_MODEL", "llama3"),
            ("BIND_ADDR", "0.0.0.0:9090"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("ARTIFACT_DB_PATH", "/tmp/artifacts.db"),
        ])
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(config.llm_timeout_secs, 30);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/artifacts.db")));
    }
}
