// Server configuration
//
// Purpose: Collect environment settings for the API server in one place
// Usage: ServerConfig::from_env() at startup; from_lookup() in tests

use std::time::Duration;

use crate::model_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Empty when unset; model calls then fail with `MissingApiKey`
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub model_timeout: Duration,
    pub cors_origins: Vec<String>,
    /// TTL for cached advice text
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    /// Upload limit for image endpoints
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            model_timeout: Duration::from_secs(60),
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 10_000,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unparseable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            gemini_api_key: lookup("GEMINI_API_KEY")
                .map(|k| k.trim().to_string())
                .unwrap_or_default(),
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.gemini_base_url),
            model_timeout: parsed("MODEL_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.model_timeout),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|o| split_origins(&o))
                .unwrap_or(defaults.cors_origins),
            cache_ttl: parsed("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_capacity: parsed("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            max_upload_bytes: defaults.max_upload_bytes,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins.len(), 2);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("GEMINI_API_KEY", " secret "),
            ("MODEL_TIMEOUT_SECS", "15"),
            ("CORS_ORIGINS", "https://farm.example, ,https://app.example"),
            ("CACHE_CAPACITY", "50"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini_api_key, "secret");
        assert_eq!(config.model_timeout, Duration::from_secs(15));
        assert_eq!(config.cors_origins, vec!["https://farm.example", "https://app.example"]);
        assert_eq!(config.cache_capacity, 50);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = config_from(&[("PORT", "eighty"), ("CACHE_TTL_SECS", "-1"), ("GEMINI_MODEL", "")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
    }
}
