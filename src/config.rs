//! Runtime configuration
//!
//! Read from the process environment (after `.env` is loaded by the binaries).

use crate::error::OrchestrationError;
use crate::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub news_api_key: Option<String>,
    pub alpha_vantage_key: Option<String>,
    pub yahoo_base_url: String,
    pub alpha_vantage_base_url: String,
    pub news_api_base_url: String,
    /// Upper bound for each individual provider call.
    pub provider_timeout: Duration,
    pub port: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            news_api_key: None,
            alpha_vantage_key: None,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            alpha_vantage_base_url: DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string(),
            news_api_base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let provider_timeout = match non_empty("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    OrchestrationError::Config(format!(
                        "PROVIDER_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                if secs == 0 {
                    return Err(OrchestrationError::Config(
                        "PROVIDER_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.provider_timeout,
        };

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                OrchestrationError::Config(format!("PORT must be a valid port, got '{}'", raw))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            news_api_key: non_empty("NEWS_API_KEY"),
            alpha_vantage_key: non_empty("ALPHA_VANTAGE_KEY"),
            yahoo_base_url: non_empty("YAHOO_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.yahoo_base_url),
            alpha_vantage_base_url: non_empty("ALPHA_VANTAGE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.alpha_vantage_base_url),
            news_api_base_url: non_empty("NEWS_API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.news_api_base_url),
            provider_timeout,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PipelineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.provider_timeout, Duration::from_secs(15));
        assert_eq!(config.port, 8080);
        assert!(config.news_api_key.is_none());
        assert_eq!(config.yahoo_base_url, DEFAULT_YAHOO_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("NEWS_API_KEY", "news-key"),
            ("ALPHA_VANTAGE_KEY", ""),
            ("PROVIDER_TIMEOUT_SECS", "3"),
            ("API_PORT", "9000"),
            ("YAHOO_BASE_URL", "http://localhost:1234/"),
        ]))
        .unwrap();

        assert_eq!(config.news_api_key.as_deref(), Some("news-key"));
        assert!(config.alpha_vantage_key.is_none());
        assert_eq!(config.provider_timeout, Duration::from_secs(3));
        assert_eq!(config.port, 9000);
        assert_eq!(config.yahoo_base_url, "http://localhost:1234");
    }

    #[test]
    fn test_malformed_values_rejected() {
        let err = PipelineConfig::from_lookup(lookup_from(&[("PROVIDER_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::Config(_)));

        let err = PipelineConfig::from_lookup(lookup_from(&[("PORT", "99999")])).unwrap_err();
        assert!(matches!(err, OrchestrationError::Config(_)));
    }
}
