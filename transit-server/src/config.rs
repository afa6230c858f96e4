//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::remote::{DEFAULT_BASE_URL, FetcherConfig};

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be a whole number of seconds, got {value}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding `aliases.json`, `transfers.json` and `lines/`.
    pub data_dir: PathBuf,

    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// MBTA API base URL.
    pub mbta_base_url: String,

    /// MBTA API key. Optional, but unauthenticated clients are heavily
    /// rate limited.
    pub mbta_api_key: Option<String>,

    /// Per-request timeout for MBTA calls, in seconds.
    pub mbta_timeout_secs: u64,

    /// Static assets served under `/static`, if set.
    pub web_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            mbta_base_url: DEFAULT_BASE_URL.to_string(),
            mbta_api_key: None,
            mbta_timeout_secs: 10,
            web_dir: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Unset and empty variables take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("TRANSIT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(addr) = get("TRANSIT_BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                var: "TRANSIT_BIND_ADDR",
                value: addr,
            })?;
        }

        if let Some(url) = get("MBTA_BASE_URL") {
            config.mbta_base_url = url;
        }

        config.mbta_api_key = get("MBTA_API_KEY");

        if let Some(timeout) = get("MBTA_TIMEOUT") {
            config.mbta_timeout_secs =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout {
                        var: "MBTA_TIMEOUT",
                        value: timeout,
                    })?;
        }

        config.web_dir = get("TRANSIT_WEB_DIR").map(PathBuf::from);

        Ok(config)
    }

    /// Fetcher settings for the MBTA client.
    pub fn fetcher_config(&self) -> FetcherConfig {
        let config = FetcherConfig::new(&self.mbta_base_url).with_timeout(self.mbta_timeout_secs);
        match &self.mbta_api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.mbta_base_url, "https://api-v3.mbta.com");
        assert_eq!(config.mbta_api_key, None);
        assert_eq!(config.mbta_timeout_secs, 10);
        assert_eq!(config.web_dir, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TRANSIT_DATA_DIR", "/srv/transit"),
            ("TRANSIT_BIND_ADDR", "0.0.0.0:9000"),
            ("MBTA_BASE_URL", "http://localhost:4000"),
            ("MBTA_API_KEY", "secret"),
            ("MBTA_TIMEOUT", "3"),
            ("TRANSIT_WEB_DIR", "web"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/transit"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.mbta_base_url, "http://localhost:4000");
        assert_eq!(config.mbta_api_key.as_deref(), Some("secret"));
        assert_eq!(config.mbta_timeout_secs, 3);
        assert_eq!(config.web_dir, Some(PathBuf::from("web")));
    }

    #[test]
    fn empty_values_take_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("MBTA_API_KEY", ""), ("MBTA_TIMEOUT", " ")]))
                .unwrap();
        assert_eq!(config.mbta_api_key, None);
        assert_eq!(config.mbta_timeout_secs, 10);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = ServerConfig::from_lookup(lookup(&[("TRANSIT_BIND_ADDR", "localhost")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "TRANSIT_BIND_ADDR is not a valid socket address: localhost"
        );

        let err = ServerConfig::from_lookup(lookup(&[("MBTA_TIMEOUT", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn fetcher_config_carries_mbta_settings() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("MBTA_API_KEY", "secret"),
            ("MBTA_TIMEOUT", "4"),
        ]))
        .unwrap();

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.base_url, "https://api-v3.mbta.com");
        assert_eq!(fetcher.api_key.as_deref(), Some("secret"));
        assert_eq!(fetcher.timeout_secs, 4);
    }
}
