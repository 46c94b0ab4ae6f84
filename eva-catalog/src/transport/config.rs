//! HTTP client configuration.
//!
//! Deserialized from the `[http]` table of the plugin configuration file.
//!
//! ```toml
//! [http]
//! pool_max_idle_per_host = 10
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! http_version = "http1"
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{PluginError, Result};

/// HTTP client settings for EVA calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections kept per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Total request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// HTTP version preference.
    #[serde(default)]
    pub http_version: HttpVersion,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            http_version: HttpVersion::default(),
        }
    }
}

impl HttpConfig {
    /// Validates timeouts are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidConfig`] if:
    /// - `timeout_secs` is outside 1-300
    /// - `connect_timeout_secs` is outside 1-60
    pub fn validate(&self) -> Result<()> {
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(PluginError::InvalidConfig(
                "http.timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if !(1..=60).contains(&self.connect_timeout_secs) {
            return Err(PluginError::InvalidConfig(
                "http.connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns timeout as Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP version preference.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 with prior knowledge.
    Http2,
    /// Negotiate (prefer HTTP/2, fall back to HTTP/1.1).
    #[default]
    Auto,
}

const fn default_pool_max_idle() -> usize {
    100
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 100);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_config_from_toml() {
        let toml = r#"
            pool_max_idle_per_host = 20
            timeout_secs = 45
            http_version = "http2"
        "#;

        let config: HttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.http_version, HttpVersion::Http2);
    }

    #[test]
    fn test_http_config_empty_toml_uses_defaults() {
        let config: HttpConfig = toml::from_str("").unwrap();
        assert_eq!(config, HttpConfig::default());
    }

    #[test]
    fn test_http_version_invalid_value() {
        let result = toml::from_str::<HttpConfig>(r#"http_version = "http3""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let edge = HttpConfig { timeout_secs: 300, connect_timeout_secs: 60, ..Default::default() };
        assert!(edge.validate().is_ok());

        for (timeout_secs, connect_timeout_secs) in [(0, 10), (301, 10), (30, 0), (30, 61)] {
            let config = HttpConfig { timeout_secs, connect_timeout_secs, ..Default::default() };
            assert!(matches!(config.validate(), Err(PluginError::InvalidConfig(_))));
        }
    }
}
