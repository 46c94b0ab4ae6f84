//! Plugin configuration.
//!
//! This module defines the TOML-deserializable configuration for one plugin activation.
//!
//! ```toml
//! base_url = "https://api.newblack.guc.prod.eva-online.global/message"
//! search_page_size = 20
//!
//! [settings]
//! organizationUnitSetID = "42"
//!
//! [cache]
//! capacity = 512
//! ttl_secs = 600
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::{num::NonZeroUsize, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::{
    cache::LookupCache,
    error::{PluginError, Result},
    eva::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
    plugin::Settings,
    transport::HttpConfig,
};

/// Largest page size EVA accepts from this plugin.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Root plugin configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginConfig {
    /// EVA message gateway base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Eva-User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page size for the commerce service's own product search.
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,

    /// Host-provided plugin settings.
    #[serde(default)]
    pub settings: Settings,

    /// Lookup cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP client configuration.
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            search_page_size: default_search_page_size(),
            settings: Settings::default(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl PluginConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidConfig`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use eva_catalog::config::PluginConfig;
    ///
    /// let config = PluginConfig::from_toml(r#"
    ///     [settings]
    ///     organizationUnitSetID = "42"
    /// "#)?;
    /// assert_eq!(config.settings.organization_unit_set_id(), Some("42"));
    /// # Ok::<(), eva_catalog::PluginError>(())
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PluginError::InvalidConfig(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the configuration is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PluginError::InvalidConfig(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Validates the configuration.
    ///
    /// This method checks that:
    /// - `base_url` is an `http`/`https` URL with a host
    /// - `user_agent` is non-empty and free of control characters
    /// - `search_page_size` is within 1 to [`MAX_PAGE_SIZE`]
    /// - the cache and HTTP sections are valid
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidConfig`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            PluginError::InvalidConfig(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PluginError::InvalidConfig(format!(
                "base_url must use http or https, got: {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(PluginError::InvalidConfig(format!(
                "base_url has no host: {}",
                self.base_url
            )));
        }

        if self.user_agent.trim().is_empty() || self.user_agent.chars().any(char::is_control) {
            return Err(PluginError::InvalidConfig(
                "user_agent must be non-empty printable text".to_owned(),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.search_page_size) {
            return Err(PluginError::InvalidConfig(format!(
                "search_page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        self.cache.validate()?;
        self.http.validate()
    }
}

/// Lookup cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached products.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Maximum entry age in seconds; `0` disables expiry.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: default_cache_capacity(), ttl_secs: default_cache_ttl_secs() }
    }
}

impl CacheConfig {
    /// Validates the cache configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidConfig`] if the capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(PluginError::InvalidConfig("cache.capacity must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Maximum entry age, `None` when expiry is disabled.
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        if self.ttl_secs == 0 { None } else { Some(Duration::from_secs(self.ttl_secs)) }
    }

    /// Builds an empty cache with these limits.
    ///
    /// A zero capacity that skipped validation falls back to a single entry.
    #[must_use]
    pub fn build(&self) -> LookupCache {
        let capacity = NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN);
        LookupCache::new(capacity, self.ttl())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

const fn default_search_page_size() -> u32 {
    20
}

const fn default_cache_capacity() -> usize {
    512
}

const fn default_cache_ttl_secs() -> u64 {
    600
}

#[cfg(test)]
#[allow(
    clippy::unreachable,
    reason = "test code uses unreachable for expected-path assertions"
)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PluginConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, "Eva-Builder-Plugin");
        assert_eq!(config.search_page_size, 20);
        assert_eq!(config.cache.capacity, 512);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(600)));
        assert!(config.settings.organization_unit_set_id().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PluginConfig::from_toml("").unwrap();
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let toml = r#"
            base_url = "https://eva.example.com/message"
            user_agent = "Custom-Agent"
            search_page_size = 50

            [settings]
            organizationUnitSetID = "ou-7"

            [cache]
            capacity = 16
            ttl_secs = 0

            [http]
            timeout_secs = 5
            http_version = "http1"
        "#;

        let config = PluginConfig::from_toml(toml).unwrap();
        assert_eq!(config.base_url, "https://eva.example.com/message");
        assert_eq!(config.user_agent, "Custom-Agent");
        assert_eq!(config.search_page_size, 50);
        assert_eq!(config.settings.organization_unit_set_id(), Some("ou-7"));
        assert_eq!(config.cache.capacity, 16);
        assert!(config.cache.ttl().is_none());
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_toml() {
        let Err(PluginError::InvalidConfig(msg)) = PluginConfig::from_toml("base_url = [") else {
            unreachable!("expected InvalidConfig error")
        };
        assert!(msg.contains("invalid TOML config"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        for base_url in ["not a url", "ftp://eva.test/message", "mailto:ops@eva.test"] {
            let config = PluginConfig { base_url: base_url.to_owned(), ..Default::default() };
            assert!(
                matches!(config.validate(), Err(PluginError::InvalidConfig(_))),
                "{base_url} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_plain_http_base_url() {
        let config =
            PluginConfig {
                base_url: "http://127.0.0.1:9000/message".to_owned(),
                ..Default::default()
            };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_user_agent() {
        for user_agent in ["", "   ", "agent\r\nX-Injected: 1"] {
            let config = PluginConfig { user_agent: user_agent.to_owned(), ..Default::default() };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_rejects_page_size_out_of_bounds() {
        for search_page_size in [0, 101] {
            let config = PluginConfig { search_page_size, ..Default::default() };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_rejects_zero_cache_capacity() {
        let result = PluginConfig::from_toml("[cache]\ncapacity = 0");
        assert!(matches!(result, Err(PluginError::InvalidConfig(_))));
    }

    #[test]
    fn test_cache_config_build() {
        let cache = CacheConfig { capacity: 3, ttl_secs: 10 }.build();
        assert_eq!(cache.capacity().get(), 3);
        assert_eq!(cache.ttl(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eva.toml");
        std::fs::write(&path, "search_page_size = 10\n").unwrap();

        let config = PluginConfig::from_file(&path).unwrap();
        assert_eq!(config.search_page_size, 10);
    }

    #[test]
    fn test_from_file_not_found() {
        let Err(PluginError::InvalidConfig(msg)) =
            PluginConfig::from_file("/nonexistent/path/eva.toml")
        else {
            unreachable!("expected InvalidConfig error")
        };
        assert!(msg.contains("cannot read config file"));
    }
}
