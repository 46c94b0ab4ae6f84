//! Error types for the EVA catalog plugin.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Resource kind errors** ([`PluginError::UnsupportedResourceKind`],
//!   [`PluginError::UnknownResourceKind`]): the host asked for a catalog entity the plugin
//!   does not serve
//! - **Lookup errors** ([`PluginError::NotFound`]): EVA answered but had no such product
//! - **Network errors** ([`PluginError::HttpError`], [`PluginError::EvaError`],
//!   [`PluginError::TransportError`]): HTTP communication failures
//! - **Decoding errors** ([`PluginError::MalformedResponse`], [`PluginError::Serialization`])
//! - **Configuration errors** ([`PluginError::InvalidConfig`])
//!
//! # Failure Policy
//!
//! Single-product lookups fail hard and surface every error above to the host.
//! Product search is best-effort: network and decoding failures are logged and turned
//! into an empty result list by [`crate::service`], so they never reach the caller.
//!
//! # Examples
//!
//! ```
//! use eva_catalog::error::{PluginError, Result};
//!
//! fn require_product(kind: &str) -> Result<()> {
//!     if kind != "product" {
//!         return Err(PluginError::UnsupportedResourceKind(kind.to_owned()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_product("collection").is_err());
//! ```

use thiserror::Error;

/// Result type alias for plugin operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors that can occur in the EVA catalog plugin.
///
/// The error messages are designed to be surfaced by the host as-is.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum PluginError {
    /// URL or request construction was asked for a resource kind EVA does not serve.
    ///
    /// Raised when a resource kind string is parsed, before any request is assembled.
    ///
    /// # Examples
    ///
    /// ```
    /// use eva_catalog::error::PluginError;
    ///
    /// let err = PluginError::UnsupportedResourceKind("collection".to_owned());
    /// assert_eq!(err.to_string(), "Unsupported resource type: collection");
    /// ```
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceKind(String),

    /// The host referenced a resource type id that has no registered service.
    ///
    /// # Recovery
    ///
    /// Only ids returned by [`crate::data_plugin::DataPlugin::resource_types`] are valid.
    #[error("Unknown resource type id: {0}")]
    UnknownResourceKind(String),

    /// EVA returned a detail response without a `Result` payload.
    #[error("Product with ID {0} not found")]
    NotFound(String),

    /// HTTP request failed.
    ///
    /// This error wraps [`reqwest::Error`] and occurs when network communication with
    /// EVA fails. Common causes include:
    /// - Network timeouts (default: 30 seconds)
    /// - Connection refused
    /// - DNS resolution failures
    /// - TLS errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// EVA answered with a non-success HTTP status.
    #[error("Eva API error: {0}")]
    EvaError(String),

    /// EVA answered with a body that does not match the expected message shape.
    #[error("Malformed EVA response: {0}")]
    MalformedResponse(String),

    /// A request body or descriptor could not be encoded as JSON.
    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport rejected the request before sending it.
    ///
    /// Covers invalid URLs and header values containing control characters.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Plugin configuration failed to load or validate.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PluginError {
    /// Returns true for errors that a retry with the same input could fix.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::EvaError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PluginError::NotFound("P1".into());
        assert_eq!(error.to_string(), "Product with ID P1 not found");
    }

    #[test]
    fn test_unsupported_resource_kind() {
        let error = PluginError::UnsupportedResourceKind("order".to_owned());
        assert_eq!(error.to_string(), "Unsupported resource type: order");
    }

    #[test]
    fn test_unknown_resource_kind() {
        let error = PluginError::UnknownResourceKind("collection".to_owned());
        assert!(error.to_string().contains("collection"));
    }

    #[test]
    fn test_eva_error() {
        let error = PluginError::EvaError("Internal Server Error".into());
        assert_eq!(error.to_string(), "Eva API error: Internal Server Error");
    }

    #[test]
    fn test_serialization_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = PluginError::from(json_err);
        assert!(matches!(error, PluginError::Serialization(_)));
    }

    #[test]
    fn test_is_transient() {
        assert!(PluginError::EvaError("502".into()).is_transient());
        assert!(!PluginError::NotFound("x".into()).is_transient());
        assert!(!PluginError::InvalidConfig("x".into()).is_transient());
    }
}
