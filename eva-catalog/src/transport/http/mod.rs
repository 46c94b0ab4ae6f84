//! HTTP transport implementation.
//!
//! This module provides HTTP/1.1 and HTTP/2 transport using reqwest.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{PluginError, Result},
    transport::{RequestContext, Transport, TransportResponse, sealed},
};

/// Validates URL scheme and host.
fn validate_url(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PluginError::TransportError(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(PluginError::TransportError(format!("URL missing host: {url}")));
    }
    Ok(())
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(PluginError::TransportError(format!(
            "invalid header name {name:?}: control characters not allowed"
        )));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(PluginError::TransportError(format!(
            "invalid value for header {name}: control characters not allowed"
        )));
    }
    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling, keep-alive, and HTTP/2 multiplexing.
///
/// # Examples
///
/// ```
/// use eva_catalog::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
///
/// let config = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Default configuration:
    /// - Pool max idle per host: 100
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - HTTP version: Auto (prefer HTTP/2)
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(PluginError::HttpError)?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(skip(self, ctx, body), fields(url = ctx.url, body_len = body.len()))]
    async fn execute_post(
        &self,
        ctx: RequestContext<'_>,
        body: &[u8],
    ) -> Result<TransportResponse> {
        let url = Url::parse(ctx.url)
            .map_err(|e| PluginError::TransportError(format!("invalid URL {}: {e}", ctx.url)))?;
        validate_url(&url)?;

        for (name, value) in ctx.headers {
            validate_header(name, value)?;
        }

        let mut request = self.client.post(url);
        for (name, value) in ctx.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(body.to_vec()).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "EVA responded");

        let body = response.bytes().await.map_err(PluginError::HttpError)?.to_vec();

        Ok(TransportResponse { status: status.as_u16(), reason: status.canonical_reason(), body })
    }
}

impl Transport for HttpTransport {
    async fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse> {
        self.execute_post(ctx, body).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eva::HeaderMap;

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new();
        assert!(transport.is_ok());
        assert_eq!(transport.unwrap().protocol_name(), "http");
    }

    #[test]
    fn test_http_transport_protocol_name() {
        let http1 = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http1).unwrap().protocol_name(), "http/1.1");

        let http2 = HttpConfig { http_version: HttpVersion::Http2, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http2).unwrap().protocol_name(), "http/2");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url(&Url::parse("https://eva.test/message").unwrap()).is_ok());
        assert!(validate_url(&Url::parse("http://127.0.0.1:8080/message").unwrap()).is_ok());
        assert!(validate_url(&Url::parse("ftp://eva.test/").unwrap()).is_err());
        assert!(validate_url(&Url::parse("file:///tmp/x").unwrap()).is_err());
    }

    #[test]
    fn test_validate_header_rejects_crlf() {
        assert!(validate_header("Eva-Requested-OrganizationUnitID", "1").is_ok());
        assert!(validate_header("Eva-Requested-OrganizationUnitID", "").is_ok());
        assert!(validate_header("X-Test", "a\r\nInjected: 1").is_err());
        assert!(validate_header("X-\nTest", "a").is_err());
    }

    #[tokio::test]
    async fn test_post_invalid_url() {
        let transport = HttpTransport::new().unwrap();
        let headers = HeaderMap::new();
        let ctx = RequestContext { url: "not-a-url", headers: &headers };

        let result = transport.post(ctx, b"{}").await;
        assert!(matches!(result, Err(PluginError::TransportError(_))));
    }

    #[tokio::test]
    async fn test_post_rejects_header_injection() {
        let transport = HttpTransport::new().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("Eva-Requested-OrganizationUnitID".to_owned(), "1\r\nX-Evil: 1".to_owned());
        let ctx =
            RequestContext { url: "https://eva.test/message/SearchProducts", headers: &headers };

        let result = transport.post(ctx, b"{}").await;
        assert!(matches!(result, Err(PluginError::TransportError(_))));
    }
}
