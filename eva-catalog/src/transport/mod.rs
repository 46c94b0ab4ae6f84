//! Transport abstraction for EVA calls.
//!
//! EVA messages are JSON over HTTP `POST`. The sealed [`Transport`] trait carries one
//! such call and returns the raw status and body; interpreting the status is left to the
//! caller, because search and detail lookups treat failures differently.
//!
//! # Examples
//!
//! ```rust,no_run
//! use eva_catalog::{
//!     eva::{HeaderContext, build_headers},
//!     transport::{HttpTransport, RequestContext, Transport},
//! };
//!
//! # async fn example() -> eva_catalog::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let headers = build_headers("Eva-Builder-Plugin", &HeaderContext::default());
//!
//! let ctx = RequestContext {
//!     url: "https://api.newblack.guc.prod.eva-online.global/message/SearchProducts",
//!     headers: &headers,
//! };
//!
//! let response = transport.post(ctx, br#"{"PageConfig":{}}"#).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::{error::Result, eva::HeaderMap, request::RequestDescriptor};

pub mod config;
pub mod http;
mod sealed;
#[cfg(test)]
pub(crate) mod mock;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// Parameters for one EVA call.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Fully-qualified endpoint URL.
    pub url: &'a str,
    /// Headers to send, including `Content-Type`.
    pub headers: &'a HeaderMap,
}

impl<'a> From<&'a RequestDescriptor> for RequestContext<'a> {
    fn from(descriptor: &'a RequestDescriptor) -> Self {
        Self { url: &descriptor.request.url, headers: &descriptor.request.headers }
    }
}

/// Raw response from a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status, if known.
    pub reason: Option<&'static str>,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human-readable status, e.g. `"503 Service Unavailable"`.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.reason.map_or_else(|| self.status.to_string(), |reason| {
            format!("{} {reason}", self.status)
        })
    }
}

/// Transport for EVA message calls.
///
/// This trait is sealed; [`HttpTransport`] is the only production implementation.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// Executes a POST request with a JSON body.
    ///
    /// Non-success statuses are returned, not turned into errors.
    ///
    /// # Errors
    ///
    /// Returns error if the request is rejected before sending or the HTTP exchange fails.
    fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Executes a request descriptor as-is.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::post`].
    fn execute<'a>(
        &'a self,
        descriptor: &'a RequestDescriptor,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a {
        self.post(RequestContext::from(descriptor), descriptor.request.body.as_bytes())
    }

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}
