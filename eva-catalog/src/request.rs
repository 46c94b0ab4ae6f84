//! Declarative request descriptors.
//!
//! A [`RequestDescriptor`] describes an EVA call without performing it, so the host can
//! execute it under its own transport policy. [`RequestBuilder`] is the single place
//! request URLs, headers and bodies are assembled; the commerce service uses the same
//! builder for the calls it performs itself.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    eva::{
        EndpointResolver, EvaEndpoint, HeaderContext, HeaderMap, ProductDetailBody,
        ProductFilterBody, ResourceKind, SearchProductsBody, build_headers,
    },
};

/// `@type` tag the host uses to recognise request descriptors.
pub const REQUEST_TYPE_TAG: &str = "@builder.io/core:Request";

/// Serializable description of an HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Always [`REQUEST_TYPE_TAG`].
    #[serde(rename = "@type")]
    pub type_tag: String,
    /// The HTTP request.
    pub request: HttpRequest,
    /// Extra hints for the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Map<String, serde_json::Value>>,
}

/// HTTP request section of a [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Fully-qualified URL.
    pub url: String,
    /// HTTP method; EVA messages are always `POST`.
    pub method: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// JSON-encoded request body.
    pub body: String,
}

impl RequestDescriptor {
    fn post(url: String, headers: HeaderMap, body: String) -> Self {
        Self {
            type_tag: REQUEST_TYPE_TAG.to_owned(),
            request: HttpRequest { url, method: "POST".to_owned(), headers, body },
            options: None,
        }
    }

    /// Parses the JSON body back into a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn body_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.request.body)?)
    }
}

/// Assembles EVA requests for one plugin session.
///
/// Holds the resolved base URL and the fixed header set, both read-only after
/// construction.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoints: EndpointResolver,
    headers: HeaderMap,
}

impl RequestBuilder {
    /// Creates a builder from an endpoint resolver and header context.
    #[must_use]
    pub fn new(endpoints: EndpointResolver, user_agent: &str, ctx: &HeaderContext) -> Self {
        Self { endpoints, headers: build_headers(user_agent, ctx) }
    }

    /// `GetProductDetail` request with an `ID` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded.
    pub fn product_detail(&self, id: &str) -> Result<RequestDescriptor> {
        let body = serde_json::to_string(&ProductDetailBody { id })?;
        Ok(RequestDescriptor::post(
            self.endpoints.url(EvaEndpoint::GetProductDetail),
            self.headers.clone(),
            body,
        ))
    }

    /// `GetProductDetail` request with a `Filter.ProductID` body and a `product` option.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded.
    pub fn product_filter(&self, id: &str) -> Result<RequestDescriptor> {
        let body = serde_json::to_string(&ProductFilterBody::for_product(id))?;
        let mut descriptor = RequestDescriptor::post(
            self.endpoints.url(EvaEndpoint::GetProductDetail),
            self.headers.clone(),
            body,
        );
        let mut options = serde_json::Map::new();
        options.insert("product".to_owned(), serde_json::Value::String(id.to_owned()));
        descriptor.options = Some(options);
        Ok(descriptor)
    }

    /// `SearchProducts` request.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded.
    pub fn product_search(&self, query: &str, page_size: Option<u32>) -> Result<RequestDescriptor> {
        let body = serde_json::to_string(&SearchProductsBody::new(query, page_size))?;
        Ok(RequestDescriptor::post(
            self.endpoints.url(EvaEndpoint::SearchProducts),
            self.headers.clone(),
            body,
        ))
    }

    /// Detail or search request for a resource kind, depending on whether an entry id
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded.
    pub fn for_resource(
        &self,
        kind: ResourceKind,
        entry: Option<&str>,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Result<RequestDescriptor> {
        match (EvaEndpoint::for_resource(kind, entry), entry) {
            (EvaEndpoint::GetProductDetail, Some(id)) => self.product_detail(id),
            _ => self.product_search(query.unwrap_or_default(), limit),
        }
    }
}
