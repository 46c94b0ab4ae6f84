//! Commerce service adapter.
//!
//! [`CatalogOperations`] is the capability record the host calls for one resource kind.
//! [`ProductService`] implements it against EVA: lookups by id or handle go through the
//! [`LookupCache`], search always reaches EVA and degrades to an empty list on failure.
//! [`CommerceService`] maps each [`ResourceKind`] to its implementation.

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use tracing::{info, instrument, warn};

use crate::{
    cache::{CacheKey, LookupCache},
    error::{PluginError, Result},
    eva::{EvaDetailResponse, EvaSearchResponse, ResourceKind},
    mapper::{map_detail_response, map_search_response},
    request::{RequestBuilder, RequestDescriptor},
    resource::Resource,
    transport::Transport,
};

/// Operations the host performs on one resource kind.
pub trait CatalogOperations: Send + Sync {
    /// Looks up a single entry by id, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] if EVA has no such entry, or a transport,
    /// status or decode error if the lookup itself fails.
    fn find_by_id<'a>(&'a self, id: &'a str) -> impl Future<Output = Result<Resource>> + Send + 'a;

    /// Looks up a single entry by handle, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogOperations::find_by_id`].
    fn find_by_handle<'a>(
        &'a self,
        handle: &'a str,
    ) -> impl Future<Output = Result<Resource>> + Send + 'a;

    /// Full-text search. Never cached.
    ///
    /// Failures are logged and produce an empty list.
    fn search<'a>(&'a self, term: &'a str) -> impl Future<Output = Vec<Resource>> + Send + 'a;

    /// Request descriptor the host can execute to fetch one entry itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the request body cannot be encoded.
    fn request_object(&self, id: &str) -> Result<RequestDescriptor>;
}

/// EVA-backed product operations.
#[derive(Debug)]
pub struct ProductService<T> {
    transport: T,
    requests: RequestBuilder,
    cache: LookupCache,
    search_page_size: u32,
}

impl<T: Transport> ProductService<T> {
    /// Creates a product service.
    #[must_use]
    pub const fn new(
        transport: T,
        requests: RequestBuilder,
        cache: LookupCache,
        search_page_size: u32,
    ) -> Self {
        Self { transport, requests, cache, search_page_size }
    }

    /// Returns the lookup cache.
    #[must_use]
    pub const fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Returns the request builder.
    #[must_use]
    pub const fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    async fn lookup(&self, key: CacheKey<'_>, id: &str) -> Result<Resource> {
        if let Some(resource) = self.cache.get(key) {
            return Ok(resource);
        }

        let resource = self.fetch_detail(id).await?;
        self.cache.insert(key, resource.clone());
        Ok(resource)
    }

    #[instrument(skip(self), fields(protocol = self.transport.protocol_name()))]
    async fn fetch_detail(&self, id: &str) -> Result<Resource> {
        let descriptor = self.requests.product_detail(id)?;
        info!("fetching product detail");

        let response = self.transport.execute(&descriptor).await?;
        if !response.is_success() {
            return Err(PluginError::EvaError(response.status_text()));
        }

        let detail: EvaDetailResponse = serde_json::from_slice(&response.body).map_err(|e| {
            PluginError::MalformedResponse(format!("GetProductDetail response: {e}"))
        })?;
        map_detail_response(id, detail)
    }

    async fn try_search(&self, term: &str) -> Result<Vec<Resource>> {
        let descriptor = self.requests.product_search(term, Some(self.search_page_size))?;
        info!("searching products");

        let response = self.transport.execute(&descriptor).await?;
        if !response.is_success() {
            return Err(PluginError::EvaError(response.status_text()));
        }

        let results: EvaSearchResponse = serde_json::from_slice(&response.body).map_err(|e| {
            PluginError::MalformedResponse(format!("SearchProducts response: {e}"))
        })?;
        Ok(map_search_response(results))
    }
}

impl<T: Transport> CatalogOperations for ProductService<T> {
    async fn find_by_id<'a>(&'a self, id: &'a str) -> Result<Resource> {
        self.lookup(CacheKey::ProductId(id), id).await
    }

    async fn find_by_handle<'a>(&'a self, handle: &'a str) -> Result<Resource> {
        self.lookup(CacheKey::ProductHandle(handle), handle).await
    }

    #[instrument(skip(self), fields(protocol = self.transport.protocol_name()))]
    async fn search<'a>(&'a self, term: &'a str) -> Vec<Resource> {
        match self.try_search(term).await {
            Ok(resources) => resources,
            Err(error) => {
                warn!(%error, "product search failed, returning no results");
                Vec::new()
            }
        }
    }

    fn request_object(&self, id: &str) -> Result<RequestDescriptor> {
        self.requests.product_filter(id)
    }
}

/// Registry of catalog operations per resource kind.
#[derive(Debug)]
pub struct CommerceService<T> {
    products: ProductService<T>,
}

impl<T: Transport> CommerceService<T> {
    /// Creates the registry.
    #[must_use]
    pub const fn new(products: ProductService<T>) -> Self {
        Self { products }
    }

    /// Operations for a resource kind.
    #[must_use]
    pub const fn resolve(&self, kind: ResourceKind) -> &ProductService<T> {
        match kind {
            ResourceKind::Product => &self.products,
        }
    }

    /// Operations for a host resource type id.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::UnknownResourceKind`] if no operations are registered
    /// under `id`.
    pub fn resolve_id(&self, id: &str) -> Result<&ProductService<T>> {
        let kind = id
            .parse::<ResourceKind>()
            .map_err(|_| PluginError::UnknownResourceKind(id.to_owned()))?;
        Ok(self.resolve(kind))
    }
}

#[cfg(test)]
#[allow(
    clippy::unreachable,
    reason = "test code uses unreachable for expected-path assertions"
)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        eva::{EndpointResolver, HeaderContext, ORGANIZATION_HEADER},
        transport::mock::MockTransport,
    };

    fn service(transport: MockTransport) -> ProductService<MockTransport> {
        let ctx = HeaderContext { organization_unit_set_id: Some("ou-1".to_owned()) };
        let endpoints = EndpointResolver::new("https://eva.test/message");
        let requests = RequestBuilder::new(endpoints, "test-agent", &ctx);
        ProductService::new(transport, requests, LookupCache::default(), 20)
    }

    fn detail(id: &str) -> serde_json::Value {
        json!({
            "Result": {
                "product_id": id,
                "display_value": format!("Product {id}"),
                "primary_image": { "blob": "b", "url": format!("https://img.test/{id}.jpg") }
            }
        })
    }

    #[tokio::test]
    async fn test_find_by_id_fetches_once() {
        let service = service(MockTransport::new().respond(200, &detail("P1")));

        let first = service.find_by_id("P1").await.unwrap();
        let second = service.find_by_id("P1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.title, "Product P1");
        assert_eq!(service.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id_sends_detail_request() {
        let service = service(MockTransport::new().respond(200, &detail("P1")));
        service.find_by_id("P1").await.unwrap();

        let requests = service.transport().requests();
        assert_eq!(requests[0].url, "https://eva.test/message/GetProductDetail");
        assert_eq!(requests[0].body, json!({ "ID": "P1" }));
        assert_eq!(requests[0].headers[ORGANIZATION_HEADER], "ou-1");
    }

    #[tokio::test]
    async fn test_id_and_handle_cached_separately() {
        let service = service(
            MockTransport::new().respond(200, &detail("X")).respond(200, &detail("X")),
        );

        service.find_by_id("X").await.unwrap();
        service.find_by_handle("X").await.unwrap();
        service.find_by_handle("X").await.unwrap();

        assert_eq!(service.transport().calls(), 2);
        assert_eq!(service.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let service = service(MockTransport::new().respond(200, &json!({})));

        let Err(PluginError::NotFound(id)) = service.find_by_id("missing").await else {
            unreachable!("expected NotFound")
        };
        assert_eq!(id, "missing");
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_id_error_status() {
        let service = service(MockTransport::new().respond(503, &json!({})));

        let Err(PluginError::EvaError(status)) = service.find_by_id("P1").await else {
            unreachable!("expected EvaError")
        };
        assert_eq!(status, "503 Service Unavailable");
    }

    #[tokio::test]
    async fn test_find_by_id_malformed_body() {
        let service = service(MockTransport::new().respond_raw(200, b"<html>".to_vec()));
        let result = service.find_by_id("P1").await;
        assert!(matches!(result, Err(PluginError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_failed_lookup_not_cached() {
        let service = service(
            MockTransport::new()
                .fail(PluginError::TransportError("connection reset".to_owned()))
                .respond(200, &detail("P1")),
        );

        assert!(service.find_by_id("P1").await.is_err());
        assert!(service.find_by_id("P1").await.is_ok());
        assert_eq!(service.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_search_maps_products() {
        let body = json!({
            "Products": [
                { "product_id": "1", "display_value": "One" },
                { "product_id": 2, "display_value": "Two" }
            ]
        });
        let service = service(MockTransport::new().respond(200, &body));

        let results = service.search("o").await;
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);

        let requests = service.transport().requests();
        assert!(requests[0].url.ends_with("/SearchProducts"));
        assert_eq!(requests[0].body, json!({ "Query": "o", "PageConfig": { "PageSize": 20 } }));
    }

    #[tokio::test]
    async fn test_search_keeps_products_beside_bad_item() {
        let body = json!({
            "Products": [
                { "product_id": "1", "display_value": "One" },
                { "display_value": "no id" }
            ]
        });
        let service = service(MockTransport::new().respond(200, &body));

        let results = service.search("x").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
        assert_eq!(results[0].title, "One");
    }

    #[tokio::test]
    async fn test_search_empty_term_omits_query() {
        let service = service(MockTransport::new().respond(200, &json!({ "Products": [] })));
        assert!(service.search("").await.is_empty());
        let requests = service.transport().requests();
        assert_eq!(requests[0].body, json!({ "PageConfig": { "PageSize": 20 } }));
    }

    #[tokio::test]
    async fn test_search_never_cached() {
        let body = json!({ "Products": [{ "product_id": "1" }] });
        let service =
            service(MockTransport::new().respond(200, &body).respond(200, &body));

        service.search("a").await;
        service.search("a").await;
        assert_eq!(service.transport().calls(), 2);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_search_failures_yield_empty() {
        let service = service(
            MockTransport::new()
                .respond(500, &json!({ "Error": "boom" }))
                .respond_raw(200, b"not json".to_vec())
                .fail(PluginError::TransportError("timeout".to_owned())),
        );

        assert!(service.search("a").await.is_empty());
        assert!(service.search("a").await.is_empty());
        assert!(service.search("a").await.is_empty());
    }

    #[test]
    fn test_request_object_uses_filter_body() {
        let service = service(MockTransport::new());
        let descriptor = service.request_object("P7").unwrap();

        assert!(descriptor.request.url.ends_with("/GetProductDetail"));
        assert_eq!(
            descriptor.body_json().unwrap(),
            json!({ "Filter": { "ProductID": "P7" }, "PageConfig": {} })
        );
        assert_eq!(descriptor.options.unwrap()["product"], "P7");
        assert_eq!(service.transport().calls(), 0);
    }

    #[test]
    fn test_registry_resolution() {
        let registry = CommerceService::new(service(MockTransport::new()));
        assert!(registry.resolve_id("product").is_ok());

        for id in ["collection", "Product", ""] {
            let Err(PluginError::UnknownResourceKind(kind)) = registry.resolve_id(id) else {
                unreachable!("expected UnknownResourceKind")
            };
            assert_eq!(kind, id);
        }
    }
}
