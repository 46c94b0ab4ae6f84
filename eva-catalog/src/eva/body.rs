//! EVA request bodies.
//!
//! EVA messages take PascalCase JSON bodies. Optional fields are omitted rather than
//! sent as `null`.

use serde::Serialize;

/// Paging options shared by list-style messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageConfig {
    /// Maximum number of items to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl PageConfig {
    /// Page config with an explicit size; zero means "let EVA decide".
    #[must_use]
    pub fn with_size(page_size: Option<u32>) -> Self {
        Self { page_size: page_size.filter(|size| *size > 0) }
    }
}

/// `SearchProducts` body.
///
/// # Examples
///
/// ```
/// use eva_catalog::eva::SearchProductsBody;
///
/// let body = SearchProductsBody::new("shoes", Some(5));
/// assert_eq!(
///     serde_json::to_string(&body)?,
///     r#"{"Query":"shoes","PageConfig":{"PageSize":5}}"#
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchProductsBody<'a> {
    /// Search term; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    /// Paging options.
    pub page_config: PageConfig,
}

impl<'a> SearchProductsBody<'a> {
    /// Creates a search body. An empty term searches the whole catalog.
    #[must_use]
    pub fn new(query: &'a str, page_size: Option<u32>) -> Self {
        Self {
            query: Some(query).filter(|q| !q.is_empty()),
            page_config: PageConfig::with_size(page_size),
        }
    }
}

/// `GetProductDetail` body used by the plugin's own lookups and by `to_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetailBody<'a> {
    /// Product id.
    #[serde(rename = "ID")]
    pub id: &'a str,
}

/// `GetProductDetail` body in filter form, used for host-executed request objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductFilterBody<'a> {
    /// Product filter.
    pub filter: ProductFilter<'a>,
    /// Always empty for detail lookups.
    pub page_config: PageConfig,
}

/// Filter section of [`ProductFilterBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFilter<'a> {
    /// Product id.
    #[serde(rename = "ProductID")]
    pub product_id: &'a str,
}

impl<'a> ProductFilterBody<'a> {
    /// Creates a filter body for one product.
    #[must_use]
    pub fn for_product(product_id: &'a str) -> Self {
        Self { filter: ProductFilter { product_id }, page_config: PageConfig::default() }
    }
}
