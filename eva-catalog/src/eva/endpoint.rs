//! Endpoint and header construction.
//!
//! Maps a logical resource kind plus an optional resource id onto one of EVA's message
//! endpoints, and builds the fixed header set every EVA call carries.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, Result};

/// Production EVA message gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.newblack.guc.prod.eva-online.global/message";

/// Client identification sent in [`USER_AGENT_HEADER`].
pub const DEFAULT_USER_AGENT: &str = "Eva-Builder-Plugin";

/// Content type header name.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// EVA client identification header name.
pub const USER_AGENT_HEADER: &str = "Eva-User-Agent";

/// EVA organization context header name.
pub const ORGANIZATION_HEADER: &str = "Eva-Requested-OrganizationUnitID";

/// Header name to value mapping, ordered for stable serialization.
pub type HeaderMap = BTreeMap<String, String>;

/// Catalog entity categories served by the plugin.
///
/// Parsing any other kind fails with [`PluginError::UnsupportedResourceKind`].
///
/// # Examples
///
/// ```
/// use eva_catalog::eva::ResourceKind;
///
/// let kind: ResourceKind = "product".parse().unwrap();
/// assert_eq!(kind, ResourceKind::Product);
/// assert!("collection".parse::<ResourceKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Products from the EVA catalog.
    Product,
}

impl ResourceKind {
    /// Every supported kind, in the order the host lists them.
    pub const ALL: [Self; 1] = [Self::Product];

    /// Host-facing identifier (`"product"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
        }
    }

    /// Display name shown in the host's resource picker.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Product => "Product",
        }
    }

    /// Description shown in the host's resource picker.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Product => "All of your EVA products.",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "product" => Ok(Self::Product),
            other => Err(PluginError::UnsupportedResourceKind(other.to_owned())),
        }
    }
}

/// EVA message endpoints used by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaEndpoint {
    /// Full-text product search.
    SearchProducts,
    /// Single product lookup by id.
    GetProductDetail,
}

impl EvaEndpoint {
    /// Selects the endpoint for a resource kind.
    ///
    /// A non-empty resource id selects the detail endpoint; anything else searches.
    #[must_use]
    pub fn for_resource(kind: ResourceKind, resource_id: Option<&str>) -> Self {
        match kind {
            ResourceKind::Product => match resource_id {
                Some(id) if !id.is_empty() => Self::GetProductDetail,
                _ => Self::SearchProducts,
            },
        }
    }

    /// Message name as it appears in the URL path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SearchProducts => "SearchProducts",
            Self::GetProductDetail => "GetProductDetail",
        }
    }
}

impl fmt::Display for EvaEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves EVA endpoint URLs against a configurable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    base_url: String,
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl EndpointResolver {
    /// Creates a resolver for the given message base URL.
    ///
    /// A trailing slash on the base is ignored.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned() }
    }

    /// Returns the base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fully-qualified URL for an endpoint.
    #[must_use]
    pub fn url(&self, endpoint: EvaEndpoint) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Fully-qualified URL for a host resource kind string and optional id.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::UnsupportedResourceKind`] for any kind other than `"product"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eva_catalog::eva::EndpointResolver;
    ///
    /// let resolver = EndpointResolver::default();
    /// let url = resolver.resource_url("product", Some("P1"))?;
    /// assert!(url.ends_with("/GetProductDetail"));
    /// # Ok::<(), eva_catalog::PluginError>(())
    /// ```
    pub fn resource_url(&self, resource: &str, resource_id: Option<&str>) -> Result<String> {
        let kind = resource.parse::<ResourceKind>()?;
        Ok(self.url(EvaEndpoint::for_resource(kind, resource_id)))
    }
}

/// Per-plugin context for header construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderContext {
    /// EVA organization unit set the plugin acts for.
    pub organization_unit_set_id: Option<String>,
}

/// Builds the header set sent with every EVA call.
///
/// The organization id is copied verbatim and is not validated; when absent the header
/// is still sent, with an empty value.
#[must_use]
pub fn build_headers(user_agent: &str, ctx: &HeaderContext) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE_HEADER.to_owned(), "application/json".to_owned());
    headers.insert(USER_AGENT_HEADER.to_owned(), user_agent.to_owned());
    headers.insert(
        ORGANIZATION_HEADER.to_owned(),
        ctx.organization_unit_set_id.clone().unwrap_or_default(),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolver_urls() {
        let resolver = EndpointResolver::default();
        assert_eq!(
            resolver.url(EvaEndpoint::SearchProducts),
            "https://api.newblack.guc.prod.eva-online.global/message/SearchProducts"
        );
        assert_eq!(
            resolver.url(EvaEndpoint::GetProductDetail),
            "https://api.newblack.guc.prod.eva-online.global/message/GetProductDetail"
        );
    }

    #[test]
    fn test_resource_url_selects_detail_with_id() {
        let resolver = EndpointResolver::default();
        let url = resolver.resource_url("product", Some("123")).unwrap();
        assert!(url.ends_with("/GetProductDetail"));
    }

    #[test]
    fn test_resource_url_selects_search_without_id() {
        let resolver = EndpointResolver::default();
        assert!(resolver.resource_url("product", None).unwrap().ends_with("/SearchProducts"));
        assert!(resolver.resource_url("product", Some("")).unwrap().ends_with("/SearchProducts"));
    }

    #[test]
    fn test_resource_url_unsupported_kind() {
        let resolver = EndpointResolver::default();
        for kind in ["collection", "category", "Product", ""] {
            let err = resolver.resource_url(kind, Some("1")).unwrap_err();
            assert!(matches!(err, PluginError::UnsupportedResourceKind(ref k) if k == kind));
        }
    }

    #[test]
    fn test_custom_base_trailing_slash() {
        let resolver = EndpointResolver::new("https://eva.test/message/");
        assert_eq!(resolver.base_url(), "https://eva.test/message");
        assert_eq!(
            resolver.url(EvaEndpoint::SearchProducts),
            "https://eva.test/message/SearchProducts"
        );
    }

    #[test]
    fn test_resource_kind_round_trip_str() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
        assert_eq!(ResourceKind::Product.to_string(), "product");
        assert_eq!(ResourceKind::Product.display_name(), "Product");
    }

    #[test]
    fn test_build_headers_with_organization() {
        let ctx = HeaderContext { organization_unit_set_id: Some("org-42".to_owned()) };
        let headers = build_headers(DEFAULT_USER_AGENT, &ctx);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[CONTENT_TYPE_HEADER], "application/json");
        assert_eq!(headers[USER_AGENT_HEADER], "Eva-Builder-Plugin");
        assert_eq!(headers[ORGANIZATION_HEADER], "org-42");
    }

    #[test]
    fn test_build_headers_without_organization() {
        let headers = build_headers(DEFAULT_USER_AGENT, &HeaderContext::default());
        assert_eq!(headers[ORGANIZATION_HEADER], "");
    }

    #[test]
    fn test_build_headers_copies_organization_verbatim() {
        let ctx = HeaderContext { organization_unit_set_id: Some("  not validated ".to_owned()) };
        let headers = build_headers("custom-agent", &ctx);
        assert_eq!(headers[ORGANIZATION_HEADER], "  not validated ");
        assert_eq!(headers[USER_AGENT_HEADER], "custom-agent");
    }
}
