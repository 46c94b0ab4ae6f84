//! Data plugin descriptors.
//!
//! The host's content editor binds entries to data through a "data plugin": a named
//! source that lists resource types, builds request descriptors for them and lets the
//! editor pick individual entries. [`DataPlugin`] is that source for EVA.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{
    config::MAX_PAGE_SIZE,
    error::Result,
    eva::ResourceKind,
    request::{RequestBuilder, RequestDescriptor},
    resource::EntrySummary,
    service::{CatalogOperations, CommerceService},
    transport::Transport,
};

/// Data plugin display name.
pub const DATA_PLUGIN_NAME: &str = "EVA";

/// Data plugin icon shown by the host.
pub const DATA_PLUGIN_ICON: &str = "https://avatars.githubusercontent.com/u/14044098?s=200&v=4";

/// Identity of the data plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataPluginInfo {
    /// Display name.
    pub name: &'static str,
    /// Icon URL.
    pub icon: &'static str,
}

/// Value type of an editor input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Numeric input.
    Number,
    /// Free text input.
    String,
}

/// Input the editor renders for a resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    /// Label shown to the editor user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Parameter name passed back to [`ResourceTypeDescriptor::to_url`].
    pub name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Pre-filled value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Lower bound for numeric inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Upper bound for numeric inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl InputField {
    fn search() -> Self {
        Self {
            friendly_name: Some("Search".to_owned()),
            name: "query".to_owned(),
            input_type: InputType::String,
            default_value: None,
            min: None,
            max: None,
        }
    }

    fn limit() -> Self {
        Self {
            friendly_name: Some("limit".to_owned()),
            name: "limit".to_owned(),
            input_type: InputType::Number,
            default_value: Some(Value::from(10)),
            min: Some(1),
            max: Some(MAX_PAGE_SIZE),
        }
    }
}

/// Arguments of [`ResourceTypeDescriptor::to_url`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToUrlParams<'a> {
    /// Selected entry id.
    pub entry: Option<&'a str>,
    /// Search text.
    pub query: Option<&'a str>,
    /// Maximum number of results.
    pub limit: Option<u32>,
}

/// Resource type as presented to the editor.
///
/// Serializes to the host's descriptor shape; [`Self::to_url`] is the behavior attached
/// to it and is not serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDescriptor<'a> {
    /// Display name.
    pub name: &'static str,
    /// Resource type id.
    pub id: ResourceKind,
    /// Description.
    pub description: &'static str,
    /// Inputs for list bindings.
    pub inputs: Vec<InputField>,
    /// Inputs for the entry picker.
    pub entry_inputs: Vec<InputField>,
    /// Whether individual entries can be picked.
    pub can_pick_entries: bool,
    #[serde(skip)]
    requests: &'a RequestBuilder,
}

impl<'a> ResourceTypeDescriptor<'a> {
    fn new(kind: ResourceKind, requests: &'a RequestBuilder) -> Self {
        Self {
            name: kind.display_name(),
            id: kind,
            description: kind.description(),
            inputs: vec![InputField::limit(), InputField::search()],
            entry_inputs: vec![InputField::search()],
            can_pick_entries: true,
            requests,
        }
    }

    /// Builds the request the host runs to load this resource type.
    ///
    /// A non-empty entry selects a detail lookup; otherwise a search is built from the
    /// query and limit. An empty query and a zero limit count as absent, and limits above
    /// [`MAX_PAGE_SIZE`] are clamped. Nothing is sent and nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request body cannot be encoded.
    pub fn to_url(&self, params: &ToUrlParams<'_>) -> Result<RequestDescriptor> {
        let query = params.query.filter(|query| !query.is_empty());
        let limit = params.limit.filter(|&limit| limit > 0).map(|limit| limit.min(MAX_PAGE_SIZE));
        self.requests.for_resource(self.id, params.entry, query, limit)
    }
}

/// Options of [`DataPlugin::get_entries_by_resource_type`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryQuery {
    /// Fetch exactly this entry.
    #[serde(default)]
    pub resource_entry_id: Option<String>,
    /// Search text used when no entry id is given.
    #[serde(default)]
    pub search_text: Option<String>,
}

/// EVA data plugin bound to a commerce service.
#[derive(Debug)]
pub struct DataPlugin<'a, T> {
    service: &'a CommerceService<T>,
}

impl<'a, T: Transport> DataPlugin<'a, T> {
    /// Creates a data plugin over a commerce service.
    #[must_use]
    pub const fn new(service: &'a CommerceService<T>) -> Self {
        Self { service }
    }

    /// Name and icon.
    #[must_use]
    pub const fn info(&self) -> DataPluginInfo {
        DataPluginInfo { name: DATA_PLUGIN_NAME, icon: DATA_PLUGIN_ICON }
    }

    /// Descriptors for every supported resource kind.
    #[must_use]
    pub fn resource_types(&self) -> Vec<ResourceTypeDescriptor<'a>> {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| ResourceTypeDescriptor::new(kind, self.service.resolve(kind).requests()))
            .collect()
    }

    /// Entries for the editor's picker.
    ///
    /// With a non-empty `resource_entry_id` this returns that single entry; otherwise it
    /// returns the search results for `search_text`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PluginError::UnknownResourceKind`] for an unregistered resource
    /// type id, or the lookup error when fetching a single entry fails. Search failures
    /// produce an empty list.
    #[instrument(skip(self, options))]
    pub async fn get_entries_by_resource_type(
        &self,
        resource_type_id: &str,
        options: &EntryQuery,
    ) -> Result<Vec<EntrySummary>> {
        let operations = self.service.resolve_id(resource_type_id)?;

        if let Some(entry) = options.resource_entry_id.as_deref()
            && !entry.is_empty()
        {
            let resource = operations.find_by_id(entry).await?;
            return Ok(vec![EntrySummary::from(resource)]);
        }

        let term = options.search_text.as_deref().unwrap_or_default();
        let results = operations.search(term).await;
        Ok(results.into_iter().map(EntrySummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        cache::LookupCache,
        error::PluginError,
        eva::{EndpointResolver, HeaderContext, ORGANIZATION_HEADER},
        service::ProductService,
        transport::mock::MockTransport,
    };

    fn registry(transport: MockTransport) -> CommerceService<MockTransport> {
        let ctx = HeaderContext { organization_unit_set_id: Some("ou-9".to_owned()) };
        let requests = RequestBuilder::new(EndpointResolver::default(), "Eva-Builder-Plugin", &ctx);
        CommerceService::new(ProductService::new(transport, requests, LookupCache::default(), 20))
    }

    #[test]
    fn test_info() {
        let registry = registry(MockTransport::new());
        let info = DataPlugin::new(&registry).info();
        assert_eq!(info.name, "EVA");
        assert_eq!(info.icon, DATA_PLUGIN_ICON);
    }

    #[test]
    fn test_resource_types_json_shape() {
        let registry = registry(MockTransport::new());
        let types = DataPlugin::new(&registry).resource_types();
        assert_eq!(types.len(), 1);

        let value = serde_json::to_value(&types[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Product",
                "id": "product",
                "description": "All of your EVA products.",
                "inputs": [
                    {
                        "friendlyName": "limit",
                        "name": "limit",
                        "type": "number",
                        "defaultValue": 10,
                        "min": 1,
                        "max": 100
                    },
                    { "friendlyName": "Search", "name": "query", "type": "string" }
                ],
                "entryInputs": [
                    { "friendlyName": "Search", "name": "query", "type": "string" }
                ],
                "canPickEntries": true
            })
        );
    }

    #[test]
    fn test_to_url_entry() {
        let registry = registry(MockTransport::new());
        let types = DataPlugin::new(&registry).resource_types();

        let descriptor =
            types[0].to_url(&ToUrlParams { entry: Some("P1"), ..Default::default() }).unwrap();
        assert!(descriptor.request.url.ends_with("/GetProductDetail"));
        assert_eq!(descriptor.body_json().unwrap(), json!({ "ID": "P1" }));
        assert_eq!(descriptor.request.headers[ORGANIZATION_HEADER], "ou-9");
    }

    #[test]
    fn test_to_url_search() {
        let registry = registry(MockTransport::new());
        let types = DataPlugin::new(&registry).resource_types();

        let params = ToUrlParams { entry: None, query: Some("shoes"), limit: Some(5) };
        let descriptor = types[0].to_url(&params).unwrap();
        assert!(descriptor.request.url.ends_with("/SearchProducts"));
        assert_eq!(
            descriptor.body_json().unwrap(),
            json!({ "Query": "shoes", "PageConfig": { "PageSize": 5 } })
        );
    }

    #[test]
    fn test_to_url_empty_values_are_absent() {
        let registry = registry(MockTransport::new());
        let types = DataPlugin::new(&registry).resource_types();

        let params = ToUrlParams { entry: Some(""), query: Some(""), limit: Some(0) };
        let descriptor = types[0].to_url(&params).unwrap();
        assert!(descriptor.request.url.ends_with("/SearchProducts"));
        assert_eq!(descriptor.body_json().unwrap(), json!({ "PageConfig": {} }));
    }

    #[test]
    fn test_to_url_clamps_limit() {
        let registry = registry(MockTransport::new());
        let types = DataPlugin::new(&registry).resource_types();

        let params = ToUrlParams { limit: Some(5_000), ..Default::default() };
        let body = types[0].to_url(&params).unwrap().body_json().unwrap();
        assert_eq!(body["PageConfig"]["PageSize"], 100);
    }

    #[test]
    fn test_to_url_sends_nothing() {
        let registry = registry(MockTransport::new());
        let types = DataPlugin::new(&registry).resource_types();
        types[0].to_url(&ToUrlParams::default()).unwrap();
        assert_eq!(registry.resolve(ResourceKind::Product).transport().calls(), 0);
    }

    #[test]
    fn test_entry_query_from_host_json() {
        let query: EntryQuery =
            serde_json::from_value(json!({ "resourceEntryId": "P1", "searchText": "x" })).unwrap();
        assert_eq!(query.resource_entry_id.as_deref(), Some("P1"));
        assert_eq!(query.search_text.as_deref(), Some("x"));

        let empty: EntryQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, EntryQuery::default());
    }

    #[tokio::test]
    async fn test_entries_for_single_entry() {
        let body = json!({ "Result": { "product_id": 77, "display_value": "Boot" } });
        let registry = registry(MockTransport::new().respond(200, &body));
        let plugin = DataPlugin::new(&registry);

        let options = EntryQuery { resource_entry_id: Some("77".to_owned()), search_text: None };
        let entries = plugin.get_entries_by_resource_type("product", &options).await.unwrap();
        assert_eq!(entries, [EntrySummary { id: "77".to_owned(), name: "Boot".to_owned() }]);
    }

    #[tokio::test]
    async fn test_entries_from_search() {
        let body = json!({
            "Products": [
                { "product_id": "1", "display_value": "One" },
                { "product_id": "2" }
            ]
        });
        let registry = registry(MockTransport::new().respond(200, &body));
        let plugin = DataPlugin::new(&registry);

        let entries =
            plugin.get_entries_by_resource_type("product", &EntryQuery::default()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["One", ""]);

        let requests = registry.resolve(ResourceKind::Product).transport().requests();
        assert_eq!(requests[0].body, json!({ "PageConfig": { "PageSize": 20 } }));
    }

    #[tokio::test]
    async fn test_entries_empty_entry_id_searches() {
        let registry = registry(MockTransport::new().respond(200, &json!({ "Products": [] })));
        let plugin = DataPlugin::new(&registry);

        let options = EntryQuery {
            resource_entry_id: Some(String::new()),
            search_text: Some("a".to_owned()),
        };
        assert!(plugin.get_entries_by_resource_type("product", &options).await.unwrap().is_empty());
        let requests = registry.resolve(ResourceKind::Product).transport().requests();
        assert!(requests[0].url.ends_with("/SearchProducts"));
    }

    #[tokio::test]
    async fn test_entries_search_failure_is_empty() {
        let registry = registry(MockTransport::new().respond(502, &json!({})));
        let plugin = DataPlugin::new(&registry);

        let entries =
            plugin.get_entries_by_resource_type("product", &EntryQuery::default()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_entries_unknown_resource_type() {
        let registry = registry(MockTransport::new());
        let plugin = DataPlugin::new(&registry);

        let result =
            plugin.get_entries_by_resource_type("collection", &EntryQuery::default()).await;
        assert!(matches!(
            result,
            Err(PluginError::UnknownResourceKind(ref id)) if id == "collection"
        ));
        assert_eq!(registry.resolve(ResourceKind::Product).transport().calls(), 0);
    }
}
