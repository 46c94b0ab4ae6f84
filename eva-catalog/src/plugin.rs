//! Plugin registration and session.
//!
//! [`PluginManifest`] is what the host shows before the plugin is connected.
//! [`EvaPlugin`] is one activated session: it owns the transport, cache and commerce
//! service built from a [`PluginConfig`], and lends out the [`DataPlugin`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::PluginConfig,
    data_plugin::DataPlugin,
    error::Result,
    eva::{EndpointResolver, HeaderContext},
    request::RequestBuilder,
    service::{CommerceService, ProductService},
    transport::{HttpTransport, Transport},
};

/// Plugin id registered with the host.
pub const PLUGIN_ID: &str = "@builder.io/plugin-eva";

/// Plugin display name.
pub const PLUGIN_NAME: &str = "EVA";

/// Settings key holding the EVA organization unit set id.
pub const ORGANIZATION_SETTING: &str = "organizationUnitSetID";

/// Setting the host asks the user for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingField {
    /// Settings key.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub field_type: &'static str,
    /// Whether the plugin refuses to connect without it.
    pub required: bool,
    /// Hint shown under the input.
    pub helper_text: &'static str,
}

/// Registration record of the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    /// Display name.
    pub name: &'static str,
    /// Plugin id.
    pub id: &'static str,
    /// User-provided settings.
    pub settings: Vec<SettingField>,
    /// Label of the connect button.
    pub cta_text: &'static str,
}

impl Default for PluginManifest {
    fn default() -> Self {
        Self {
            name: PLUGIN_NAME,
            id: PLUGIN_ID,
            settings: vec![SettingField {
                name: ORGANIZATION_SETTING,
                field_type: "string",
                required: false,
                helper_text: "Enter your EVA Organization Unit Set ID",
            }],
            cta_text: "Connect EVA",
        }
    }
}

/// Settings entered by the user, keyed by [`SettingField::name`].
///
/// # Examples
///
/// ```
/// use eva_catalog::plugin::Settings;
///
/// let settings = Settings::default().with("organizationUnitSetID", "42");
/// assert_eq!(settings.organization_unit_set_id(), Some("42"));
/// assert_eq!(settings.get("unknown"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    /// Value of a setting.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// EVA organization unit set id, if configured.
    #[must_use]
    pub fn organization_unit_set_id(&self) -> Option<&str> {
        self.get(ORGANIZATION_SETTING)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One activated plugin session.
///
/// Everything it owns is fixed at activation; a settings change means activating a new
/// session.
///
/// # Examples
///
/// ```no_run
/// use eva_catalog::{config::PluginConfig, data_plugin::EntryQuery, plugin::EvaPlugin};
///
/// # async fn example() -> eva_catalog::Result<()> {
/// let config = PluginConfig::from_file("eva.toml")?;
/// let plugin = EvaPlugin::activate(config)?;
///
/// let entries = plugin
///     .data_plugin()
///     .get_entries_by_resource_type("product", &EntryQuery::default())
///     .await?;
/// println!("{} products", entries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EvaPlugin<T = HttpTransport> {
    config: PluginConfig,
    service: CommerceService<T>,
}

impl EvaPlugin<HttpTransport> {
    /// Validates the configuration and activates a session over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PluginError::InvalidConfig`] if the configuration is invalid, or
    /// an HTTP error if the client cannot be built.
    pub fn activate(config: PluginConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> EvaPlugin<T> {
    pub(crate) fn with_transport(config: PluginConfig, transport: T) -> Self {
        let ctx = HeaderContext {
            organization_unit_set_id: config.settings.organization_unit_set_id().map(str::to_owned),
        };
        if ctx.organization_unit_set_id.is_none() {
            info!("no organization unit set configured, sending empty organization header");
        }

        let requests =
            RequestBuilder::new(EndpointResolver::new(&config.base_url), &config.user_agent, &ctx);
        let products =
            ProductService::new(transport, requests, config.cache.build(), config.search_page_size);

        info!(
            base_url = %config.base_url,
            protocol = products.transport().protocol_name(),
            cache_capacity = config.cache.capacity,
            "EVA plugin activated"
        );

        Self { config, service: CommerceService::new(products) }
    }

    /// Registration record.
    #[must_use]
    pub fn manifest() -> PluginManifest {
        PluginManifest::default()
    }

    /// User settings of this session.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.config.settings
    }

    /// Commerce operations per resource kind.
    #[must_use]
    pub const fn service(&self) -> &CommerceService<T> {
        &self.service
    }

    /// Data plugin backed by this session's service.
    #[must_use]
    pub fn data_plugin(&self) -> DataPlugin<'_, T> {
        DataPlugin::new(&self.service)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        eva::{ORGANIZATION_HEADER, ResourceKind, USER_AGENT_HEADER},
        service::CatalogOperations,
        transport::mock::MockTransport,
    };

    #[test]
    fn test_manifest_json() {
        let value = serde_json::to_value(EvaPlugin::<HttpTransport>::manifest()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "EVA",
                "id": "@builder.io/plugin-eva",
                "settings": [{
                    "name": "organizationUnitSetID",
                    "type": "string",
                    "required": false,
                    "helperText": "Enter your EVA Organization Unit Set ID"
                }],
                "ctaText": "Connect EVA"
            })
        );
    }

    #[test]
    fn test_settings_from_json() {
        let settings: Settings =
            serde_json::from_value(json!({ "organizationUnitSetID": "12", "other": "x" })).unwrap();
        assert_eq!(settings.organization_unit_set_id(), Some("12"));
        assert_eq!(settings.get("other"), Some("x"));
    }

    #[test]
    fn test_settings_from_iter() {
        let settings: Settings = [(ORGANIZATION_SETTING, "5")].into_iter().collect();
        assert_eq!(settings.organization_unit_set_id(), Some("5"));
    }

    #[test]
    fn test_activate_rejects_invalid_config() {
        let config = PluginConfig { search_page_size: 0, ..Default::default() };
        assert!(EvaPlugin::activate(config).is_err());
    }

    #[test]
    fn test_activate_default_config() {
        let plugin = EvaPlugin::activate(PluginConfig::default()).unwrap();
        assert!(plugin.settings().organization_unit_set_id().is_none());
        assert_eq!(plugin.data_plugin().info().name, "EVA");
    }

    #[tokio::test]
    async fn test_session_wires_settings_into_requests() {
        let config = PluginConfig {
            base_url: "https://eva.test/message/".to_owned(),
            settings: Settings::default().with(ORGANIZATION_SETTING, "ou-3"),
            search_page_size: 7,
            ..Default::default()
        };
        let transport = MockTransport::new().respond(200, &json!({ "Products": [] }));
        let plugin = EvaPlugin::with_transport(config, transport);

        let products = plugin.service().resolve(ResourceKind::Product);
        assert!(products.search("tee").await.is_empty());

        let requests = products.transport().requests();
        assert_eq!(requests[0].url, "https://eva.test/message/SearchProducts");
        assert_eq!(requests[0].headers[ORGANIZATION_HEADER], "ou-3");
        assert_eq!(requests[0].headers[USER_AGENT_HEADER], "Eva-Builder-Plugin");
        assert_eq!(requests[0].body, json!({ "Query": "tee", "PageConfig": { "PageSize": 7 } }));
    }

    #[test]
    fn test_session_cache_uses_config() {
        let mut config = PluginConfig::default();
        config.cache.capacity = 8;
        let plugin = EvaPlugin::with_transport(config, MockTransport::new());

        let cache = plugin.service().resolve(ResourceKind::Product).cache();
        assert_eq!(cache.capacity().get(), 8);
    }
}
