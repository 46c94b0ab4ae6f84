//! EVA Catalog: commerce data source for a visual content platform
//!
//! Connects a content platform's editor to the product catalog of the EVA commerce
//! API. The editor can browse and search EVA products, pick individual entries, and
//! bind content to request descriptors it executes itself.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Host content editor │
//! └──────────┬───────────┘
//!            │ resource types, entries, request descriptors
//! ┌──────────▼──────────────────────────────────────┐
//! │             EvaPlugin (this crate)              │
//! │  ┌────────────┐   ┌─────────────────────────┐   │
//! │  │ DataPlugin │───│ CommerceService         │   │
//! │  │ (to_url,   │   │  └ ProductService       │   │
//! │  │  entries)  │   │     ├ LookupCache (LRU) │   │
//! │  └────────────┘   │     └ RequestBuilder    │   │
//! │                   └────────────┬────────────┘   │
//! └────────────────────────────────┼────────────────┘
//!                                  │ JSON over HTTP POST
//! ┌────────────────────────────────▼────────────────┐
//! │  EVA message API (SearchProducts,               │
//! │                   GetProductDetail)             │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eva_catalog::{
//!     config::PluginConfig,
//!     data_plugin::ToUrlParams,
//!     eva::ResourceKind,
//!     plugin::{EvaPlugin, Settings},
//!     service::CatalogOperations,
//! };
//!
//! # async fn example() -> eva_catalog::Result<()> {
//! let config = PluginConfig {
//!     settings: Settings::default().with("organizationUnitSetID", "42"),
//!     ..Default::default()
//! };
//! let plugin = EvaPlugin::activate(config)?;
//!
//! // Cached single-product lookup
//! let products = plugin.service().resolve(ResourceKind::Product);
//! let product = products.find_by_id("1001").await?;
//! println!("{}", product.title);
//!
//! // Best-effort search, never fails
//! for result in products.search("sneakers").await {
//!     println!("{}: {}", result.id, result.title);
//! }
//!
//! // Request descriptor for the host to execute
//! let data = plugin.data_plugin();
//! let descriptor = data.resource_types()[0]
//!     .to_url(&ToUrlParams { query: Some("boots"), limit: Some(10), ..Default::default() })?;
//! println!("{}", serde_json::to_string(&descriptor)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result`] with a [`PluginError`]. Lookups by id or
//! handle fail hard; search never fails and logs what went wrong instead.
//!
//! ```rust,no_run
//! use eva_catalog::{
//!     PluginError, eva::ResourceKind, plugin::EvaPlugin, service::CatalogOperations,
//! };
//!
//! # async fn example(plugin: EvaPlugin) {
//! let products = plugin.service().resolve(ResourceKind::Product);
//! match products.find_by_id("1001").await {
//!     Ok(product) => println!("found {}", product.title),
//!     Err(PluginError::NotFound(id)) => eprintln!("no product {id}"),
//!     Err(e) if e.is_transient() => eprintln!("EVA unavailable: {e}"),
//!     Err(e) => eprintln!("lookup failed: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod cache;
pub mod config;
pub mod data_plugin;
pub mod error;
pub mod eva;
pub mod mapper;
pub mod plugin;
pub mod request;
pub mod resource;
pub mod service;
pub mod transport;

pub use config::PluginConfig;
pub use data_plugin::DataPlugin;
pub use error::{PluginError, Result};
pub use plugin::{EvaPlugin, PluginManifest, Settings};
pub use resource::{EntrySummary, Resource};
pub use service::{CatalogOperations, CommerceService, ProductService};
