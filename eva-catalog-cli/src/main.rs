//! EVA catalog command-line client
//!
//! Runs the EVA catalog plugin outside the host editor: activates a session from a TOML
//! configuration file and prints the result of each plugin operation as JSON on stdout.
//!
//! Usage:
//!   eva-catalog --config eva.toml search sneakers
//!   eva-catalog --organization 42 find 1001
//!   eva-catalog to-url --query boots --limit 5
//!
//! Logs go to stderr; see `observability` for `LOG_FORMAT` and `RUST_LOG`.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

mod observability;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eva_catalog::{
    CatalogOperations, EvaPlugin, PluginConfig,
    data_plugin::{EntryQuery, ToUrlParams},
    eva::ResourceKind,
    plugin::ORGANIZATION_SETTING,
};
use serde::Serialize;
use tracing::debug;

use crate::observability::{LogFormat, init_observability};

#[derive(Parser, Debug)]
#[command(name = "eva-catalog", version)]
#[command(about = "Browse the EVA product catalog through the catalog plugin")]
struct Cli {
    /// Path to a TOML plugin configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// EVA organization unit set id, overrides the configured setting
    #[arg(short, long)]
    organization: Option<String>,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the plugin registration manifest
    Manifest,
    /// Print the resource types offered to the editor
    ResourceTypes,
    /// Search products (never cached, empty on failure)
    Search {
        /// Search text, empty lists everything EVA returns by default
        term: Option<String>,
    },
    /// Look up a product by id
    Find {
        /// Product id
        id: String,
    },
    /// Look up a product by handle
    FindHandle {
        /// Product handle
        handle: String,
    },
    /// Print the request descriptor for a single product
    RequestObject {
        /// Product id
        id: String,
    },
    /// Print the request descriptor the editor builds for a binding
    ToUrl {
        /// Entry id, selects a detail lookup
        #[arg(long)]
        entry: Option<String>,
        /// Search text
        #[arg(long)]
        query: Option<String>,
        /// Page size, clamped to 100
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List entries for the editor's picker
    Entries {
        /// Resource type id
        #[arg(long = "type", default_value = "product")]
        resource_type: String,
        /// Fetch exactly this entry
        #[arg(long)]
        entry: Option<String>,
        /// Search text
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_observability(LogFormat::from_env(), if cli.verbose { "debug" } else { "info" });

    if cli.command == Command::Manifest {
        return print_json(&<EvaPlugin>::manifest());
    }

    let config = load_config(&cli)?;
    let plugin = EvaPlugin::activate(config).context("failed to activate EVA plugin")?;
    run(&plugin, cli.command).await
}

fn load_config(cli: &Cli) -> Result<PluginConfig> {
    let mut config = match &cli.config {
        Some(path) => PluginConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PluginConfig::default(),
    };

    if let Some(organization) = &cli.organization {
        debug!(%organization, "organization overridden from command line");
        config.settings.insert(ORGANIZATION_SETTING, organization.as_str());
    }

    Ok(config)
}

async fn run(plugin: &EvaPlugin, command: Command) -> Result<()> {
    let products = plugin.service().resolve(ResourceKind::Product);
    let data = plugin.data_plugin();

    match command {
        Command::Manifest => print_json(&<EvaPlugin>::manifest()),
        Command::ResourceTypes => print_json(&data.resource_types()),
        Command::Search { term } => {
            print_json(&products.search(term.as_deref().unwrap_or_default()).await)
        }
        Command::Find { id } => {
            let product =
                products.find_by_id(&id).await.with_context(|| format!("lookup of {id} failed"))?;
            print_json(&product)
        }
        Command::FindHandle { handle } => {
            let product = products
                .find_by_handle(&handle)
                .await
                .with_context(|| format!("lookup of handle {handle} failed"))?;
            print_json(&product)
        }
        Command::RequestObject { id } => print_json(&products.request_object(&id)?),
        Command::ToUrl { entry, query, limit } => {
            let params =
                ToUrlParams { entry: entry.as_deref(), query: query.as_deref(), limit };
            let descriptors = data
                .resource_types()
                .iter()
                .map(|descriptor| descriptor.to_url(&params))
                .collect::<eva_catalog::Result<Vec<_>>>()?;
            print_json(&descriptors)
        }
        Command::Entries { resource_type, entry, search } => {
            let options = EntryQuery { resource_entry_id: entry, search_text: search };
            let entries = data.get_entries_by_resource_type(&resource_type, &options).await?;
            print_json(&entries)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
