//! Plugin subsystem
//!
//! Every backend kind (Elasticsearch, GitHub, ...) follows the same shape: a
//! configuration entry type, an instance contract, an [`InstanceRegistry`]
//! holding the configured instances in registration order, and a thin router
//! which resolves the instance named in the request path and calls it.
//!
//! [`Plugins::register`] is the two-phase startup: every instance of every
//! kind is constructed first, construction errors are collected, and the
//! caller gets either the complete set of registries plus the [`Catalog`] or
//! one configuration error describing every failed entry.

pub mod catalog;
pub mod elasticsearch;
pub mod github;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use actix_web::web;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use url::Url;

use crate::config::PluginsConfig;
use crate::error::{DashError, Result};

pub use catalog::{Catalog, CatalogEntry};
pub use elasticsearch::{ElasticsearchClient, ElasticsearchInstance};
pub use github::{GithubClient, GithubInstance};
pub use registry::InstanceRegistry;

/// Identity shared by every plugin instance
pub trait Instance: Send + Sync {
    /// The name of the instance, unique within its plugin kind and used as routing key
    fn name(&self) -> &str;
}

/// Descriptive metadata every plugin configuration entry carries
pub trait InstanceConfig {
    fn name(&self) -> &str;
    fn display_name(&self) -> &str;
    fn description(&self) -> &str;
}

/// The closed set of supported plugin kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Elasticsearch,
    Github,
}

impl PluginKind {
    /// All kinds, in mounting order
    pub const ALL: [PluginKind; 2] = [PluginKind::Elasticsearch, PluginKind::Github];

    /// The catalog type tag of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Elasticsearch => "elasticsearch",
            PluginKind::Github => "github",
        }
    }

    /// The route prefix under which the kind's router is mounted
    pub fn route(&self) -> &'static str {
        match self {
            PluginKind::Elasticsearch => elasticsearch::ROUTE,
            PluginKind::Github => github::ROUTE,
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All registered plugin instances together with the catalog describing them
pub struct Plugins {
    catalog: Arc<Catalog>,
    elasticsearch: Arc<InstanceRegistry<dyn ElasticsearchInstance>>,
    github: Arc<InstanceRegistry<dyn GithubInstance>>,
}

impl Plugins {
    /// Assemble a plugin set from already built registries
    pub fn new(
        catalog: Catalog,
        elasticsearch: InstanceRegistry<dyn ElasticsearchInstance>,
        github: InstanceRegistry<dyn GithubInstance>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            elasticsearch: Arc::new(elasticsearch),
            github: Arc::new(github),
        }
    }

    /// Build every configured instance of every plugin kind.
    ///
    /// Nothing is returned unless all instances were created; the error lists
    /// each entry which failed so an operator can fix them in one pass.
    pub fn register(config: &PluginsConfig) -> Result<Self> {
        let mut catalog = Catalog::new();
        let mut failures = Vec::new();

        let elasticsearch = register_kind(
            PluginKind::Elasticsearch,
            &config.elasticsearch,
            |cfg| Ok(Arc::new(ElasticsearchClient::new(cfg)?) as Arc<dyn ElasticsearchInstance>),
            &mut catalog,
            &mut failures,
        );

        let github = register_kind(
            PluginKind::Github,
            &config.github,
            |cfg| Ok(Arc::new(GithubClient::new(cfg)?) as Arc<dyn GithubInstance>),
            &mut catalog,
            &mut failures,
        );

        if !failures.is_empty() {
            return Err(DashError::config(failures.join("; ")));
        }

        info!(
            instances = catalog.len(),
            "Registered plugin instances"
        );

        Ok(Self::new(catalog, elasticsearch, github))
    }

    /// The catalog of every registered instance
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn elasticsearch(&self) -> &Arc<InstanceRegistry<dyn ElasticsearchInstance>> {
        &self.elasticsearch
    }

    pub fn github(&self) -> &Arc<InstanceRegistry<dyn GithubInstance>> {
        &self.github
    }

    /// Number of registered instances of the given kind
    pub fn instance_count(&self, kind: PluginKind) -> usize {
        match kind {
            PluginKind::Elasticsearch => self.elasticsearch.len(),
            PluginKind::Github => self.github.len(),
        }
    }

    /// Mount the router of every plugin kind
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for kind in PluginKind::ALL {
            debug!(plugin = %kind, route = kind.route(), "Mounting plugin router");
            match kind {
                PluginKind::Elasticsearch => {
                    elasticsearch::configure(cfg, Arc::clone(&self.elasticsearch))
                }
                PluginKind::Github => github::configure(cfg, Arc::clone(&self.github)),
            }
        }
    }
}

/// Register the instances of one kind, appending catalog entries only when the
/// whole kind was built successfully.
fn register_kind<C, I, F>(
    kind: PluginKind,
    configs: &[C],
    construct: F,
    catalog: &mut Catalog,
    failures: &mut Vec<String>,
) -> InstanceRegistry<I>
where
    C: InstanceConfig,
    I: ?Sized + Instance,
    F: FnMut(&C) -> Result<Arc<I>>,
{
    match InstanceRegistry::register(kind, configs, construct) {
        Ok(registry) => {
            for cfg in configs {
                catalog.append(CatalogEntry::from_config(kind, cfg));
            }
            registry
        }
        Err(e) => {
            error!(plugin = %kind, error = %e, "Could not register plugin");
            failures.push(e.detail());
            InstanceRegistry::default()
        }
    }
}

/// Attach the failing instance and operation to an error returned by an instance.
///
/// Errors which already carry that context are passed through unchanged.
pub(crate) fn backend_error(instance: &str, operation: &str, err: DashError) -> DashError {
    match err {
        DashError::Backend { .. } => err,
        other => DashError::backend(instance, operation, other),
    }
}

/// Parse a backend address, making sure relative endpoints are joined below its path
pub(crate) fn base_url(address: &str) -> Result<Url> {
    let mut url = Url::parse(address)
        .map_err(|e| DashError::config(format!("Invalid address '{}': {}", address, e)))?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Parse a required base-10 signed 64-bit query parameter
pub(crate) fn parse_i64(value: Option<&str>, message: &str) -> Result<i64> {
    value.and_then(|v| v.parse::<i64>().ok()).ok_or_else(|| {
        debug!(value = ?value, "{}", message);
        DashError::bad_request(message)
    })
}

/// Parse an optional base-10 unsigned query parameter, falling back to `default`
/// when absent or empty
pub(crate) fn parse_optional_u32(value: Option<&str>, default: u32, message: &str) -> Result<u32> {
    match value {
        None | Some("") => Ok(default),
        Some(v) => v.parse::<u32>().map_err(|_| {
            debug!(value = v, "{}", message);
            DashError::bad_request(message)
        }),
    }
}
