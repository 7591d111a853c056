//! Ordered registry of the configured instances of one plugin kind

use std::sync::Arc;

use tracing::{debug, error};

use super::{Instance, InstanceConfig, PluginKind};
use crate::error::{DashError, Result};

/// The instances of one plugin kind, in configuration order.
///
/// The registry is built once before the HTTP listener starts and is only read
/// afterwards, so concurrent lookups need no locking.
pub struct InstanceRegistry<I: ?Sized> {
    instances: Vec<Arc<I>>,
}

impl<I: ?Sized> Default for InstanceRegistry<I> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
        }
    }
}

impl<I: ?Sized + Instance> InstanceRegistry<I> {
    /// Construct one instance per configuration entry.
    ///
    /// All entries are attempted; if any construction fails the registry is not
    /// returned and the error names every failing entry.
    pub fn register<C, F>(kind: PluginKind, configs: &[C], mut construct: F) -> Result<Self>
    where
        C: InstanceConfig,
        F: FnMut(&C) -> Result<Arc<I>>,
    {
        let mut instances = Vec::with_capacity(configs.len());
        let mut failures = Vec::new();

        for cfg in configs {
            match construct(cfg) {
                Ok(instance) => {
                    debug!(plugin = %kind, name = cfg.name(), "Created instance");
                    instances.push(instance);
                }
                Err(e) => {
                    error!(plugin = %kind, name = cfg.name(), error = %e, "Could not create instance");
                    failures.push(format!("{} instance '{}': {}", kind, cfg.name(), e.detail()));
                }
            }
        }

        if !failures.is_empty() {
            return Err(DashError::config(failures.join("; ")));
        }

        Ok(Self { instances })
    }

    /// Wrap already constructed instances, keeping their order
    pub fn from_instances(instances: Vec<Arc<I>>) -> Self {
        Self { instances }
    }

    /// First instance whose name equals `name`
    pub fn resolve(&self, name: &str) -> Option<Arc<I>> {
        self.instances
            .iter()
            .find(|instance| instance.name() == name)
            .cloned()
    }

    /// Like [`resolve`](Self::resolve), but reports an unknown name as a client error
    pub fn get(&self, name: &str) -> Result<Arc<I>> {
        self.resolve(name)
            .ok_or_else(|| DashError::instance_not_found(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.instances.iter().map(|instance| instance.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
