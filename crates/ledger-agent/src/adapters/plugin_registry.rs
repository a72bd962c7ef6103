//! Static Plugin Registry Adapter
//!
//! Implements `PluginRegistry` over a name → capability map filled at
//! startup.

use crate::domain::{LedgerError, LedgerResult, PluginCapability};
use crate::ports::outbound::PluginRegistry;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Plugin registry populated by explicit registration.
#[derive(Default)]
pub struct StaticPluginRegistry {
    plugins: RwLock<HashMap<String, PluginCapability>>,
}

impl StaticPluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`.
    ///
    /// # Errors
    /// - `PluginAlreadyRegistered` if `name` is taken
    pub fn register(&self, name: impl Into<String>, capability: PluginCapability) -> LedgerResult<()> {
        let name = name.into();
        let mut plugins = self.plugins.write();
        if plugins.contains_key(&name) {
            return Err(LedgerError::PluginAlreadyRegistered(name));
        }
        debug!(
            "[ledger-agent] Registered plugin {} for service type {}",
            name, capability.service_type
        );
        plugins.insert(name, capability);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_plugin(self, name: impl Into<String>, capability: PluginCapability) -> LedgerResult<Self> {
        self.register(name, capability)?;
        Ok(self)
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}

impl PluginRegistry for StaticPluginRegistry {
    fn resolve(&self, name: &str) -> LedgerResult<PluginCapability> {
        self.plugins
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("plugin {name}")))
    }
}
