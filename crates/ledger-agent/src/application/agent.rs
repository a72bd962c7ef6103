//! # Ledger Agent
//!
//! Public face of one ledger node: identity, the service map published to
//! clients, mounted plugins, and delegation to the node for blocks and
//! operations.

use crate::algorithms::{derive_service_url, plugin_url, strip_agent_prefix};
use crate::application::{ChainVerifier, LedgerAgentBlocks};
use crate::config::RouteConfig;
use crate::domain::{
    BlockQuery, BlockRecord, BlockServiceSummary, LedgerError, LedgerResult, Operation,
    PluginMount, Traversal, AGENT_ID_PREFIX,
};
use crate::ports::{LedgerAgentApi, LedgerNode, PluginRegistry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Agent status document.
pub const STATUS_SERVICE: &str = "ledgerAgentStatusService";
/// Ledger configuration.
pub const CONFIG_SERVICE: &str = "ledgerConfigService";
/// Operation submission.
pub const OPERATION_SERVICE: &str = "ledgerOperationService";
/// Ledger events.
pub const EVENT_SERVICE: &str = "ledgerEventService";
/// Block access.
pub const BLOCK_SERVICE: &str = "ledgerBlockService";
/// Ledger queries.
pub const QUERY_SERVICE: &str = "ledgerQueryService";

/// Core service types every agent publishes.
pub const CORE_SERVICES: [&str; 6] = [
    STATUS_SERVICE,
    CONFIG_SERVICE,
    OPERATION_SERVICE,
    EVENT_SERVICE,
    BLOCK_SERVICE,
    QUERY_SERVICE,
];

/// Options for creating an agent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerAgentOptions {
    /// Agent id; a fresh `urn:uuid:` id is generated when absent.
    pub id: Option<String>,
    /// Owner identity.
    pub owner: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Publicly listed?
    #[serde(default)]
    pub public: bool,
    /// Plugin names, mounted in order.
    #[serde(default)]
    pub plugins: Vec<String>,
}

/// Serialized form of an agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAgentDocument {
    /// Agent id.
    pub id: String,
    /// Id of the node behind the agent.
    pub ledger_node: String,
    /// Owner identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publicly listed?
    pub public: bool,
    /// Service type → URL.
    pub service: BTreeMap<String, String>,
    /// Mounted plugin names.
    pub plugins: Vec<String>,
}

/// A ledger agent bound to one ledger node.
///
/// Immutable after construction.
pub struct LedgerAgent {
    id: String,
    node: Arc<dyn LedgerNode>,
    owner: Option<String>,
    name: Option<String>,
    description: Option<String>,
    public: bool,
    service: BTreeMap<String, String>,
    plugins: Vec<String>,
    mounts: Vec<PluginMount>,
}

impl LedgerAgent {
    /// Create an agent, deriving its service map and mounting its plugins.
    ///
    /// # Errors
    /// - `PluginResolutionFailed` if a plugin is not in the registry
    /// - `ServiceTypeConflict` if a plugin's service type is already taken
    pub fn new(
        options: LedgerAgentOptions,
        node: Arc<dyn LedgerNode>,
        routes: &RouteConfig,
        registry: &dyn PluginRegistry,
    ) -> LedgerResult<Self> {
        let LedgerAgentOptions {
            id,
            owner,
            name,
            description,
            public,
            plugins,
        } = options;
        let id = id.unwrap_or_else(|| format!("{AGENT_ID_PREFIX}{}", Uuid::new_v4()));

        let status_url = format!(
            "{}{}/{}",
            routes.base_uri,
            routes.agents,
            strip_agent_prefix(&id)
        );
        let mut service = BTreeMap::new();
        service.insert(STATUS_SERVICE.to_string(), status_url.clone());
        for (service_type, template) in [
            (CONFIG_SERVICE, &routes.config),
            (OPERATION_SERVICE, &routes.operations),
            (EVENT_SERVICE, &routes.events),
            (BLOCK_SERVICE, &routes.blocks),
            (QUERY_SERVICE, &routes.query),
        ] {
            service.insert(
                service_type.to_string(),
                derive_service_url(&routes.base_uri, template, &id),
            );
        }

        let mut mounts = Vec::with_capacity(plugins.len());
        for plugin in &plugins {
            let capability = registry.resolve(plugin).map_err(|e| {
                warn!("[ledger-agent] Plugin {} did not resolve: {}", plugin, e);
                LedgerError::PluginResolutionFailed(plugin.clone())
            })?;

            if service.contains_key(&capability.service_type) {
                return Err(LedgerError::ServiceTypeConflict {
                    service_type: capability.service_type,
                    plugin: plugin.clone(),
                });
            }

            let url = plugin_url(&status_url, plugin);
            let sub_routes = capability
                .sub_routes
                .iter()
                .map(|route| format!("{url}/{}", route.trim_start_matches('/')))
                .collect();
            service.insert(capability.service_type.clone(), url.clone());
            mounts.push(PluginMount {
                plugin: plugin.clone(),
                service_type: capability.service_type,
                url,
                sub_routes,
            });
        }

        info!(
            "[ledger-agent] Created agent {} for node {} ({} plugins)",
            id,
            node.node_id(),
            mounts.len()
        );

        Ok(Self {
            id,
            node,
            owner,
            name,
            description,
            public,
            service,
            plugins,
            mounts,
        })
    }

    /// The node behind this agent.
    pub fn node(&self) -> &Arc<dyn LedgerNode> {
        &self.node
    }

    /// Owner identity.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Publicly listed?
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Full service map.
    pub fn services(&self) -> &BTreeMap<String, String> {
        &self.service
    }

    /// Mounted plugin names in configuration order.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Mounted plugins with their resolved URLs.
    pub fn plugin_mounts(&self) -> &[PluginMount] {
        &self.mounts
    }

    /// Block facade.
    pub fn blocks(&self) -> LedgerAgentBlocks {
        LedgerAgentBlocks::new(self.node.clone())
    }

    /// Document served at the status URL.
    pub fn to_document(&self) -> LedgerAgentDocument {
        LedgerAgentDocument {
            id: self.id.clone(),
            ledger_node: self.node.node_id().to_string(),
            owner: self.owner.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            public: self.public,
            service: self.service.clone(),
            plugins: self.plugins.clone(),
        }
    }
}

impl fmt::Debug for LedgerAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerAgent")
            .field("id", &self.id)
            .field("node", &self.node.node_id())
            .field("public", &self.public)
            .field("service", &self.service)
            .field("plugins", &self.plugins)
            .finish()
    }
}

#[async_trait]
impl LedgerAgentApi for LedgerAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn service_url(&self, service_type: &str) -> Option<&str> {
        self.service.get(service_type).map(String::as_str)
    }

    async fn submit_operation(&self, operation: Operation) -> LedgerResult<()> {
        debug!("[ledger-agent] Agent {} submitting operation", self.id);
        self.node.add_operation(operation).await
    }

    async fn get_block(&self, query: &BlockQuery) -> LedgerResult<BlockRecord> {
        self.blocks().get(query).await
    }

    async fn block_summary(&self) -> LedgerResult<BlockServiceSummary> {
        self.blocks().summary().await
    }

    async fn verify_chain(&self, verifier: &ChainVerifier) -> LedgerResult<Traversal> {
        verifier.verify_from_latest(&*self.node).await
    }
}
