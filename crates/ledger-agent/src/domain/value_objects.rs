//! # Domain Value Objects
//!
//! Queries, traversal outcomes, convergence reports and plugin capability
//! records.

use super::entities::{Block, BlockId};
use super::errors::{Hash, LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects a single block on a node.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlockQuery {
    /// Fetch by block id.
    Id(BlockId),
    /// Fetch by block height.
    Height(u64),
}

impl BlockQuery {
    /// Parse HTTP-style query parameters (`?id=...` or `?height=...`).
    ///
    /// Exactly one of `id` / `height` must be present. Unknown parameters,
    /// repeated parameters and non-numeric heights are rejected.
    pub fn from_params<'a, I>(params: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = None;
        for (key, value) in params {
            let parsed = match key {
                "id" if value.is_empty() => {
                    return Err(LedgerError::InvalidQuery("empty block id".to_string()));
                }
                "id" => BlockQuery::Id(BlockId::new(value)),
                "height" => BlockQuery::Height(value.parse().map_err(|_| {
                    LedgerError::InvalidQuery(format!("height is not a number: {value}"))
                })?),
                other => {
                    return Err(LedgerError::InvalidQuery(format!(
                        "unknown parameter: {other}"
                    )));
                }
            };
            if query.replace(parsed).is_some() {
                return Err(LedgerError::InvalidQuery(
                    "expected exactly one of `id` or `height`".to_string(),
                ));
            }
        }
        query.ok_or_else(|| {
            LedgerError::InvalidQuery("expected exactly one of `id` or `height`".to_string())
        })
    }
}

impl fmt::Display for BlockQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockQuery::Id(id) => write!(f, "id={id}"),
            BlockQuery::Height(height) => write!(f, "height={height}"),
        }
    }
}

impl From<BlockId> for BlockQuery {
    fn from(id: BlockId) -> Self {
        BlockQuery::Id(id)
    }
}

/// Point in the chain at which nodes are compared.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChainPoint {
    /// Each node's current head.
    Latest,
    /// A fixed height.
    Height(u64),
}

/// Outcome of a crawl to genesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Genesis was reached with its linkage intact.
    ReachedGenesis {
        /// The genesis block.
        genesis: Block,
        /// Parent hops taken.
        attempts: u32,
    },
    /// The crawl stopped before genesis.
    Stopped {
        /// Last block the crawl held.
        last_block: Block,
        /// Parent hops taken.
        attempts: u32,
        /// Why it stopped.
        reason: LedgerError,
    },
}

impl Traversal {
    /// Did the crawl reach genesis?
    pub fn reached_genesis(&self) -> bool {
        matches!(self, Traversal::ReachedGenesis { .. })
    }

    /// Parent hops taken.
    pub fn attempts(&self) -> u32 {
        match self {
            Traversal::ReachedGenesis { attempts, .. } | Traversal::Stopped { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Last block held: genesis on success.
    pub fn last_block(&self) -> &Block {
        match self {
            Traversal::ReachedGenesis { genesis, .. } => genesis,
            Traversal::Stopped { last_block, .. } => last_block,
        }
    }

    /// Stop reason, if the crawl stopped.
    pub fn reason(&self) -> Option<&LedgerError> {
        match self {
            Traversal::ReachedGenesis { .. } => None,
            Traversal::Stopped { reason, .. } => Some(reason),
        }
    }

    /// Collapse into the genesis block or the stop reason.
    pub fn into_result(self) -> LedgerResult<Block> {
        match self {
            Traversal::ReachedGenesis { genesis, .. } => Ok(genesis),
            Traversal::Stopped { reason, .. } => Err(reason),
        }
    }
}

/// Block field on which two nodes disagree.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BlockField {
    /// The node has no block at the requested point.
    Presence,
    /// Block id.
    Id,
    /// Block height.
    BlockHeight,
    /// Parent id.
    PreviousBlock,
    /// Parent hash.
    PreviousBlockHash,
    /// Sealed operations.
    Operations,
}

/// One node's deviation from the reference node.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDivergence {
    /// Deviating node.
    pub node_id: String,
    /// Field that differs.
    pub field: BlockField,
    /// Reference value.
    pub expected: String,
    /// Value on the deviating node.
    pub actual: String,
}

/// Result of comparing nodes at one chain point.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConvergenceReport {
    /// Every node holds the same block content.
    Agreement {
        /// Agreed height.
        block_height: u64,
        /// Agreed content hash.
        #[serde(with = "super::entities::hex_hash")]
        block_hash: Hash,
        /// Nodes compared.
        nodes: usize,
    },
    /// At least one node deviates.
    Divergence(Vec<NodeDivergence>),
}

impl ConvergenceReport {
    /// True on agreement.
    pub fn is_agreement(&self) -> bool {
        matches!(self, ConvergenceReport::Agreement { .. })
    }

    /// Divergence details; empty on agreement.
    pub fn divergences(&self) -> &[NodeDivergence] {
        match self {
            ConvergenceReport::Agreement { .. } => &[],
            ConvergenceReport::Divergence(details) => details,
        }
    }
}

/// Capability record a plugin registers under its name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginCapability {
    /// Service type the plugin's root route is published under.
    pub service_type: String,
    /// Sub-routes mounted below the plugin root (e.g. `/records`).
    #[serde(default)]
    pub sub_routes: Vec<String>,
}

impl PluginCapability {
    /// Capability with no sub-routes.
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            sub_routes: Vec::new(),
        }
    }

    /// Add a sub-route.
    pub fn with_sub_route(mut self, route: impl Into<String>) -> Self {
        self.sub_routes.push(route.into());
        self
    }
}

/// A plugin mounted on a ledger agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginMount {
    /// Plugin name as configured on the agent.
    pub plugin: String,
    /// Service type from the capability.
    pub service_type: String,
    /// Plugin root URL.
    pub url: String,
    /// Absolute sub-route URLs.
    pub sub_routes: Vec<String>,
}
