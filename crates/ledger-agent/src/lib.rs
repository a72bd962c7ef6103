//! # Ledger Agent
//!
//! Block access and chain integrity verification for a ledger agent, the
//! HTTP-facing representative of one ledger node.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Fetch blocks by id or height, plus the genesis/latest summary
//! - Crawl from any block back to genesis with a bounded number of hops
//! - Compare the blocks several nodes hold at one chain point
//! - Derive the agent's service URLs and mount its plugins
//!
//! ## Integrity Checks
//!
//! | Check | Failure |
//! |-------|---------|
//! | Parent id and parent hash both present or both absent | `LinkageInconsistent` |
//! | Parent id resolves | `ChainBroken` |
//! | Parent height is child height minus one | `HeightMismatch` |
//! | Genesis reached within the hop bound | `IncompleteTraversal` |
//!
//! ## Module Structure
//!
//! ```text
//! ledger-agent/
//! ├── domain/          # Block, BlockRecord, queries, reports, errors, invariants
//! ├── algorithms/      # Chain crawl, block comparison, service URLs
//! ├── ports/           # LedgerAgentApi (inbound) + BlockStore/LedgerNode/PluginRegistry (outbound)
//! ├── adapters/        # InMemoryLedgerNode, GossipNetwork, StaticPluginRegistry
//! ├── application/     # LedgerAgent, LedgerAgentBlocks, ChainVerifier, ConvergenceChecker
//! └── config.rs        # LedgerAgentConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{GossipNetwork, InMemoryLedgerNode, StaticPluginRegistry};
pub use algorithms::{
    compare_blocks, crawl_from_latest, crawl_to_genesis, dash_case, derive_service_url,
    plugin_url, strip_agent_prefix,
};
pub use application::{
    ChainVerifier, ConvergenceChecker, LedgerAgent, LedgerAgentBlocks, LedgerAgentDocument,
    LedgerAgentOptions, CORE_SERVICES,
};
pub use config::{ConvergenceConfig, LedgerAgentConfig, RouteConfig, VerifierConfig};
pub use domain::{
    Block, BlockField, BlockId, BlockMeta, BlockQuery, BlockRecord, BlockServiceSummary,
    ChainPoint, ConvergenceReport, Hash, LatestSummary, LedgerError, LedgerResult,
    NodeDivergence, Operation, PluginCapability, PluginMount, Traversal,
    AGENT_ID_PREFIX, DEFAULT_MAX_CRAWL_ATTEMPTS, MIN_CONVERGENCE_NODES,
    invariant_genesis_linkage, invariant_parent_height,
};
pub use ports::{
    BlockStore, LedgerAgentApi, LedgerNode, MockBlockStore, PluginRegistry, SystemTimeSource,
    TimeSource,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
