//! # Outbound Ports
//!
//! Traits for external collaborators: the ledger node (storage plus the
//! consensus worker), the plugin registry, and the clock.

use crate::domain::{
    Block, BlockId, BlockMeta, BlockQuery, BlockRecord, LatestSummary, LedgerError, LedgerResult,
    Operation, PluginCapability,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read access to one node's persisted chain.
///
/// Implementations are read-only from this subsystem's point of view and
/// must be safe to call from many tasks at once.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Fetch one block by id or height.
    ///
    /// # Errors
    /// - `NotFound` if nothing matches
    /// - `InvalidQuery` if the query cannot be served
    async fn get_block(&self, query: &BlockQuery) -> LedgerResult<BlockRecord>;

    /// Current chain head. Reflects every block sealed before the call.
    async fn get_latest_summary(&self) -> LedgerResult<LatestSummary>;

    /// Node identifier (for logging and divergence reports).
    fn node_id(&self) -> &str;
}

/// Full ledger node contract consumed by the agent facade.
///
/// `run_consensus_round` exists for orchestrators and tests; nothing in this
/// crate calls it.
#[async_trait]
pub trait LedgerNode: BlockStore {
    /// Ledger this node maintains.
    fn ledger_id(&self) -> &str;

    /// Queue an operation for a future consensus round.
    async fn add_operation(&self, operation: Operation) -> LedgerResult<()>;

    /// Run one consensus worker cycle. Returns the blocks sealed by it.
    async fn run_consensus_round(&self) -> LedgerResult<Vec<BlockRecord>>;
}

/// Plugin capability lookup.
pub trait PluginRegistry: Send + Sync {
    /// Resolve a plugin by name.
    ///
    /// # Errors
    /// - `NotFound` if no plugin is registered under `name`
    fn resolve(&self, name: &str) -> LedgerResult<PluginCapability>;
}

/// Time source (injected for testability).
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> u64;
}

/// Wall-clock time source.
#[derive(Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock block store holding arbitrary (possibly corrupt) blocks.
///
/// Counts `get_block` calls so tests can assert on fetch bounds.
#[derive(Default)]
pub struct MockBlockStore {
    /// Node identifier.
    pub id: String,
    blocks: RwLock<HashMap<BlockId, Block>>,
    latest: RwLock<Option<BlockId>>,
    fetches: AtomicUsize,
    /// Should return storage errors?
    pub should_fail: bool,
}

impl MockBlockStore {
    /// Create an empty store.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create an empty store whose every read fails with `StorageError`.
    pub fn failing(id: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            ..Self::new(id)
        }
    }

    /// Insert a block verbatim. The last inserted block becomes latest.
    pub fn insert(&self, block: Block) {
        *self.latest.write() = Some(block.id.clone());
        self.blocks.write().insert(block.id.clone(), block);
    }

    /// Number of `get_block` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record(block: &Block) -> BlockRecord {
        BlockRecord::new(block.clone(), BlockMeta::sealed(block, 0))
    }
}

#[async_trait]
impl BlockStore for MockBlockStore {
    async fn get_block(&self, query: &BlockQuery) -> LedgerResult<BlockRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(LedgerError::StorageError("Mock failure".to_string()));
        }

        let blocks = self.blocks.read();
        let found = match query {
            BlockQuery::Id(id) => blocks.get(id),
            BlockQuery::Height(height) => blocks.values().find(|b| b.block_height == *height),
        };
        found
            .map(Self::record)
            .ok_or_else(|| LedgerError::NotFound(query.to_string()))
    }

    async fn get_latest_summary(&self) -> LedgerResult<LatestSummary> {
        if self.should_fail {
            return Err(LedgerError::StorageError("Mock failure".to_string()));
        }

        let latest = self.latest.read().clone();
        let blocks = self.blocks.read();
        latest
            .and_then(|id| blocks.get(&id))
            .map(|block| LatestSummary {
                event_block: Self::record(block),
            })
            .ok_or_else(|| LedgerError::NotFound("latest".to_string()))
    }

    fn node_id(&self) -> &str {
        &self.id
    }
}
