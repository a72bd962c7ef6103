//! In-Memory Ledger Node Adapter
//!
//! Implements `LedgerNode` over process memory, plus a shared gossip log
//! standing in for the consensus worker's event propagation.
//!
//! A consensus round on a node does two things, in order:
//! 1. seal every operation pulled in an earlier round into one new block
//! 2. pull operations gossiped since the node's last pull
//!
//! Every node therefore needs two rounds after an operation is added before
//! the block carrying it exists, and nodes that share a genesis block and
//! see the same gossip log seal identical blocks.

use crate::domain::{
    Block, BlockId, BlockMeta, BlockQuery, BlockRecord, LatestSummary, LedgerError, LedgerResult,
    Operation,
};
use crate::ports::outbound::{BlockStore, LedgerNode, SystemTimeSource, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Append-only operation log shared by the nodes of one ledger.
#[derive(Default)]
pub struct GossipNetwork {
    log: RwLock<Vec<Operation>>,
}

impl GossipNetwork {
    /// Create an empty network.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of operations gossiped so far.
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    /// True before the first operation.
    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    fn publish(&self, operation: Operation) {
        self.log.write().push(operation);
    }

    /// Operations from `offset` on, and the new offset.
    fn pull_from(&self, offset: usize) -> (Vec<Operation>, usize) {
        let log = self.log.read();
        let start = offset.min(log.len());
        (log[start..].to_vec(), log.len())
    }
}

#[derive(Default)]
struct NodeState {
    /// Blocks keyed by id.
    blocks: HashMap<BlockId, BlockRecord>,
    /// Height index: `heights[h]` is the id at height `h`.
    heights: Vec<BlockId>,
    /// Pulled in an earlier round, sealed by the next one.
    pulled: Vec<Operation>,
    /// Gossip log offset already pulled.
    cursor: usize,
}

impl NodeState {
    fn latest(&self) -> Option<&BlockRecord> {
        self.heights.last().and_then(|id| self.blocks.get(id))
    }

    fn append(&mut self, record: BlockRecord) {
        self.heights.push(record.block.id.clone());
        self.blocks.insert(record.block.id.clone(), record);
    }
}

/// Ledger node holding its chain in memory.
pub struct InMemoryLedgerNode {
    node_id: String,
    ledger_id: String,
    network: Arc<GossipNetwork>,
    state: RwLock<NodeState>,
    clock: Arc<dyn TimeSource>,
}

impl InMemoryLedgerNode {
    /// Create a node whose chain starts at `genesis`.
    ///
    /// The ledger id is the genesis block id, so peers created from the same
    /// genesis block belong to the same ledger.
    ///
    /// # Errors
    /// - `LinkageInconsistent` if `genesis` is not a valid genesis block
    pub fn new(
        node_id: impl Into<String>,
        genesis: Block,
        network: Arc<GossipNetwork>,
    ) -> LedgerResult<Self> {
        Self::with_time_source(node_id, genesis, network, Arc::new(SystemTimeSource))
    }

    /// Create a node with an injected clock.
    pub fn with_time_source(
        node_id: impl Into<String>,
        genesis: Block,
        network: Arc<GossipNetwork>,
        clock: Arc<dyn TimeSource>,
    ) -> LedgerResult<Self> {
        genesis.check_linkage()?;
        if !genesis.is_genesis() {
            return Err(LedgerError::LinkageInconsistent {
                block_id: genesis.id.to_string(),
                detail: "genesis block has a parent".to_string(),
            });
        }

        let node_id = node_id.into();
        let ledger_id = genesis.id.to_string();
        let mut state = NodeState::default();
        state.append(BlockRecord::new(
            genesis.clone(),
            BlockMeta::sealed(&genesis, clock.now()),
        ));

        info!(
            "[ledger-agent] Ledger node {} joined ledger {}",
            node_id, ledger_id
        );

        Ok(Self {
            node_id,
            ledger_id,
            network,
            state: RwLock::new(state),
            clock,
        })
    }

    /// Current chain height.
    pub fn height(&self) -> u64 {
        self.state.read().heights.len().saturating_sub(1) as u64
    }

    /// Operations pulled and waiting for the next round.
    pub fn pending_operations(&self) -> usize {
        self.state.read().pulled.len()
    }

    fn block_id_at(&self, height: u64) -> BlockId {
        BlockId::new(format!("{}/blocks/{}", self.ledger_id, height))
    }
}

#[async_trait]
impl BlockStore for InMemoryLedgerNode {
    async fn get_block(&self, query: &BlockQuery) -> LedgerResult<BlockRecord> {
        let state = self.state.read();
        let found = match query {
            BlockQuery::Id(id) => state.blocks.get(id),
            BlockQuery::Height(height) => usize::try_from(*height)
                .ok()
                .and_then(|h| state.heights.get(h))
                .and_then(|id| state.blocks.get(id)),
        };
        found
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(query.to_string()))
    }

    async fn get_latest_summary(&self) -> LedgerResult<LatestSummary> {
        let state = self.state.read();
        let latest = state
            .latest()
            .cloned()
            .ok_or_else(|| LedgerError::StorageError("chain has no blocks".to_string()))?;
        Ok(LatestSummary {
            event_block: latest,
        })
    }

    fn node_id(&self) -> &str {
        &self.node_id
    }
}

#[async_trait]
impl LedgerNode for InMemoryLedgerNode {
    fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    async fn add_operation(&self, operation: Operation) -> LedgerResult<()> {
        if !operation.is_object() {
            return Err(LedgerError::InvalidOperation(
                "operation must be a JSON object".to_string(),
            ));
        }
        debug!("[ledger-agent] Node {} accepted operation", self.node_id);
        self.network.publish(operation);
        Ok(())
    }

    async fn run_consensus_round(&self) -> LedgerResult<Vec<BlockRecord>> {
        let mut state = self.state.write();
        let mut sealed = Vec::new();

        if !state.pulled.is_empty() {
            let parent = state
                .latest()
                .map(|record| record.block.clone())
                .ok_or_else(|| LedgerError::StorageError("chain has no blocks".to_string()))?;
            let operations = std::mem::take(&mut state.pulled);
            let block = Block::child_of(
                &parent,
                self.block_id_at(parent.block_height + 1),
                operations,
            );
            let record = BlockRecord::new(block.clone(), BlockMeta::sealed(&block, self.clock.now()));

            info!(
                "[ledger-agent] Node {} sealed block {} at height {} ({} operations)",
                self.node_id,
                block.id,
                block.block_height,
                block.operations.len()
            );
            state.append(record.clone());
            sealed.push(record);
        }

        let (pulled, cursor) = self.network.pull_from(state.cursor);
        if !pulled.is_empty() {
            debug!(
                "[ledger-agent] Node {} pulled {} gossiped operations",
                self.node_id,
                pulled.len()
            );
        }
        state.pulled.extend(pulled);
        state.cursor = cursor;

        Ok(sealed)
    }
}
