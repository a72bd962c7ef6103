//! # Ledger Agent Blocks
//!
//! Read facade behind the agent's block service.

use crate::domain::{BlockQuery, BlockRecord, BlockServiceSummary, LedgerResult};
use crate::ports::LedgerNode;
use std::sync::Arc;
use tracing::debug;

/// Block access through one agent's ledger node.
#[derive(Clone)]
pub struct LedgerAgentBlocks {
    node: Arc<dyn LedgerNode>,
}

impl LedgerAgentBlocks {
    /// Wrap a ledger node.
    pub fn new(node: Arc<dyn LedgerNode>) -> Self {
        Self { node }
    }

    /// Fetch one block (`GET <blockService>?id=...`).
    pub async fn get(&self, query: &BlockQuery) -> LedgerResult<BlockRecord> {
        debug!(
            "[ledger-agent] Block query {} on {}",
            query,
            self.node.node_id()
        );
        self.node.get_block(query).await
    }

    /// Parse HTTP-style query parameters, then fetch.
    pub async fn get_from_params<'a, I>(&self, params: I) -> LedgerResult<BlockRecord>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let query = BlockQuery::from_params(params)?;
        self.get(&query).await
    }

    /// Genesis and latest blocks (`GET <blockService>`).
    pub async fn summary(&self) -> LedgerResult<BlockServiceSummary> {
        let genesis = self.node.get_block(&BlockQuery::Height(0)).await?;
        let latest = self.node.get_latest_summary().await?.event_block;
        BlockServiceSummary::new(genesis, latest)
    }
}
