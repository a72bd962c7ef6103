//! # Inbound Ports
//!
//! API traits defining what the ledger agent offers to the HTTP layer.
//! Wire framing is out of scope; these are the semantic contracts behind the
//! block query, latest-summary and operation-submission endpoints.

use crate::domain::{
    BlockQuery, BlockRecord, BlockServiceSummary, LedgerResult, Operation, Traversal,
};
use crate::application::ChainVerifier;
use async_trait::async_trait;

/// Ledger Agent API - inbound port.
#[async_trait]
pub trait LedgerAgentApi: Send + Sync {
    /// Agent id (`urn:uuid:...`).
    fn id(&self) -> &str;

    /// URL registered for a service type, if any.
    fn service_url(&self, service_type: &str) -> Option<&str>;

    /// Submit an operation to the agent's node.
    async fn submit_operation(&self, operation: Operation) -> LedgerResult<()>;

    /// Fetch one block (`GET <blockService>?id=...`).
    async fn get_block(&self, query: &BlockQuery) -> LedgerResult<BlockRecord>;

    /// Genesis and latest blocks (`GET <blockService>`).
    async fn block_summary(&self) -> LedgerResult<BlockServiceSummary>;

    /// Crawl the agent's chain from its latest block to genesis.
    async fn verify_chain(&self, verifier: &ChainVerifier) -> LedgerResult<Traversal>;
}
