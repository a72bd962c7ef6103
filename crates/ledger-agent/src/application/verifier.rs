//! # Chain Verifier
//!
//! Bounded crawl from a block (or a node's head) back to genesis.

use crate::algorithms::{crawl_from_latest, crawl_to_genesis};
use crate::config::VerifierConfig;
use crate::domain::{Block, LedgerResult, Traversal};
use crate::ports::BlockStore;
use tracing::info;

/// Chain verifier with a fixed attempt bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainVerifier {
    max_attempts: u32,
}

impl Default for ChainVerifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl ChainVerifier {
    /// Create a verifier from config.
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
        }
    }

    /// Parent hops allowed before a crawl gives up.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Crawl from `start` to genesis on `store`.
    pub async fn crawl<S>(&self, store: &S, start: Block) -> LedgerResult<Traversal>
    where
        S: BlockStore + ?Sized,
    {
        crawl_to_genesis(store, start, self.max_attempts).await
    }

    /// Crawl from the store's latest block to genesis.
    pub async fn verify_from_latest<S>(&self, store: &S) -> LedgerResult<Traversal>
    where
        S: BlockStore + ?Sized,
    {
        let traversal = crawl_from_latest(store, self.max_attempts).await?;
        if traversal.reached_genesis() {
            info!(
                "[ledger-agent] Chain on {} verified to genesis in {} attempts",
                store.node_id(),
                traversal.attempts()
            );
        }
        Ok(traversal)
    }
}
