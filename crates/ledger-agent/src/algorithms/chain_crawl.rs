//! # Chain Crawl
//!
//! Backward traversal from a block to genesis along parent pointers.
//!
//! Each hop fetches the parent by id, checks linkage and height, then moves.
//! The hop count is bounded, so a cycle or a chain without a true genesis
//! costs at most `max_attempts + 1` fetches.

use crate::domain::{
    invariant_genesis_linkage, invariant_parent_height, Block, BlockQuery, LedgerError,
    LedgerResult, Traversal,
};
use crate::ports::BlockStore;
use tracing::{debug, warn};

/// Walk parent links from `start` until genesis or the attempt bound.
///
/// Integrity failures come back as `Traversal::Stopped`; only storage errors
/// other than a missing parent are returned as `Err`.
///
/// # Checks (per hop)
/// 1. Parent id and parent hash are both present or both absent
/// 2. The parent resolves (`ChainBroken` otherwise)
/// 3. Parent height is child height minus one
///
/// A genesis fetched on the hop that exhausts the bound still counts as
/// reached; `IncompleteTraversal` is only returned when the block in hand
/// after `max_attempts + 1` hops still has a parent.
pub async fn crawl_to_genesis<S>(
    store: &S,
    start: Block,
    max_attempts: u32,
) -> LedgerResult<Traversal>
where
    S: BlockStore + ?Sized,
{
    let mut current = start;
    let mut attempts = 0u32;

    loop {
        if let Err(reason) = invariant_genesis_linkage(&current) {
            return Ok(stop(store, current, attempts, reason));
        }

        let Some(parent_id) = current.previous_block.clone() else {
            debug!(
                "[ledger-agent] Reached genesis {} on {} after {} attempts",
                current.id,
                store.node_id(),
                attempts
            );
            return Ok(Traversal::ReachedGenesis {
                genesis: current,
                attempts,
            });
        };

        let parent = match store.get_block(&BlockQuery::Id(parent_id.clone())).await {
            Ok(record) => record.block,
            Err(LedgerError::NotFound(_)) => {
                let reason = LedgerError::ChainBroken {
                    block_id: current.id.to_string(),
                    parent_id: parent_id.to_string(),
                };
                return Ok(stop(store, current, attempts, reason));
            }
            Err(e) => return Err(e),
        };

        if let Err(reason) = invariant_parent_height(&current, &parent) {
            return Ok(stop(store, current, attempts, reason));
        }

        current = parent;
        attempts += 1;

        if attempts > max_attempts && current.previous_block.is_some() {
            let reason = LedgerError::IncompleteTraversal { max_attempts };
            return Ok(stop(store, current, attempts, reason));
        }
    }
}

/// Crawl from the store's current head.
pub async fn crawl_from_latest<S>(store: &S, max_attempts: u32) -> LedgerResult<Traversal>
where
    S: BlockStore + ?Sized,
{
    let summary = store.get_latest_summary().await?;
    crawl_to_genesis(store, summary.event_block.block, max_attempts).await
}

fn stop<S: BlockStore + ?Sized>(
    store: &S,
    last_block: Block,
    attempts: u32,
    reason: LedgerError,
) -> Traversal {
    warn!(
        "[ledger-agent] Crawl on {} stopped at {} after {} attempts: {}",
        store.node_id(),
        last_block.id,
        attempts,
        reason
    );
    Traversal::Stopped {
        last_block,
        attempts,
        reason,
    }
}
