//! # Domain Invariants
//!
//! Linkage rules every block and every adjacent pair must satisfy.

use super::entities::Block;
use super::errors::{LedgerError, LedgerResult};

/// Default bound on parent hops during a crawl to genesis.
pub const DEFAULT_MAX_CRAWL_ATTEMPTS: u32 = 20;

/// Minimum nodes a convergence check accepts.
pub const MIN_CONVERGENCE_NODES: usize = 1;

/// Identifier scheme prefix stripped from agent ids in service URLs.
pub const AGENT_ID_PREFIX: &str = "urn:uuid:";

/// Invariant: `previous_block` absent ⇔ `block_height == 0` ⇔
/// `previous_block_hash` absent.
pub fn invariant_genesis_linkage(block: &Block) -> LedgerResult<()> {
    let inconsistent = |detail: &str| LedgerError::LinkageInconsistent {
        block_id: block.id.to_string(),
        detail: detail.to_string(),
    };

    match (&block.previous_block, &block.previous_block_hash) {
        (None, Some(_)) => Err(inconsistent("parent hash without parent id")),
        (Some(_), None) => Err(inconsistent("parent id without parent hash")),
        (None, None) if block.block_height != 0 => Err(inconsistent(&format!(
            "parentless block at height {}",
            block.block_height
        ))),
        (Some(_), Some(_)) if block.block_height == 0 => {
            Err(inconsistent("height 0 block with a parent"))
        }
        _ => Ok(()),
    }
}

/// Invariant: a parent sits exactly one height below its child.
pub fn invariant_parent_height(child: &Block, parent: &Block) -> LedgerResult<()> {
    let expected = child.block_height.saturating_sub(1);
    if child.block_height == 0 || parent.block_height != expected {
        return Err(LedgerError::HeightMismatch {
            block_id: child.id.to_string(),
            expected,
            actual: parent.block_height,
        });
    }
    Ok(())
}
