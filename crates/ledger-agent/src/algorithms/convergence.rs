//! # Convergence Comparison
//!
//! Compare the blocks several nodes hold at one chain point.
//!
//! Only consensus content is compared. `BlockMeta` (storage timestamps and
//! the like) is node-local and never inspected here.

use crate::domain::{
    Block, BlockField, ConvergenceReport, Hash, LedgerError, LedgerResult, NodeDivergence,
    MIN_CONVERGENCE_NODES,
};
use serde_json::Value;

/// Compare `(node_id, block)` observations.
///
/// The reference is the block held by the most nodes (by content hash);
/// ties go to the block seen first. Nodes without a block at the point
/// diverge on `BlockField::Presence`.
///
/// # Errors
/// - `InsufficientNodes` if fewer than `min_nodes` observations are given
/// - `NotFound` if no node holds a block at the point
pub fn compare_blocks(
    observations: &[(String, Option<Block>)],
    min_nodes: usize,
) -> LedgerResult<ConvergenceReport> {
    let required = min_nodes.max(MIN_CONVERGENCE_NODES);
    if observations.len() < required {
        return Err(LedgerError::InsufficientNodes {
            got: observations.len(),
            required,
        });
    }

    let Some(reference) = majority_block(observations) else {
        return Err(LedgerError::NotFound(
            "no node holds a block at this point".to_string(),
        ));
    };

    let mut divergences = Vec::new();
    for (node_id, block) in observations {
        match block {
            Some(block) => divergences.extend(
                diff_fields(reference, block)
                    .into_iter()
                    .map(|(field, expected, actual)| NodeDivergence {
                        node_id: node_id.clone(),
                        field,
                        expected,
                        actual,
                    }),
            ),
            None => divergences.push(NodeDivergence {
                node_id: node_id.clone(),
                field: BlockField::Presence,
                expected: reference.id.to_string(),
                actual: "missing".to_string(),
            }),
        }
    }

    if divergences.is_empty() {
        Ok(ConvergenceReport::Agreement {
            block_height: reference.block_height,
            block_hash: reference.content_hash(),
            nodes: observations.len(),
        })
    } else {
        Ok(ConvergenceReport::Divergence(divergences))
    }
}

/// Most common block among the observations, earliest on a tie.
fn majority_block(observations: &[(String, Option<Block>)]) -> Option<&Block> {
    // Count occurrences of each content hash, in first-seen order
    let mut counts: Vec<(Hash, usize, &Block)> = Vec::new();
    for block in observations.iter().filter_map(|(_, block)| block.as_ref()) {
        let hash = block.content_hash();
        match counts.iter_mut().find(|(h, _, _)| *h == hash) {
            Some((_, count, _)) => *count += 1,
            None => counts.push((hash, 1, block)),
        }
    }

    let mut best: Option<(usize, &Block)> = None;
    for (_, count, block) in counts {
        if best.map_or(true, |(top, _)| count > top) {
            best = Some((count, block));
        }
    }
    best.map(|(_, block)| block)
}

/// Field-by-field difference between two blocks as `(field, expected, actual)`.
pub fn diff_fields(expected: &Block, actual: &Block) -> Vec<(BlockField, String, String)> {
    let mut diffs = Vec::new();

    if expected.id != actual.id {
        diffs.push((BlockField::Id, expected.id.to_string(), actual.id.to_string()));
    }
    if expected.block_height != actual.block_height {
        diffs.push((
            BlockField::BlockHeight,
            expected.block_height.to_string(),
            actual.block_height.to_string(),
        ));
    }
    if expected.previous_block != actual.previous_block {
        diffs.push((
            BlockField::PreviousBlock,
            render_opt(expected.previous_block.as_ref().map(|id| id.to_string())),
            render_opt(actual.previous_block.as_ref().map(|id| id.to_string())),
        ));
    }
    if expected.previous_block_hash != actual.previous_block_hash {
        diffs.push((
            BlockField::PreviousBlockHash,
            render_opt(expected.previous_block_hash.map(hex::encode)),
            render_opt(actual.previous_block_hash.map(hex::encode)),
        ));
    }
    if expected.operations != actual.operations {
        diffs.push((
            BlockField::Operations,
            Value::Array(expected.operations.clone()).to_string(),
            Value::Array(actual.operations.clone()).to_string(),
        ));
    }

    diffs
}

fn render_opt(value: Option<String>) -> String {
    value.unwrap_or_else(|| "none".to_string())
}
