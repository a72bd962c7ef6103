//! # Convergence Checker
//!
//! Point-in-time comparison of the block several nodes hold at the same
//! chain point. Usable as a test oracle and as a health check.

use crate::algorithms::compare_blocks;
use crate::config::ConvergenceConfig;
use crate::domain::{
    Block, BlockQuery, ChainPoint, ConvergenceReport, LedgerError, LedgerResult,
};
use crate::ports::BlockStore;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Multi-node convergence checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvergenceChecker {
    min_nodes: usize,
}

impl Default for ConvergenceChecker {
    fn default() -> Self {
        Self::new(ConvergenceConfig::default())
    }
}

impl ConvergenceChecker {
    /// Create a checker from config.
    pub fn new(config: ConvergenceConfig) -> Self {
        Self {
            min_nodes: config.min_nodes,
        }
    }

    /// Compare every node's block at `point`.
    ///
    /// All nodes are queried concurrently. A node without a block at the
    /// point is reported as a divergence; any other storage error aborts
    /// the check.
    pub async fn check_convergence<S>(
        &self,
        nodes: &[Arc<S>],
        point: ChainPoint,
    ) -> LedgerResult<ConvergenceReport>
    where
        S: BlockStore + ?Sized,
    {
        if nodes.len() < self.min_nodes {
            return Err(LedgerError::InsufficientNodes {
                got: nodes.len(),
                required: self.min_nodes,
            });
        }

        let fetched = join_all(nodes.iter().map(|node| block_at(&**node, point))).await;

        let mut observations = Vec::with_capacity(nodes.len());
        for (node, block) in nodes.iter().zip(fetched) {
            observations.push((node.node_id().to_string(), block?));
        }

        let report = compare_blocks(&observations, self.min_nodes)?;
        match &report {
            ConvergenceReport::Agreement {
                block_height,
                nodes: count,
                ..
            } => info!(
                "[ledger-agent] {} nodes agree at height {}",
                count, block_height
            ),
            ConvergenceReport::Divergence(details) => warn!(
                "[ledger-agent] {} divergences at {:?}",
                details.len(),
                point
            ),
        }
        Ok(report)
    }
}

async fn block_at<S>(node: &S, point: ChainPoint) -> LedgerResult<Option<Block>>
where
    S: BlockStore + ?Sized,
{
    let result = match point {
        ChainPoint::Latest => node
            .get_latest_summary()
            .await
            .map(|summary| summary.event_block.block),
        ChainPoint::Height(height) => node
            .get_block(&BlockQuery::Height(height))
            .await
            .map(|record| record.block),
    };
    match result {
        Ok(block) => Ok(Some(block)),
        Err(LedgerError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
