//! # Multi-Node Continuity
//!
//! Four nodes share one genesis block. Operations are submitted only
//! through the agent on the genesis node and reach the other nodes by
//! gossip. After two worker rounds per node and per operation, every node
//! must hold the same chain.

#[cfg(test)]
mod tests {
    use crate::integration::{create_concert_record, init_tracing, TestLedger};
    use ledger_agent::{
        BlockField, BlockQuery, BlockStore, ChainPoint, ConvergenceChecker, ConvergenceConfig,
        ConvergenceReport, LedgerAgentApi, LedgerNode,
    };

    const NODES: usize = 4;
    const OPERATIONS: u64 = 3;

    #[tokio::test]
    async fn test_four_nodes_add_three_events_and_blocks() {
        init_tracing();
        let ledger = TestLedger::provision(NODES).await.unwrap();

        for n in 0..OPERATIONS {
            ledger
                .agent
                .submit_operation(create_concert_record())
                .await
                .unwrap();
            ledger.run_workers(2).await.unwrap();

            let summary = ledger.agent.block_summary().await.unwrap();
            assert_eq!(summary.latest.block.block_height, n + 1);
            assert_eq!(summary.latest.block.operations.len(), 1);
        }

        let mut heads = Vec::new();
        for peer in &ledger.peers {
            heads.push(peer.get_latest_summary().await.unwrap().event_block.block);
        }
        for head in &heads {
            assert_eq!(head, &heads[0]);
        }
        assert_eq!(heads[0].block_height, OPERATIONS);

        let checker = ConvergenceChecker::new(ConvergenceConfig { min_nodes: NODES });
        let report = checker
            .check_convergence(&ledger.peers, ChainPoint::Latest)
            .await
            .unwrap();
        assert!(matches!(
            report,
            ConvergenceReport::Agreement { block_height: 3, nodes: NODES, .. }
        ));
    }

    #[tokio::test]
    async fn test_every_height_converges() {
        init_tracing();
        let ledger = TestLedger::provision(NODES).await.unwrap();
        for _ in 0..OPERATIONS {
            ledger
                .agent
                .submit_operation(create_concert_record())
                .await
                .unwrap();
            ledger.run_workers(2).await.unwrap();
        }

        let checker = ConvergenceChecker::default();
        for height in 0..=OPERATIONS {
            let report = checker
                .check_convergence(&ledger.peers, ChainPoint::Height(height))
                .await
                .unwrap();
            assert!(report.is_agreement(), "height {height}: {report:?}");
        }
    }

    #[tokio::test]
    async fn test_lagging_node_is_reported() {
        init_tracing();
        let ledger = TestLedger::provision(NODES).await.unwrap();
        ledger
            .agent
            .submit_operation(create_concert_record())
            .await
            .unwrap();

        // every node but the last runs its two rounds
        for _ in 0..2 {
            for peer in &ledger.peers[..NODES - 1] {
                peer.run_consensus_round().await.unwrap();
            }
        }

        let checker = ConvergenceChecker::default();
        let at_height = checker
            .check_convergence(&ledger.peers, ChainPoint::Height(1))
            .await
            .unwrap();
        let details = at_height.divergences();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].node_id, "node-3");
        assert_eq!(details[0].field, BlockField::Presence);

        let at_latest = checker
            .check_convergence(&ledger.peers, ChainPoint::Latest)
            .await
            .unwrap();
        assert!(!at_latest.is_agreement());
        assert!(at_latest
            .divergences()
            .iter()
            .all(|d| d.node_id == "node-3"));
        assert!(at_latest
            .divergences()
            .iter()
            .any(|d| d.field == BlockField::BlockHeight));
    }

    #[tokio::test]
    async fn test_operations_gossip_to_every_node() {
        init_tracing();
        let ledger = TestLedger::provision(NODES).await.unwrap();
        let operation = create_concert_record();
        ledger.agent.submit_operation(operation.clone()).await.unwrap();
        ledger.run_workers(2).await.unwrap();

        assert_eq!(ledger.network.len(), 1);
        for peer in &ledger.peers {
            let record = peer.get_block(&BlockQuery::Height(1)).await.unwrap();
            assert_eq!(record.block.operations, vec![operation.clone()]);
            assert_eq!(record.meta.block_hash, record.block.content_hash());
        }
    }

    #[tokio::test]
    async fn test_peers_share_ledger_id() {
        let ledger = TestLedger::provision(NODES).await.unwrap();
        let ledger_id = ledger.peers[0].ledger_id().to_string();
        assert!(ledger_id.starts_with("urn:uuid:"));
        assert!(ledger.peers.iter().all(|p| p.ledger_id() == ledger_id));
    }
}
