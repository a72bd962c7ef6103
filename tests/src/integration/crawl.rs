//! # Crawl To Genesis
//!
//! Walks a live multi-node chain back to genesis, and checks that corrupted
//! chains stop with the right failure within the attempt bound.

#[cfg(test)]
mod tests {
    use crate::integration::{create_concert_record, init_tracing, TestLedger};
    use async_trait::async_trait;
    use ledger_agent::{
        Block, BlockId, BlockMeta, BlockQuery, BlockRecord, BlockStore, ChainVerifier,
        LatestSummary, LedgerAgentApi, LedgerError, LedgerResult, MockBlockStore, Traversal,
        VerifierConfig, DEFAULT_MAX_CRAWL_ATTEMPTS,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose blocks point at each other in a two-id cycle while
    /// reporting ever-decreasing heights, so every per-hop check passes.
    struct CyclicStore {
        start_height: u64,
        fetches: AtomicUsize,
    }

    impl CyclicStore {
        fn new(start_height: u64) -> Self {
            Self {
                start_height,
                fetches: AtomicUsize::new(0),
            }
        }

        fn block(&self, id: &str, height: u64) -> Block {
            let parent = if id == "a" { "b" } else { "a" };
            Block {
                id: BlockId::from(id),
                block_height: height,
                previous_block: Some(BlockId::from(parent)),
                previous_block_hash: Some([0xAB; 32]),
                operations: vec![],
            }
        }

        fn head(&self) -> Block {
            self.block("a", self.start_height)
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BlockStore for CyclicStore {
        async fn get_block(&self, query: &BlockQuery) -> LedgerResult<BlockRecord> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) as u64 + 1;
            let BlockQuery::Id(id) = query else {
                return Err(LedgerError::InvalidQuery(query.to_string()));
            };
            let block = self.block(id.as_str(), self.start_height - n);
            let meta = BlockMeta::sealed(&block, 0);
            Ok(BlockRecord::new(block, meta))
        }

        async fn get_latest_summary(&self) -> LedgerResult<LatestSummary> {
            let block = self.head();
            let meta = BlockMeta::sealed(&block, 0);
            Ok(LatestSummary {
                event_block: BlockRecord::new(block, meta),
            })
        }

        fn node_id(&self) -> &str {
            "cyclic"
        }
    }

    #[tokio::test]
    async fn test_crawl_to_genesis_from_latest_block() {
        init_tracing();
        let ledger = TestLedger::provision(4).await.unwrap();
        for _ in 0..3 {
            ledger
                .agent
                .submit_operation(create_concert_record())
                .await
                .unwrap();
            ledger.run_workers(2).await.unwrap();
        }

        let traversal = ledger
            .agent
            .verify_chain(&ChainVerifier::default())
            .await
            .unwrap();
        let Traversal::ReachedGenesis { genesis, attempts } = traversal.clone() else {
            panic!("crawl did not reach genesis: {traversal:?}");
        };
        assert_eq!(attempts, 3);
        assert!(genesis.previous_block.is_none());
        assert!(genesis.previous_block_hash.is_none());
        assert_eq!(genesis.block_height, 0);

        let summary = ledger.agent.block_summary().await.unwrap();
        assert_eq!(genesis, summary.genesis.block);
    }

    #[tokio::test]
    async fn test_crawl_through_block_service_queries() {
        init_tracing();
        let ledger = TestLedger::provision(2).await.unwrap();
        for _ in 0..2 {
            ledger
                .agent
                .submit_operation(create_concert_record())
                .await
                .unwrap();
            ledger.run_workers(2).await.unwrap();
        }

        // client-side walk using `?id=` queries, as an HTTP client would
        let blocks = ledger.agent.blocks();
        let mut current = blocks.summary().await.unwrap().latest.block;
        let mut hops = 0;
        while let Some(parent) = current.previous_block.clone() {
            let record = blocks
                .get_from_params([("id", parent.as_str())])
                .await
                .unwrap();
            current = record.block;
            hops += 1;
            assert!(hops <= DEFAULT_MAX_CRAWL_ATTEMPTS);
        }
        assert_eq!(hops, 2);
        assert!(current.previous_block_hash.is_none());
    }

    #[tokio::test]
    async fn test_every_peer_crawls_to_genesis() {
        init_tracing();
        let ledger = TestLedger::provision(4).await.unwrap();
        ledger
            .agent
            .submit_operation(create_concert_record())
            .await
            .unwrap();
        ledger.run_workers(2).await.unwrap();

        let verifier = ChainVerifier::default();
        for peer in &ledger.peers {
            let traversal = verifier.verify_from_latest(&**peer).await.unwrap();
            assert!(traversal.reached_genesis(), "{}", peer.node_id());
            assert_eq!(traversal.attempts(), 1);
        }
    }

    #[tokio::test]
    async fn test_parent_cycle_stops_after_bounded_fetches() {
        init_tracing();
        let store = CyclicStore::new(1_000);

        let traversal = ChainVerifier::default()
            .verify_from_latest(&store)
            .await
            .unwrap();
        assert_eq!(
            traversal.reason(),
            Some(&LedgerError::IncompleteTraversal {
                max_attempts: DEFAULT_MAX_CRAWL_ATTEMPTS
            })
        );
        assert_eq!(store.fetch_count(), DEFAULT_MAX_CRAWL_ATTEMPTS as usize + 1);
        assert_eq!(traversal.attempts(), DEFAULT_MAX_CRAWL_ATTEMPTS + 1);
    }

    #[tokio::test]
    async fn test_cycle_bound_follows_config() {
        let store = CyclicStore::new(1_000);
        let verifier = ChainVerifier::new(VerifierConfig { max_attempts: 5 });

        let traversal = verifier.crawl(&store, store.head()).await.unwrap();
        assert!(matches!(
            traversal.reason(),
            Some(LedgerError::IncompleteTraversal { max_attempts: 5 })
        ));
        assert_eq!(store.fetch_count(), 6);
    }

    #[tokio::test]
    async fn test_missing_parent_breaks_chain() {
        let store = MockBlockStore::new("gappy");
        let genesis = Block::genesis("g".into(), vec![]);
        let b1 = Block::child_of(&genesis, "b1".into(), vec![]);
        let b2 = Block::child_of(&b1, "b2".into(), vec![]);
        let b3 = Block::child_of(&b2, "b3".into(), vec![]);
        store.insert(genesis);
        store.insert(b1);
        store.insert(b3);

        let traversal = ChainVerifier::default()
            .verify_from_latest(&store)
            .await
            .unwrap();
        assert!(matches!(
            traversal.reason(),
            Some(LedgerError::ChainBroken { block_id, parent_id })
                if block_id == "b3" && parent_id == "b2"
        ));
        assert_eq!(traversal.last_block().id.as_str(), "b3");
    }
}
