//! # Integration Test Flows
//!
//! One producer feeding the ring buffer while persistence, verification and
//! a live stream drain it at their own pace:
//!
//! ```text
//! producer ──→ ring ──┬──→ persistence  ──→ <root>/<n>.blk ──→ block access
//!                     ├──→ verification ──→ VerificationResult
//!                     └──→ live stream  ──→ client
//! ```

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use bn_02_block_access::{BlockRequest, BlockResponseCode};
    use bn_03_signature_verification::VerificationStatus;
    use node_runtime::{BlockNodeContainer, NodeConfig};
    use shared_types::test_utils::{batch, block_items, chunked_batches, content_item, header_item, proof_item};
    use shared_types::{Block, BlockItem, BlockItemBatch, PublishStreamResponse};
    use tempfile::TempDir;

    const RECV_TIMEOUT: Duration = Duration::from_secs(10);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn node_config(root: &TempDir) -> NodeConfig {
        let mut config = NodeConfig::default();
        config.mediator.ring_buffer_size = 8;
        config.mediator.poller_batch_size = 3;
        config.persistence.live_root_path = root.path().to_path_buf();
        config
    }

    async fn publish_all(container: &mut BlockNodeContainer, batches: Vec<BlockItemBatch>) {
        let mut producer = container.producer().unwrap();
        tokio::task::spawn_blocking(move || {
            for batch in batches {
                producer.publish(batch).unwrap();
            }
        })
        .await
        .unwrap();
    }

    async fn shutdown(container: BlockNodeContainer) {
        tokio::task::spawn_blocking(move || drop(container)).await.unwrap();
    }

    // =============================================================================
    // PUBLISH → PERSIST → ACKNOWLEDGE → READ
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocks_split_across_batches_are_acknowledged_and_readable() {
        let root = TempDir::new().unwrap();
        let mut container = BlockNodeContainer::new(node_config(&root)).unwrap();
        let mut acks = container.acknowledgements().unwrap();

        // Ten items per block, five per batch: every block spans two batches.
        publish_all(&mut container, chunked_batches(0, 9, 5)).await;

        for n in 0..10 {
            let ack = timeout(RECV_TIMEOUT, acks.recv()).await.unwrap();
            assert_eq!(ack, Some(PublishStreamResponse::ack(n)));
        }

        let access = container.block_access();
        for n in 0..10 {
            let response = access.single_block(&BlockRequest::new(n));
            assert_eq!(response.status, BlockResponseCode::ReadBlockSuccess);
            assert_eq!(response.block, Some(Block::new(block_items(n))));
        }
        assert_eq!(
            access.single_block(&BlockRequest::new(10)).status,
            BlockResponseCode::ReadBlockNotFound
        );

        shutdown(container).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unaligned_batches_store_every_block() {
        let root = TempDir::new().unwrap();
        let mut container = BlockNodeContainer::new(node_config(&root)).unwrap();
        let mut acks = container.acknowledgements().unwrap();

        // Seven items per batch: batches straddle blocks and carry two heads.
        let batches = chunked_batches(0, 9, 7);
        let closing = batches.iter().filter(|b| b.last_item().is_block_proof()).count();
        publish_all(&mut container, batches).await;

        // The final batch ends with a proof, so its ack means every batch was written.
        for _ in 0..closing {
            timeout(RECV_TIMEOUT, acks.recv()).await.unwrap().unwrap();
        }

        let access = container.block_access();
        for n in 0..10 {
            let response = access.single_block(&BlockRequest::new(n));
            assert_eq!(response.status, BlockResponseCode::ReadBlockSuccess);
            assert_eq!(response.block, Some(Block::new(block_items(n))));
        }

        shutdown(container).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_persisted_blocks_survive_restart() {
        let root = TempDir::new().unwrap();
        {
            let mut container = BlockNodeContainer::new(node_config(&root)).unwrap();
            let mut acks = container.acknowledgements().unwrap();
            publish_all(&mut container, chunked_batches(0, 2, 10)).await;
            for _ in 0..3 {
                timeout(RECV_TIMEOUT, acks.recv()).await.unwrap().unwrap();
            }
            shutdown(container).await;
        }

        let container = BlockNodeContainer::new(node_config(&root)).unwrap();
        let response = container.block_access().single_block(&BlockRequest::new(2));
        assert_eq!(response.status, BlockResponseCode::ReadBlockSuccess);
        shutdown(container).await;
    }

    // =============================================================================
    // VERIFICATION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_verification_flags_forged_block_without_stopping_persistence() {
        let root = TempDir::new().unwrap();
        let mut container = BlockNodeContainer::new(node_config(&root)).unwrap();
        let mut acks = container.acknowledgements().unwrap();
        let mut results = container.verification_results().unwrap();

        let forged: Vec<BlockItem> = vec![
            header_item(1),
            content_item(1, 0),
            content_item(1, 1),
            proof_item(1, vec![0u8; 48]),
        ];
        let batches = vec![batch(block_items(0)), batch(forged), batch(block_items(2))];
        publish_all(&mut container, batches).await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let result = timeout(RECV_TIMEOUT, results.recv()).await.unwrap().unwrap();
            statuses.push((result.block_number, result.status));
        }
        assert_eq!(
            statuses,
            vec![
                (0, VerificationStatus::Verified),
                (1, VerificationStatus::SignatureInvalid),
                (2, VerificationStatus::Verified),
            ]
        );

        for n in 0..3 {
            let ack = timeout(RECV_TIMEOUT, acks.recv()).await.unwrap();
            assert_eq!(ack, Some(PublishStreamResponse::ack(n)));
        }

        shutdown(container).await;
    }

    // =============================================================================
    // LIVE STREAMS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_live_streams_receive_every_batch_in_order() {
        let root = TempDir::new().unwrap();
        let mut container = BlockNodeContainer::new(node_config(&root)).unwrap();
        let mut first = container.subscribe_live("first").unwrap();
        let mut second = container.subscribe_live("second").unwrap();

        let batches = chunked_batches(0, 4, 3);
        let expected: Vec<BlockItem> = batches.iter().flat_map(|b| b.iter().cloned()).collect();
        let count = batches.len();

        // Live channels hold 64 batches, so both clients can lag until the end.
        publish_all(&mut container, batches).await;

        for stream in [&mut first, &mut second] {
            let mut received = Vec::new();
            for _ in 0..count {
                let batch = timeout(RECV_TIMEOUT, stream.recv()).await.unwrap().unwrap();
                received.extend(batch.iter().cloned());
            }
            assert_eq!(received, expected);
        }

        drop(first);
        drop(second);
        assert_eq!(container.ring().gating_sequence_count(), 2);
        shutdown(container).await;
    }
}
