//! # Backpressure and Failure Flows
//!
//! The publisher may never run more than one ring ahead of the slowest
//! registered subscriber. A subscriber that leaves stops holding it back.

#[cfg(test)]
mod tests {
    use std::sync::mpsc as std_mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use bn_01_persistence::{BlockAsFileReader, BlockAsFileWriter, PersistenceHandler};
    use bn_02_block_access::{BlockAccessApi, BlockAccessService, BlockRequest, BlockResponseCode};
    use node_runtime::{BlockNodeContainer, NodeConfig, ProducerError, RingBufferProducer, StreamProducer};
    use shared_bus::{spawn_subscriber, BlockItemRingBuffer, RingBuffer, WaitStrategy};
    use shared_types::test_utils::block_batch;
    use shared_types::{BlockItemBatch, EndStreamCode, PublishStreamResponse, ServiceStatus};
    use tempfile::TempDir;

    const WAIT: WaitStrategy = WaitStrategy::Sleeping(Duration::from_micros(50));
    const DONE_TIMEOUT: Duration = Duration::from_secs(10);

    fn ring(capacity: usize) -> Arc<BlockItemRingBuffer> {
        Arc::new(RingBuffer::new(capacity, WAIT).unwrap())
    }

    /// Handler that waits for one token per batch.
    fn gated_handler(gate: std_mpsc::Receiver<()>) -> impl FnMut(&BlockItemBatch) + Send + 'static {
        move |_batch: &BlockItemBatch| {
            let _ = gate.recv();
        }
    }

    fn wait_until(condition: impl Fn() -> bool) {
        let deadline = Instant::now() + DONE_TIMEOUT;
        while !condition() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            thread::sleep(Duration::from_millis(2));
        }
    }

    // =============================================================================
    // SLOW SUBSCRIBERS
    // =============================================================================

    #[test]
    fn test_slow_subscriber_bounds_publisher_lead() {
        let ring = ring(4);
        let mut publisher = ring.publisher().unwrap();
        let (gate_tx, gate_rx) = std_mpsc::channel();
        let handle = spawn_subscriber("gated", &ring, 1, WAIT, gated_handler(gate_rx)).unwrap();

        let producer = thread::spawn(move || {
            for n in 0..20 {
                publisher.append(block_batch(n));
            }
        });

        // The subscriber drains sequence 0 and parks inside its handler.
        wait_until(|| handle.sequence() == 0);
        wait_until(|| ring.cursor() == 4);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ring.cursor(), 4);
        assert_eq!(ring.remaining_capacity(), 0);

        for _ in 0..20 {
            gate_tx.send(()).unwrap();
        }
        producer.join().unwrap();
        wait_until(|| handle.sequence() == 19);
        assert!(ring.cursor() - ring.minimum_gating_sequence() <= 4);
    }

    #[test]
    fn test_stopping_stalled_subscriber_releases_publisher() {
        let ring = ring(2);
        let mut publisher = ring.publisher().unwrap();
        let (gate_tx, gate_rx) = std_mpsc::channel::<()>();
        let mut handle = spawn_subscriber("stalled", &ring, 1, WAIT, gated_handler(gate_rx)).unwrap();

        let (done_tx, done_rx) = std_mpsc::channel();
        let producer = thread::spawn(move || {
            for n in 0..10 {
                publisher.append(block_batch(n));
            }
            done_tx.send(()).unwrap();
        });
        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());

        // stop() deregisters before joining, so the publisher resumes while
        // the handler is still parked.
        let stopper = thread::spawn(move || handle.stop());
        done_rx.recv_timeout(DONE_TIMEOUT).unwrap();
        assert_eq!(ring.gating_sequence_count(), 0);

        drop(gate_tx);
        stopper.join().unwrap();
        producer.join().unwrap();
    }

    #[test]
    fn test_dropped_live_stream_releases_node() {
        let root = TempDir::new().unwrap();
        let mut config = NodeConfig::default();
        config.mediator.ring_buffer_size = 4;
        config.mediator.poller_batch_size = 1;
        config.mediator.live_stream_capacity = 1;
        config.persistence.live_root_path = root.path().to_path_buf();

        let mut container = BlockNodeContainer::new(config).unwrap();
        let live = container.subscribe_live("idle-client").unwrap();
        let mut producer = container.producer().unwrap();

        let (done_tx, done_rx) = std_mpsc::channel();
        let publishing = thread::spawn(move || {
            for n in 0..32 {
                producer.publish(block_batch(n)).unwrap();
            }
            done_tx.send(()).unwrap();
        });

        // A client that never reads stalls the whole node after a few batches.
        assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert!(container.ring().cursor() < 31);

        drop(live);
        done_rx.recv_timeout(DONE_TIMEOUT).unwrap();
        publishing.join().unwrap();
        assert_eq!(container.ring().cursor(), 31);
    }

    // =============================================================================
    // PERSISTENCE FAILURE
    // =============================================================================

    #[test]
    fn test_persistence_failure_ends_stream_and_disables_access() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("live");
        let ring = ring(8);
        let status = Arc::new(ServiceStatus::default());
        let (ack_tx, mut acks) = tokio::sync::mpsc::unbounded_channel();

        let writer = BlockAsFileWriter::new(&root).unwrap();
        let _persistence = spawn_subscriber(
            "persistence",
            &ring,
            4,
            WAIT,
            PersistenceHandler::new(writer, ack_tx, Arc::clone(&status)),
        )
        .unwrap();
        let access = BlockAccessService::new(Arc::clone(&status), BlockAsFileReader::new(&root));
        let mut producer = RingBufferProducer::new(ring.publisher().unwrap(), Arc::clone(&status));

        producer.publish(block_batch(0)).unwrap();
        assert_eq!(acks.blocking_recv(), Some(PublishStreamResponse::ack(0)));
        assert_eq!(
            access.single_block(&BlockRequest::new(0)).status,
            BlockResponseCode::ReadBlockSuccess
        );

        // Replace the storage directory with a plain file.
        std::fs::remove_dir_all(&root).unwrap();
        std::fs::write(&root, b"not a directory").unwrap();

        producer.publish(block_batch(1)).unwrap();
        assert_eq!(
            acks.blocking_recv(),
            Some(PublishStreamResponse::EndOfStream {
                status: EndStreamCode::PersistenceFailed,
                block_number: 0,
            })
        );

        assert!(!status.is_running());
        assert_eq!(
            access.single_block(&BlockRequest::new(0)).status,
            BlockResponseCode::ReadBlockNotAvailable
        );
        assert!(matches!(producer.publish(block_batch(2)), Err(ProducerError::NotRunning)));
    }
}
