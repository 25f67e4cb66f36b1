//! # Block Node Container
//!
//! Builds the ring buffer and wires the configured component variants
//! around it.
//!
//! ```text
//!                        ┌──→ persistence  ──→ acknowledgements()
//! producer() ──→ ring ───┼──→ verification ──→ verification_results()
//!                        └──→ subscribe_live() ──→ LiveStream
//!
//! block_access() ──read──→ BlockReader (same storage as persistence)
//! ```
//!
//! Subscribers are registered before the producer is handed out, so no
//! published batch escapes persistence or verification.

pub mod config;

pub use config::{
    ConfigError, MediatorConfig, NodeConfig, PersistenceConfig, PersistenceType, ProducerConfig,
    ProducerType, VerificationConfig, VerifierType,
};

use crate::adapters::{
    LiveStream, LiveStreamHandler, NoOpStreamProducer, RingBufferProducer, StreamProducer,
};
use anyhow::{anyhow, Context, Result};
use bn_01_persistence::{
    BlockAsFileReader, BlockAsFileWriter, BlockReader, BlockWriter, NoOpBlockReader,
    NoOpBlockWriter, PersistenceHandler,
};
use bn_02_block_access::{BlockAccessApi, BlockAccessService};
use bn_03_signature_verification::{
    SignatureVerifier, SignatureVerifierDummy, VerificationHandler, VerificationResult,
};
use shared_bus::{spawn_subscriber, BlockItemRingBuffer, RingBuffer, SubscriberHandle};
use shared_types::{PublishStreamResponse, ServiceStatus};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Owner of every runtime component of a block node.
pub struct BlockNodeContainer {
    config: NodeConfig,
    ring: Arc<BlockItemRingBuffer>,
    status: Arc<ServiceStatus>,
    producer: Option<Box<dyn StreamProducer>>,
    subscribers: Vec<SubscriberHandle>,
    block_access: Arc<dyn BlockAccessApi>,
    acknowledgements: Option<mpsc::UnboundedReceiver<PublishStreamResponse>>,
    verification_results: Option<mpsc::UnboundedReceiver<VerificationResult>>,
}

impl BlockNodeContainer {
    /// Validate `config` and start every configured subscriber.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an unusable storage root, or a subscriber
    /// thread that could not be spawned.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;

        let mediator = &config.mediator;
        let ring = Arc::new(RingBuffer::new(mediator.ring_buffer_size, mediator.wait_strategy)?);
        let status = Arc::new(ServiceStatus::new(true));
        let mut subscribers = Vec::new();

        let (ack_tx, ack_rx) = mpsc::unbounded_channel();
        let (writer, reader): (Box<dyn BlockWriter>, Arc<dyn BlockReader>) =
            match config.persistence.persistence_type {
                PersistenceType::BlockAsLocalFile => {
                    let root = &config.persistence.live_root_path;
                    let writer = BlockAsFileWriter::new(root).with_context(|| {
                        format!("Cannot use block storage root {}", root.display())
                    })?;
                    (Box::new(writer), Arc::new(BlockAsFileReader::new(root)))
                }
                PersistenceType::NoOp => (Box::new(NoOpBlockWriter::new()), Arc::new(NoOpBlockReader)),
            };
        subscribers.push(spawn_subscriber(
            "persistence",
            &ring,
            mediator.poller_batch_size,
            mediator.wait_strategy,
            PersistenceHandler::new(writer, ack_tx, Arc::clone(&status)),
        )?);

        let verifier: Option<Box<dyn SignatureVerifier>> = match config.verification.verifier_type {
            VerifierType::Production => Some(Box::new(config.verification.production_verifier()?)),
            VerifierType::Dummy => Some(Box::new(SignatureVerifierDummy)),
            VerifierType::NoOp => None,
        };
        let verification_results = match verifier {
            Some(verifier) => {
                let (tx, rx) = mpsc::unbounded_channel();
                subscribers.push(spawn_subscriber(
                    "verification",
                    &ring,
                    mediator.poller_batch_size,
                    mediator.wait_strategy,
                    VerificationHandler::new(verifier, tx),
                )?);
                Some(rx)
            }
            None => None,
        };

        let producer: Box<dyn StreamProducer> = match config.producer.producer_type {
            ProducerType::Production => Box::new(RingBufferProducer::new(
                ring.publisher()?,
                Arc::clone(&status),
            )),
            ProducerType::NoOp => Box::new(NoOpStreamProducer::default()),
        };

        let block_access: Arc<dyn BlockAccessApi> =
            Arc::new(BlockAccessService::new(Arc::clone(&status), reader));

        info!(
            ring_buffer_size = mediator.ring_buffer_size,
            poller_batch_size = mediator.poller_batch_size,
            wait_strategy = %mediator.wait_strategy,
            persistence = %config.persistence.persistence_type,
            producer = %config.producer.producer_type,
            verifier = %config.verification.verifier_type,
            "Block node container started"
        );

        Ok(Self {
            config,
            ring,
            status,
            producer: Some(producer),
            subscribers,
            block_access,
            acknowledgements: Some(ack_rx),
            verification_results,
        })
    }

    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    #[must_use]
    pub fn ring(&self) -> &Arc<BlockItemRingBuffer> {
        &self.ring
    }

    #[must_use]
    pub fn status(&self) -> &Arc<ServiceStatus> {
        &self.status
    }

    /// Hand out the configured producer. There is exactly one.
    ///
    /// # Errors
    ///
    /// If the producer was already taken.
    pub fn producer(&mut self) -> Result<Box<dyn StreamProducer>> {
        self.producer
            .take()
            .ok_or_else(|| anyhow!("Stream producer already taken"))
    }

    /// Attach a new live stream starting at the current cursor.
    ///
    /// # Errors
    ///
    /// If the subscriber thread cannot be spawned.
    pub fn subscribe_live(&self, name: &str) -> Result<LiveStream> {
        let mediator = &self.config.mediator;
        let (tx, rx) = mpsc::channel(mediator.live_stream_capacity);
        let handle = spawn_subscriber(
            format!("live-{name}"),
            &self.ring,
            mediator.poller_batch_size,
            mediator.wait_strategy,
            LiveStreamHandler::new(name, tx),
        )?;
        Ok(LiveStream::new(rx, handle))
    }

    #[must_use]
    pub fn block_access(&self) -> Arc<dyn BlockAccessApi> {
        Arc::clone(&self.block_access)
    }

    /// Acknowledgement stream of the persistence subscriber. Taken once.
    pub fn acknowledgements(&mut self) -> Option<mpsc::UnboundedReceiver<PublishStreamResponse>> {
        self.acknowledgements.take()
    }

    /// Results of the verification subscriber, if one is configured. Taken once.
    pub fn verification_results(&mut self) -> Option<mpsc::UnboundedReceiver<VerificationResult>> {
        self.verification_results.take()
    }

    /// Mark the service as stopped and stop every owned subscriber. Idempotent.
    ///
    /// Live streams are owned by their clients and stop when dropped.
    pub fn shutdown(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        info!(subscribers = self.subscribers.len(), "Shutting down block node");
        self.status.set_running(false);
        for mut handle in self.subscribers.drain(..) {
            handle.stop();
        }
    }
}

impl Drop for BlockNodeContainer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
