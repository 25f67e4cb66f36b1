//! # Ring Buffer Benchmarks
//!
//! - Uncontended append with no subscribers
//! - Append + poll on one thread (copy cost of a drain)
//! - End-to-end throughput to N subscriber threads at varying poll batch sizes

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_bus::{spawn_subscriber, BlockItemRingBuffer, PollResult, Poller, RingBuffer, WaitStrategy};
use shared_types::test_utils::block_batch;
use shared_types::BlockItemBatch;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const RING_SIZE: usize = 1024;
const BATCHES_PER_ITER: u64 = 4096;

fn ring(wait_strategy: WaitStrategy) -> Arc<BlockItemRingBuffer> {
    Arc::new(RingBuffer::new(RING_SIZE, wait_strategy).unwrap())
}

pub fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring-buffer-append");
    group.throughput(Throughput::Elements(1));

    let ring = ring(WaitStrategy::BusySpin);
    let mut publisher = ring.publisher().unwrap();
    let batch = block_batch(0);

    group.bench_function("append_no_subscribers", |b| {
        b.iter(|| black_box(publisher.append(batch.clone())))
    });

    group.finish();
}

pub fn bench_append_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring-buffer-append-poll");

    for batch_size in [1usize, 16, 128] {
        let ring = ring(WaitStrategy::BusySpin);
        let mut publisher = ring.publisher().unwrap();
        let mut poller = Poller::new(Arc::clone(&ring), batch_size).unwrap();
        let batch = block_batch(0);

        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::new("poll_batch", batch_size), &batch_size, |b, &n| {
            b.iter(|| {
                for _ in 0..n {
                    publisher.append(batch.clone());
                }
                let mut drained = 0;
                while let Ok(PollResult::Data(item)) = poller.poll() {
                    black_box(item);
                    drained += 1;
                }
                assert_eq!(drained, n);
            })
        });
    }

    group.finish();
}

pub fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring-buffer-fan-out");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);
    group.throughput(Throughput::Elements(BATCHES_PER_ITER));

    for subscribers in [1usize, 2, 4] {
        for batch_size in [1usize, 32] {
            let ring = ring(WaitStrategy::Yielding);
            let mut publisher = ring.publisher().unwrap();
            let counters: Vec<Arc<AtomicU64>> =
                (0..subscribers).map(|_| Arc::new(AtomicU64::new(0))).collect();
            let _handles: Vec<_> = counters
                .iter()
                .enumerate()
                .map(|(i, counter)| {
                    let counter = Arc::clone(counter);
                    spawn_subscriber(
                        format!("bench-{i}"),
                        &ring,
                        batch_size,
                        WaitStrategy::Yielding,
                        move |batch: &BlockItemBatch| {
                            black_box(batch.len());
                            counter.fetch_add(1, Ordering::Relaxed);
                        },
                    )
                    .unwrap()
                })
                .collect();
            let batch = block_batch(0);

            let id = BenchmarkId::new(format!("subscribers_{subscribers}"), batch_size);
            group.bench_with_input(id, &batch_size, |b, _| {
                b.iter(|| {
                    let target = counters[0].load(Ordering::Relaxed) + BATCHES_PER_ITER;
                    for _ in 0..BATCHES_PER_ITER {
                        publisher.append(batch.clone());
                    }
                    for counter in &counters {
                        while counter.load(Ordering::Relaxed) < target {
                            std::hint::spin_loop();
                        }
                    }
                })
            });
        }
    }

    group.finish();
}
