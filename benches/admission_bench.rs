//! Benchmarks for per-tag admission.
//!
//! Benchmarks cover:
//! - Uncontended calls admitted immediately
//! - Saturated queues handing slots to FIFO waiters
//! - Registry lookups across many tags

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::convert::Infallible;
use std::hint::black_box;

use prometheus_tag_queue::{ConcurrencySetting, Engine, QueueTag, WrapOptions};
use tokio::runtime::Runtime;

async fn noop(n: u64) -> Result<u64, Infallible> {
    Ok(n)
}

async fn yielding(n: u64) -> Result<u64, Infallible> {
    tokio::task::yield_now().await;
    Ok(n)
}

// ============================================================================
// Immediate admission
// ============================================================================

fn bench_immediate_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("immediate_admission");

    for calls in [1u64, 10, 100] {
        group.throughput(Throughput::Elements(calls));
        group.bench_with_input(BenchmarkId::from_parameter(calls), &calls, |b, &calls| {
            let engine = Engine::with_default_limit(1).unwrap();
            let wrapped = engine.wrap(noop, WrapOptions::new()).unwrap();
            b.to_async(Runtime::new().unwrap()).iter(|| {
                let wrapped = wrapped.clone();
                async move {
                    for n in 0..calls {
                        black_box(wrapped.call(n).await.unwrap());
                    }
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Queued handoff
// ============================================================================

fn bench_queued_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("queued_handoff");

    for (limit, calls) in [(1usize, 100u64), (4, 100), (16, 1000)] {
        group.throughput(Throughput::Elements(calls));
        group.bench_with_input(
            BenchmarkId::new(format!("limit_{limit}"), calls),
            &calls,
            |b, &calls| {
                let engine = Engine::with_concurrency(&[ConcurrencySetting::new(limit)]).unwrap();
                let wrapped = engine.wrap(yielding, WrapOptions::new()).unwrap();
                b.to_async(Runtime::new().unwrap()).iter(|| {
                    let wrapped = wrapped.clone();
                    async move {
                        let pending: Vec<_> = (0..calls).map(|n| wrapped.call(n)).collect();
                        black_box(futures::future::join_all(pending).await);
                    }
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Registry lookups
// ============================================================================

fn bench_wrap_many_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap_many_tags");

    for tags in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(tags as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tags), &tags, |b, &tags| {
            let names: Vec<QueueTag> = (0..tags).map(|i| QueueTag::name(format!("tag-{i}"))).collect();
            let engine = Engine::new();
            b.iter(|| {
                for tag in &names {
                    black_box(engine.wrap(noop, WrapOptions::new().tag(tag.clone())).unwrap());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_immediate_admission,
    bench_queued_handoff,
    bench_wrap_many_tags
);
criterion_main!(benches);
