use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakegen::{
    AtomicIdGenerator, BasicIdGenerator, BitLayout, DEFAULT_EPOCH, GeneratorConfig, IdGenerator,
    IdGeneratorAsyncExt, LockIdGenerator, MonotonicClock, Poll, TimeSource, TokioSleep,
};
use futures::future::try_join_all;
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

// A 16-bit sequence keeps a frozen clock from ever exhausting the sequence
// within one iteration.
fn mock_config() -> GeneratorConfig {
    GeneratorConfig::default()
        .with_layout(BitLayout::new(41, 3, 3, 16))
        .with_machine_id(1)
}

fn mock_time() -> FixedMockTime {
    FixedMockTime {
        millis: DEFAULT_EPOCH + 1,
    }
}

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Ok(Poll::Ready { id }) => {
                            black_box(id);
                        }
                        _ => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks `generate` against a real clock, including the busy-wait when
/// the sequence runs out.
fn bench_generator_spin<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a shared generator across threads.
fn bench_generator_contended<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
) where
    G: IdGenerator + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(generator_fn());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.generate().unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks concurrent async generation on a multi-threaded Tokio runtime.
fn bench_generator_async_tokio<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
) where
    G: IdGenerator + Send + Sync + 'static,
{
    let mut group = c.benchmark_group(group_name);
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();

    for task_count in [1, 8, 64] {
        let ids_per_task = TOTAL_IDS / task_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/tasks/{}", TOTAL_IDS, task_count),
            |b| {
                b.to_async(&rt).iter_custom(|iters| {
                    let generator = Arc::new(generator_fn());
                    async move {
                        let start = Instant::now();

                        for _ in 0..iters {
                            let tasks = (0..task_count).map(|_| {
                                let generator = Arc::clone(&generator);
                                tokio::spawn(async move {
                                    for _ in 0..ids_per_task {
                                        let id = generator.generate_async::<TokioSleep>().await?;
                                        black_box(id);
                                    }
                                    Ok::<(), flakegen::Error>(())
                                })
                            });
                            for result in try_join_all(tasks).await.unwrap() {
                                result.unwrap();
                            }
                        }

                        start.elapsed()
                    }
                });
            },
        );
    }

    group.finish();
}

fn benchmark_mock_sequential_basic(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/basic", || {
        BasicIdGenerator::new(mock_config(), mock_time()).unwrap()
    });
}

fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/lock", || {
        LockIdGenerator::new(mock_config(), mock_time()).unwrap()
    });
}

fn benchmark_mock_sequential_atomic(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/atomic", || {
        AtomicIdGenerator::new(mock_config(), mock_time()).unwrap()
    });
}

fn benchmark_mono_sequential_basic(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_spin(c, "mono/sequential/basic", || {
        BasicIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

fn benchmark_mono_sequential_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_spin(c, "mono/sequential/lock", || {
        LockIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

fn benchmark_mono_sequential_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_spin(c, "mono/sequential/atomic", || {
        AtomicIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

fn benchmark_mono_threaded_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_contended(c, "mono/threaded/lock", || {
        LockIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

fn benchmark_mono_threaded_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_contended(c, "mono/threaded/atomic", || {
        AtomicIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

fn benchmark_mono_tokio_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_async_tokio(c, "mono/tokio/lock", || {
        LockIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

fn benchmark_mono_tokio_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_async_tokio(c, "mono/tokio/atomic", || {
        AtomicIdGenerator::new(GeneratorConfig::default(), clock.clone()).unwrap()
    });
}

criterion_group!(
    benches,
    // Mocked clock
    benchmark_mock_sequential_basic,
    benchmark_mock_sequential_lock,
    benchmark_mock_sequential_atomic,
    // Monotonic clock
    benchmark_mono_sequential_basic,
    benchmark_mono_sequential_lock,
    benchmark_mono_sequential_atomic,
    benchmark_mono_threaded_lock,
    benchmark_mono_threaded_atomic,
    // Async
    benchmark_mono_tokio_lock,
    benchmark_mono_tokio_atomic,
);
criterion_main!(benches);
