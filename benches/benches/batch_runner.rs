use batchflow_core::{run_batch, run_batch_isolated, BatchConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

fn bench_run_batch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let processor = |n: u64| async move { Ok::<_, String>(n.wrapping_mul(31)) };
    let items: Vec<u64> = (0..10_000).collect();

    let mut group = c.benchmark_group("run_batch");
    for concurrency in [1, 8, 64] {
        let config = BatchConfig::new(256).with_concurrency(concurrency);
        group.bench_with_input(
            BenchmarkId::from_parameter(concurrency),
            &config,
            |b, config| {
                b.to_async(&rt)
                    .iter(|| run_batch(black_box(items.clone()), &processor, config))
            },
        );
    }
    group.finish();

    c.bench_function("run_batch_isolated", |b| {
        let config = BatchConfig::new(256).with_concurrency(64);
        b.to_async(&rt)
            .iter(|| run_batch_isolated(black_box(items.clone()), &processor, &config))
    });
}

criterion_group!(benches, bench_run_batch);
criterion_main!(benches);
