//! Benchmark of the full forward pass per grid layout and execution mode

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rconv_core::{
    BoundedGrid, DynamicGrid, Execution, Grid, Kernel, Pipeline, PipelineConfig,
};
use std::hint::black_box;
use std::time::Duration;

const KERNEL_SIZE: usize = 5;

fn random_grid<G: Grid>(rng: &mut Xoshiro256PlusPlus, size: usize) -> G {
    let values: Vec<f64> = (0..size * size).map(|_| rng.random_range(-1.0..1.0)).collect();
    G::from_values(size, &values).expect("grid fits")
}

fn setup<G: Grid>(size: usize) -> (G, Vec<Kernel<G>>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
    let input = random_grid(&mut rng, size);
    let kernels = (0..3)
        .map(|_| Kernel::new(random_grid(&mut rng, KERNEL_SIZE)).expect("non-empty kernel"))
        .collect();
    (input, kernels)
}

fn bench_layout<G: Grid>(c: &mut Criterion, name: &str) {
    let mut group = c.benchmark_group(format!("forward_{name}"));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(20);

    for size in [64usize, 128, 256] {
        let (input, kernels) = setup::<G>(size);
        for execution in [Execution::Sequential, Execution::Parallel] {
            let pipeline = Pipeline::new(&PipelineConfig {
                execution,
                ..PipelineConfig::default()
            })
            .expect("valid config");
            group.bench_with_input(
                BenchmarkId::new(format!("{execution:?}"), size),
                &size,
                |b, _| b.iter(|| pipeline.forward(black_box(&input), black_box(&kernels))),
            );
        }
    }
    group.finish();
}

fn bench_bounded(c: &mut Criterion) {
    bench_layout::<BoundedGrid>(c, "bounded");
}

fn bench_dynamic(c: &mut Criterion) {
    bench_layout::<DynamicGrid>(c, "dynamic");
}

criterion_group!(benches, bench_bounded, bench_dynamic);
criterion_main!(benches);
