//! Benchmark for noise generation performance.
//!
//! Run with: cargo bench --package voxel_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxel_procedural::noise::{NoiseField, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = NoiseField::new(WorldSeed::new(42));

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample2(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_million_samples(c: &mut Criterion) {
    let noise = NoiseField::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("million_samples");
    group.throughput(Throughput::Elements(1_000_000));
    group.sample_size(10);

    group.bench_function("1M_noise_samples", |b| {
        b.iter(|| {
            for i in 0..1_000_000 {
                let x = f64::from(i % 1000) * 0.1;
                let y = f64::from(i / 1000) * 0.1;
                black_box(noise.sample2(x, y));
            }
        });
    });

    group.finish();
}

fn benchmark_octaved_noise(c: &mut Criterion) {
    let noise = NoiseField::new(WorldSeed::new(42));

    c.bench_function("octaved_noise_4_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.octaved2(black_box(x), black_box(x * 0.7), 4, 0.5, 2.0))
        });
    });
}

criterion_group!(benches, benchmark_single_sample, benchmark_million_samples, benchmark_octaved_noise);
criterion_main!(benches);
