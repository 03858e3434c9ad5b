//! Benchmark for greedy mesh extraction performance.
//!
//! Run with: cargo bench --package voxel_mesh --bench mesh_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxel_core::{BlockType, MiniCoord};
use voxel_mesh::{GreedyMesher, MiniNeighborhood};
use voxel_procedural::MiniChunk;

fn solid_mini() -> MiniChunk {
    let mut mini = MiniChunk::empty(MiniCoord::new(0, 0, 0));
    for x in 0..16 {
        for y in 0..16 {
            for z in 0..16 {
                if (x + y + z) % 2 == 0 {
                    mini.set_block_at(x, y, z, BlockType::Stone);
                }
            }
        }
    }
    mini
}

fn benchmark_checkerboard_mini(c: &mut Criterion) {
    let mini = solid_mini();
    let mut mesher = GreedyMesher::new();

    c.bench_function("mesh_checkerboard_mini", |b| {
        b.iter(|| {
            let neighborhood = MiniNeighborhood::isolated(black_box(&mini));
            black_box(mesher.mesh(&neighborhood));
        });
    });
}

fn benchmark_solid_slab_mini(c: &mut Criterion) {
    let mut mini = MiniChunk::empty(MiniCoord::new(0, 0, 0));
    for x in 0..16 {
        for z in 0..16 {
            mini.set_block_at(x, 0, z, BlockType::Stone);
        }
    }
    let mut mesher = GreedyMesher::new();

    c.bench_function("mesh_flat_slab_mini", |b| {
        b.iter(|| {
            let neighborhood = MiniNeighborhood::isolated(black_box(&mini));
            black_box(mesher.mesh(&neighborhood));
        });
    });
}

criterion_group!(benches, benchmark_checkerboard_mini, benchmark_solid_slab_mini);
criterion_main!(benches);
