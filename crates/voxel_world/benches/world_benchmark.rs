//! Benchmark for world read/write and collision throughput.
//!
//! Run with: cargo bench --package voxel_world --bench world_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use voxel_core::{BlockCoord, BlockType, ChunkCoord, WorldConfig};
use voxel_procedural::WorldSeed;
use voxel_world::{HalfExtents, Observer, World};

fn populated_world() -> World {
    let world = World::new(WorldSeed::new(42), &WorldConfig::default());
    world.gen_nearby(ChunkCoord::new(0, 0), 4);
    world
}

fn benchmark_get_type(c: &mut Criterion) {
    let world = populated_world();
    c.bench_function("world_get_type", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(world.get_type(BlockCoord::new(i % 64, 64, i % 64)))
        });
    });
}

fn benchmark_set_type(c: &mut Criterion) {
    let world = populated_world();
    c.bench_function("world_set_type", |b| {
        let mut i = 0i32;
        b.iter(|| {
            i = i.wrapping_add(1);
            world.set_type(BlockCoord::new(i % 64, 64, i % 64), BlockType::Stone);
        });
    });
}

fn benchmark_gen_nearby_radius_4(c: &mut Criterion) {
    c.bench_function("world_gen_nearby_radius_4", |b| {
        b.iter(|| {
            let world = World::new(WorldSeed::new(42), &WorldConfig::default());
            black_box(world.gen_nearby(ChunkCoord::new(0, 0), 4));
        });
    });
}

fn benchmark_collision_resolution(c: &mut Criterion) {
    let world = populated_world();
    for x in 0..16 {
        for z in 0..16 {
            world.set_type(BlockCoord::new(x, 10, z), BlockType::Stone);
        }
    }

    c.bench_function("observer_prevent_collisions", |b| {
        b.iter(|| {
            let mut observer = Observer::new(Vec3::new(8.0, 20.0, 8.0));
            observer.velocity = Vec3::new(1.0, -5.0, 0.5);
            observer.prevent_collisions(black_box(&world), HalfExtents { x: 0.3, y: 0.9, z: 0.3 }, 0.05);
        });
    });
}

criterion_group!(
    benches,
    benchmark_get_type,
    benchmark_set_type,
    benchmark_gen_nearby_radius_4,
    benchmark_collision_resolution
);
criterion_main!(benches);
