//! Headless process entry point for the voxel world engine.
//!
//! Reads `world.toml` (if present), initializes `tracing`, builds the
//! message bus and worker pools, spawns the world actor, and drives the
//! tick loop at the configured rate until interrupted. Never touches a
//! window, an input device, or a GPU device - see [`voxel::GpuLayer`] and
//! [`voxel::InputSource`] for where a real front end attaches.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use voxel_bus::{spawn_chunk_gen_pool, spawn_mesh_gen_pool, WorldActor};
use voxel_core::{ChunkCoord, WorldConfig};
use voxel_procedural::{ChunkGenerator, WorldSeed};
use voxel_world::{Observer, World};

fn main() {
    tracing_subscriber::fmt::init();

    let config = match WorldConfig::load(Path::new("world.toml")) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "failed to parse world.toml, aborting");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "starting voxel server");

    let seed = WorldSeed::new(config.world_seed);
    let world = Arc::new(World::new(seed, &config));
    let generator = Arc::new(ChunkGenerator::new(seed, &config));

    let (chunk_req_tx, chunk_req_rx) = crossbeam_channel::unbounded();
    let (chunk_resp_tx, chunk_resp_rx) = crossbeam_channel::unbounded();
    let (mesh_req_tx, mesh_req_rx) = crossbeam_channel::unbounded();
    let (mesh_resp_tx, mesh_resp_rx) = crossbeam_channel::unbounded();

    let _chunk_gen_workers = spawn_chunk_gen_pool(config.chunk_gen_workers, generator, chunk_req_rx, chunk_resp_tx);
    let _mesh_gen_workers = spawn_mesh_gen_pool(config.mesh_gen_workers, Arc::clone(&world), mesh_req_rx, mesh_resp_tx);

    let mut actor = WorldActor::new(Arc::clone(&world), chunk_req_tx, chunk_resp_rx, mesh_req_tx, mesh_resp_rx);
    let mut observer = Observer::new(glam::Vec3::new(0.0, 96.0, 0.0));

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate_hz.max(1)));
    let render_radius = i32::try_from(config.render_distance).unwrap_or(i32::MAX);

    // Runs until the process receives Ctrl+C (default SIGINT disposition)
    // or a worker-side `BusClosed` takes down a pool thread, per §10.6.
    tracing::info!(hz = config.tick_rate_hz, render_radius, "entering tick loop");
    loop {
        let tick_start = Instant::now();

        if let Some(new_chunk) = observer.update_chunk() {
            tracing::debug!(cx = new_chunk.x, cz = new_chunk.z, "observer crossed into a new chunk");
        }
        let center = ChunkCoord::containing(observer.position.floor().as_ivec3());

        for response in actor.tick(center, render_radius) {
            tracing::trace!(
                cx = response.mini.cx,
                my = response.mini.my,
                cz = response.mini.cz,
                opaque_quads = response.mesh.opaque.len(),
                water_quads = response.mesh.water.len(),
                "mesh ready for upload"
            );
        }

        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            std::thread::sleep(tick_duration - elapsed);
        }
    }
}
