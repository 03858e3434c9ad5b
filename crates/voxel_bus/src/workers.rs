//! Chunk-gen and mesh-gen worker pools.
//!
//! Each pool is a fixed number of threads pulling requests off one shared
//! receiver and pushing replies onto one shared sender - `crossbeam_channel`
//! receivers are already MPMC, so no extra dispatch layer is needed.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use voxel_core::VoxelError;
use voxel_procedural::ChunkGenerator;
use voxel_world::World;

use crate::messages::{ChunkGenRequest, ChunkGenResponse, MeshGenRequest, MeshGenResponse};

/// Spawns `count` chunk generation workers.
///
/// Each worker holds its own handle to the (stateless, thread-safe)
/// generator and calls its pure `generate` function - no world lock is
/// ever taken on this path.
#[must_use]
pub fn spawn_chunk_gen_pool(count: usize, generator: Arc<ChunkGenerator>, requests: Receiver<ChunkGenRequest>, responses: Sender<ChunkGenResponse>) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|worker_id| {
            let generator = Arc::clone(&generator);
            let requests = requests.clone();
            let responses = responses.clone();
            std::thread::Builder::new()
                .name(format!("chunk-gen-{worker_id}"))
                .spawn(move || {
                    if let Err(error) = chunk_gen_worker_loop(&generator, &requests, &responses) {
                        tracing::info!(%error, "chunk-gen worker exiting");
                    }
                })
                .expect("failed to spawn chunk-gen worker thread")
        })
        .collect()
}

fn chunk_gen_worker_loop(generator: &ChunkGenerator, requests: &Receiver<ChunkGenRequest>, responses: &Sender<ChunkGenResponse>) -> Result<(), VoxelError> {
    loop {
        let request = requests.recv().map_err(|_| VoxelError::BusClosed)?;
        let chunk = generator.generate(request.coord);
        responses.send(ChunkGenResponse { chunk }).map_err(|_| VoxelError::BusClosed)?;
    }
}

/// Spawns `count` mesh generation workers.
///
/// Each worker owns its own [`voxel_mesh::GreedyMesher`] scratch buffers
/// (not shareable across threads) and reads mini-chunk data from the
/// shared, lock-protected world.
#[must_use]
pub fn spawn_mesh_gen_pool(count: usize, world: Arc<World>, requests: Receiver<MeshGenRequest>, responses: Sender<MeshGenResponse>) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|worker_id| {
            let world = Arc::clone(&world);
            let requests = requests.clone();
            let responses = responses.clone();
            std::thread::Builder::new()
                .name(format!("mesh-gen-{worker_id}"))
                .spawn(move || {
                    if let Err(error) = mesh_gen_worker_loop(&world, &requests, &responses) {
                        tracing::info!(%error, "mesh-gen worker exiting");
                    }
                })
                .expect("failed to spawn mesh-gen worker thread")
        })
        .collect()
}

fn mesh_gen_worker_loop(world: &World, requests: &Receiver<MeshGenRequest>, responses: &Sender<MeshGenResponse>) -> Result<(), VoxelError> {
    let mut mesher = voxel_mesh::GreedyMesher::new();
    loop {
        let request = requests.recv().map_err(|_| VoxelError::BusClosed)?;
        let Some(mesh) = world.mesh_mini(request.mini, &mut mesher) else {
            tracing::trace!(cx = request.mini.cx, my = request.mini.my, cz = request.mini.cz, "mesh request for a mini whose chunk isn't resident, dropping");
            continue;
        };
        responses
            .send(MeshGenResponse { mini: request.mini, generation: request.generation, mesh })
            .map_err(|_| VoxelError::BusClosed)?;
    }
}
