//! The world actor: the single task that owns issuing chunk-gen and
//! mesh-gen requests and applying their responses to the world.
//!
//! Only the actor calls `World::insert_chunk` and only the actor reads
//! mesh-gen responses, so there is exactly one writer deciding what's
//! resident and exactly one place a stale response can be detected and
//! dropped (SPEC_FULL.md §5, §7).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use voxel_core::{ChunkCoord, MiniCoord};
use voxel_world::World;

use crate::messages::{ChunkGenRequest, ChunkGenResponse, MeshGenRequest, MeshGenResponse};

/// Drives the chunk-gen and mesh-gen worker pools from one world's dirty
/// state, deduplicating mesh requests by mini coordinate so a mini with an
/// in-flight request is never asked for again until that request resolves
/// (SPEC_FULL.md §5's bus-level dedup).
pub struct WorldActor {
    world: Arc<World>,
    chunk_gen_tx: Sender<ChunkGenRequest>,
    chunk_gen_rx: Receiver<ChunkGenResponse>,
    mesh_gen_tx: Sender<MeshGenRequest>,
    mesh_gen_rx: Receiver<MeshGenResponse>,
    /// The generation a mini was most recently requested at. A response
    /// carrying any other generation is for a request this actor has since
    /// superseded.
    mesh_generations: HashMap<MiniCoord, u64>,
    /// Minis with a mesh-gen request outstanding - never re-requested
    /// until their response (stale or not) is drained.
    pending_mesh: HashSet<MiniCoord>,
    next_generation: u64,
}

impl WorldActor {
    /// Builds an actor around an already-constructed world and the four
    /// channel endpoints connecting it to the worker pools.
    #[must_use]
    pub fn new(world: Arc<World>, chunk_gen_tx: Sender<ChunkGenRequest>, chunk_gen_rx: Receiver<ChunkGenResponse>, mesh_gen_tx: Sender<MeshGenRequest>, mesh_gen_rx: Receiver<MeshGenResponse>) -> Self {
        Self {
            world,
            chunk_gen_tx,
            chunk_gen_rx,
            mesh_gen_tx,
            mesh_gen_rx,
            mesh_generations: HashMap::new(),
            pending_mesh: HashSet::new(),
            next_generation: 0,
        }
    }

    /// The world this actor drives.
    #[must_use]
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Runs one tick: advances the world clock (and with it, liquid
    /// simulation), applies any chunk-gen responses received since the
    /// last tick, requests generation for missing chunks within
    /// `render_radius` of `center`, requests meshes for every mini the
    /// world has marked dirty, and returns the mesh-gen responses that
    /// were fresh enough to apply.
    pub fn tick(&mut self, center: ChunkCoord, render_radius: i32) -> Vec<MeshGenResponse> {
        self.world.update_tick();
        self.drain_chunk_gen_responses();
        self.request_missing_chunks(center, render_radius);
        self.request_dirty_meshes();
        self.drain_mesh_gen_responses()
    }

    fn drain_chunk_gen_responses(&self) {
        while let Ok(response) = self.chunk_gen_rx.try_recv() {
            self.world.insert_chunk(response.chunk);
        }
    }

    fn request_missing_chunks(&self, center: ChunkCoord, radius: i32) {
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if self.world.is_resident(coord) {
                    continue;
                }
                if self.chunk_gen_tx.send(ChunkGenRequest { coord }).is_err() {
                    tracing::error!("chunk-gen request channel closed, dropping request");
                }
            }
        }
    }

    fn request_dirty_meshes(&mut self) {
        for mini in self.world.take_dirty_minis() {
            if self.pending_mesh.contains(&mini) {
                // Already have a request in flight; it'll pick up this
                // dirtying too once it's (re-)issued after the response.
                continue;
            }
            let generation = self.next_generation;
            self.next_generation += 1;
            self.mesh_generations.insert(mini, generation);
            self.pending_mesh.insert(mini);
            if self.mesh_gen_tx.send(MeshGenRequest { mini, generation }).is_err() {
                tracing::error!(cx = mini.cx, my = mini.my, cz = mini.cz, "mesh-gen request channel closed, dropping request");
                self.pending_mesh.remove(&mini);
            }
        }
    }

    fn drain_mesh_gen_responses(&mut self) -> Vec<MeshGenResponse> {
        let mut fresh = Vec::new();
        while let Ok(response) = self.mesh_gen_rx.try_recv() {
            self.pending_mesh.remove(&response.mini);
            let expected = self.mesh_generations.get(&response.mini).copied();
            if expected != Some(response.generation) {
                tracing::trace!(
                    cx = response.mini.cx,
                    my = response.mini.my,
                    cz = response.mini.cz,
                    "stale mesh response, dropping"
                );
                continue;
            }
            // The mini might have been re-dirtied (and thus re-requested)
            // between the request going out and this response arriving;
            // `pending_mesh` no longer marks it in-flight, so the next
            // `request_dirty_meshes` call will pick it up again if so.
            fresh.push(response);
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxel_core::WorldConfig;
    use voxel_procedural::WorldSeed;

    fn actor_with_pools() -> (WorldActor, crossbeam_channel::Receiver<ChunkGenRequest>, crossbeam_channel::Sender<ChunkGenResponse>, crossbeam_channel::Receiver<MeshGenRequest>, crossbeam_channel::Sender<MeshGenResponse>) {
        let world = Arc::new(World::new(WorldSeed::new(1), &WorldConfig::default()));
        let (chunk_req_tx, chunk_req_rx) = crossbeam_channel::unbounded();
        let (chunk_resp_tx, chunk_resp_rx) = crossbeam_channel::unbounded();
        let (mesh_req_tx, mesh_req_rx) = crossbeam_channel::unbounded();
        let (mesh_resp_tx, mesh_resp_rx) = crossbeam_channel::unbounded();
        let actor = WorldActor::new(world, chunk_req_tx, chunk_resp_rx, mesh_req_tx, mesh_resp_rx);
        (actor, chunk_req_rx, chunk_resp_tx, mesh_req_rx, mesh_resp_tx)
    }

    #[test]
    fn tick_requests_every_missing_chunk_in_radius() {
        let (mut actor, chunk_req_rx, _chunk_resp_tx, _mesh_req_rx, _mesh_resp_tx) = actor_with_pools();
        actor.tick(ChunkCoord::new(0, 0), 1);
        assert_eq!(chunk_req_rx.try_iter().count(), 9);
    }

    #[test]
    fn inserted_chunk_is_not_requested_again() {
        let (mut actor, chunk_req_rx, chunk_resp_tx, _mesh_req_rx, _mesh_resp_tx) = actor_with_pools();
        let generator = voxel_procedural::ChunkGenerator::new(WorldSeed::new(1), &WorldConfig::default());
        chunk_resp_tx.send(ChunkGenResponse { chunk: generator.generate(ChunkCoord::new(0, 0)) }).unwrap();

        actor.tick(ChunkCoord::new(0, 0), 0);
        assert_eq!(chunk_req_rx.try_iter().count(), 0);
    }

    #[test]
    fn stale_mesh_response_is_dropped() {
        let (mut actor, _chunk_req_rx, _chunk_resp_tx, mesh_req_rx, mesh_resp_tx) = actor_with_pools();
        actor.world.gen_nearby(ChunkCoord::new(0, 0), 0);
        actor.world.on_mini_update(MiniCoord::new(0, 0, 0));

        let fresh = actor.tick(ChunkCoord::new(0, 0), 0);
        assert!(fresh.is_empty());
        let request = mesh_req_rx.try_recv().expect("a mesh request should have been sent");

        // Respond with a stale (lower) generation than the one just issued.
        mesh_resp_tx
            .send(MeshGenResponse { mini: request.mini, generation: request.generation.wrapping_sub(1), mesh: voxel_mesh::MeshOutput::default() })
            .unwrap();

        let fresh = actor.tick(ChunkCoord::new(0, 0), 0);
        assert!(fresh.is_empty(), "a stale-generation response should never be applied");
    }

    #[test]
    fn matching_generation_mesh_response_is_applied() {
        let (mut actor, _chunk_req_rx, _chunk_resp_tx, mesh_req_rx, mesh_resp_tx) = actor_with_pools();
        actor.world.gen_nearby(ChunkCoord::new(0, 0), 0);
        actor.world.on_mini_update(MiniCoord::new(0, 0, 0));

        actor.tick(ChunkCoord::new(0, 0), 0);
        let request = mesh_req_rx.try_recv().expect("a mesh request should have been sent");
        mesh_resp_tx
            .send(MeshGenResponse { mini: request.mini, generation: request.generation, mesh: voxel_mesh::MeshOutput::default() })
            .unwrap();

        let fresh = actor.tick(ChunkCoord::new(0, 0), 0);
        assert_eq!(fresh.len(), 1);
    }
}
