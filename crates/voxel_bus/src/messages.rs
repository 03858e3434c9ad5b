//! Typed messages passed between the world actor and the worker pools.
//!
//! Every message is a plain value - no component shares mutable state with
//! another without going through one of these (SPEC_FULL.md §5).

use voxel_core::{ChunkCoord, MiniCoord};
use voxel_procedural::Chunk;
use voxel_world::RayHit;

/// A request to generate the chunk at `coord`.
#[derive(Debug, Clone, Copy)]
pub struct ChunkGenRequest {
    /// The chunk to generate.
    pub coord: ChunkCoord,
}

/// A chunk-gen worker's reply: the fully generated chunk.
#[derive(Debug, Clone)]
pub struct ChunkGenResponse {
    /// The generated chunk, ready to insert into the world map.
    pub chunk: Chunk,
}

/// A request to (re-)extract the mesh for one mini-chunk.
///
/// `generation` is the world actor's dedup token: a mesh-gen worker echoes
/// it back unchanged, and the actor discards any response whose
/// generation doesn't match the mini's *current* expected generation -
/// the mini was dirtied and re-requested again since this request went
/// out, so the response is stale by the time it arrives.
#[derive(Debug, Clone, Copy)]
pub struct MeshGenRequest {
    /// The mini to mesh.
    pub mini: MiniCoord,
    /// The dedup generation this request was issued for.
    pub generation: u64,
}

/// A mesh-gen worker's reply: the quads extracted for one mini-chunk.
#[derive(Debug, Clone)]
pub struct MeshGenResponse {
    /// The mini this mesh is for.
    pub mini: MiniCoord,
    /// The generation this response answers.
    pub generation: u64,
    /// The extracted opaque/water quads.
    pub mesh: voxel_mesh::MeshOutput,
}

/// Events the world actor emits for interested external listeners (e.g. a
/// render thread that needs to know when its observer crossed into a new
/// chunk, to recompute which chunks it should request).
#[derive(Debug, Clone, Copy)]
pub enum WorldEvent {
    /// The tracked observer moved into a new chunk.
    PlayerMovedChunks {
        /// The chunk the observer is now in.
        new_chunk: ChunkCoord,
    },
    /// A raycast the actor ran on the observer's behalf completed.
    ObserverRaycastResult {
        /// The block hit, if any.
        hit: Option<RayHit>,
    },
}
