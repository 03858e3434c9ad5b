//! Concurrency glue: typed messages, worker pools, and the world actor
//! that dedups mesh requests and applies worker replies.
//!
//! This crate owns no voxel algorithms itself - it wires [`voxel_world`],
//! [`voxel_procedural`], and [`voxel_mesh`] together into the
//! producer/consumer pipeline described in SPEC_FULL.md §5: one world
//! actor, a chunk-gen worker pool, a mesh-gen worker pool, and a render
//! thread (outside this crate) draining [`actor::WorldActor::tick`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actor;
pub mod messages;
pub mod workers;

pub use actor::WorldActor;
pub use messages::{ChunkGenRequest, ChunkGenResponse, MeshGenRequest, MeshGenResponse, WorldEvent};
pub use workers::{spawn_chunk_gen_pool, spawn_mesh_gen_pool};
