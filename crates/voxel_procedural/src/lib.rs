//! # Voxel Procedural
//!
//! Deterministic terrain generation for the voxel world.
//!
//! ## Design principles
//!
//! 1. **Deterministic**: the same `(chunk coordinate, seed)` always produces
//!    the same chunk, byte for byte.
//! 2. **Chunked**: the world is generated in fixed 16×256×16 columns, each
//!    sixteen 16×16×16 mini-chunks stacked in y.
//! 3. **Pure generation, optional cache**: [`chunk::ChunkGenerator`] never
//!    touches disk; [`chunk_cache::ChunkCache`] is a strictly optional layer
//!    the world actor may consult in front of it.
//!
//! ## Core components
//!
//! - [`noise::NoiseField`]: seeded coherent-noise streams (wraps the
//!   external `noise` crate).
//! - [`terrain::TerrainSampler`]: height and surface-block selection.
//! - [`chunk::Chunk`] / [`chunk::MiniChunk`]: the generated data model.
//! - [`chunk::ChunkGenerator`]: `(chunk_coord, seed) -> Chunk`.
//! - [`chunk_cache::ChunkCache`]: optional LZ4-compressed disk cache.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod chunk_cache;
pub mod noise;
pub mod terrain;

pub use chunk::{Chunk, ChunkGenerator, MiniChunk, BLOCKS_PER_MINI};
pub use chunk_cache::{CacheError, ChunkCache};
pub use noise::{NoiseField, WorldSeed};
pub use terrain::TerrainSampler;
