//! # Voxel Core
//!
//! Shared value types, coordinate conventions, the error vocabulary, and
//! startup configuration used by every other crate in this workspace.
//!
//! This crate has no rendering, no networking, and no generation logic of
//! its own - it exists so those concerns share one definition of a block,
//! one definition of a coordinate, and one error type.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod config;
pub mod coord;
pub mod error;

pub use block::{BlockType, Metadata};
pub use config::WorldConfig;
pub use coord::{BlockCoord, ChunkCoord, MiniCoord, CHUNK_HEIGHT, CHUNK_WIDTH, MINIS_PER_CHUNK};
pub use error::{VoxelError, VoxelResult};
