//! # Voxel Mesh
//!
//! Greedy surface-mesh extraction: turns a mini-chunk's blocks into the
//! minimal set of textured quads a renderer needs, separated into opaque
//! and water lists so the render thread can draw water with alpha blending
//! after the opaque pass.
//!
//! This crate has no GPU code of its own - the GPU submission layer and
//! shader programs are external collaborators (SPEC_FULL.md §6) that
//! consume [`greedy_mesh::MeshQuad`] buffers.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod greedy_mesh;

pub use greedy_mesh::{GreedyMesher, MeshOutput, MeshQuad, MiniNeighborhood};
