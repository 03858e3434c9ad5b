//! # Voxel World
//!
//! The resident world map, the tick-scheduled liquid simulator, and the
//! observer's collision/raycast physics. This crate is the single place
//! that owns mutable world state - generation (`voxel_procedural`) and
//! meshing (`voxel_mesh`) are pure functions this crate calls.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod liquid;
pub mod observer;
pub mod raycast;
pub mod world;

pub use liquid::{propagate_water, LiquidQueue, SCHEDULE_DELAY_TICKS, TICKS_PER_SECOND};
pub use observer::{ActionFlags, HalfExtents, Observer};
pub use raycast::{cast_ray, RayHit};
pub use world::{orthogonal_neighbors, SharedChunk, World};
