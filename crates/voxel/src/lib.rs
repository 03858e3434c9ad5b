//! Process-level wiring for the voxel world engine.
//!
//! This crate owns no voxel algorithms - it is the seam between the
//! headless core (`voxel_core`, `voxel_procedural`, `voxel_mesh`,
//! `voxel_world`, `voxel_bus`) and the external collaborators SPEC_FULL.md
//! §1/§6 name as out of scope: a GPU submission layer, shader programs,
//! and window/input handling. Those are represented here only as trait
//! objects the binary in `src/bin/voxel_server.rs` wires up; this crate
//! never implements them.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

use voxel_core::MiniCoord;
use voxel_mesh::MeshOutput;
use voxel_world::ActionFlags;

/// The narrow interface a real GPU front end implements to consume mesh
/// output (SPEC_FULL.md §6: "exposes `begin_frame`, `draw_mini`, `end_frame`").
///
/// The core never constructs a device, a surface, or a shader module - it
/// only calls these three methods once it has quads to show.
pub trait GpuLayer {
    /// Called once per rendered frame before any `draw_mini` call.
    fn begin_frame(&mut self);

    /// Uploads and draws one mini's worth of geometry.
    fn draw_mini(&mut self, mini: MiniCoord, mesh: &MeshOutput);

    /// Called once per rendered frame after all `draw_mini` calls.
    fn end_frame(&mut self);
}

/// The narrow interface a real window/input front end implements to feed
/// observer control back into the core (SPEC_FULL.md §6: "yields observer
/// action flags and yaw/pitch deltas per frame").
pub trait InputSource {
    /// Reads this frame's look deltas, `(delta_yaw, delta_pitch)` in radians.
    fn look_delta(&mut self) -> (f32, f32);

    /// Reads this frame's movement/action state.
    fn action_flags(&mut self) -> ActionFlags;

    /// Reads this frame's planar movement input, `(forward, strafe)` each
    /// in `-1.0..=1.0`.
    fn move_axes(&mut self) -> (f32, f32);
}

/// A [`GpuLayer`]/[`InputSource`] pair that does nothing, for running the
/// simulation headless (tests, benchmarks, the dedicated server binary a
/// production deployment of this engine would also want).
#[derive(Debug, Default)]
pub struct Headless;

impl GpuLayer for Headless {
    fn begin_frame(&mut self) {}
    fn draw_mini(&mut self, _mini: MiniCoord, _mesh: &MeshOutput) {}
    fn end_frame(&mut self) {}
}

impl InputSource for Headless {
    fn look_delta(&mut self) -> (f32, f32) {
        (0.0, 0.0)
    }

    fn action_flags(&mut self) -> ActionFlags {
        ActionFlags::default()
    }

    fn move_axes(&mut self) -> (f32, f32) {
        (0.0, 0.0)
    }
}
