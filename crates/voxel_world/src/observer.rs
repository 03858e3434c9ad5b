//! The observer: position, orientation, and AABB-vs-block collision.
//!
//! Physics is deliberately minimal (SPEC_FULL.md §4.5 non-goal: no physics
//! beyond AABB observer-vs-block collision) - no gravity model, no
//! friction curve, just "don't let the observer's box overlap a solid
//! block" applied axis by axis.

use glam::Vec3;

use voxel_core::{BlockCoord, BlockType, ChunkCoord};

use crate::world::World;

/// Action flags an observer can have set in a given tick, mirroring the
/// buttons/keys a player might be holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionFlags {
    /// Requesting to break the block it's staring at.
    pub breaking: bool,
    /// Requesting to place a block against the face it's staring at.
    pub placing: bool,
    /// Requesting an upward impulse (jump).
    pub jumping: bool,
    /// Moving faster than the base speed.
    pub sprinting: bool,
}

/// An observer moving through the world: a camera plus an axis-aligned
/// collision box.
#[derive(Debug, Clone)]
pub struct Observer {
    /// World-space position (box center, at foot height).
    pub position: Vec3,
    /// World-space velocity, in blocks per second.
    pub velocity: Vec3,
    /// Horizontal look angle, in radians.
    pub yaw: f32,
    /// Vertical look angle, in radians.
    pub pitch: f32,
    /// Chunk-radius of world kept resident around this observer.
    pub render_radius: u32,
    /// This tick's requested actions.
    pub flags: ActionFlags,
    /// The block this observer's view ray currently intersects, if any.
    pub staring_at: Option<BlockCoord>,
    /// Whether the observer's box currently overlaps any water block.
    pub in_water: bool,
    /// The chunk this observer was in as of its last `update_chunk` call.
    pub last_chunk: Option<ChunkCoord>,
}

/// Collision box half-extents (width/2, height/2, depth/2), in blocks.
#[derive(Debug, Clone, Copy)]
pub struct HalfExtents {
    /// Half-width along x.
    pub x: f32,
    /// Half-height along y.
    pub y: f32,
    /// Half-depth along z.
    pub z: f32,
}

impl Observer {
    /// Creates a stationary observer at `position`.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            render_radius: 6,
            flags: ActionFlags::default(),
            staring_at: None,
            in_water: false,
            last_chunk: None,
        }
    }

    /// Updates `last_chunk` from the current position, returning the new
    /// chunk coordinate if it changed.
    pub fn update_chunk(&mut self) -> Option<ChunkCoord> {
        let block = self.position.floor().as_ivec3();
        let chunk = ChunkCoord::containing(block);
        if self.last_chunk == Some(chunk) {
            return None;
        }
        self.last_chunk = Some(chunk);
        Some(chunk)
    }

    /// Refreshes `in_water` from the world at the observer's feet.
    pub fn update_in_water(&mut self, world: &World) {
        let block = self.position.floor().as_ivec3();
        self.in_water = world.get_type(block).is_water();
    }

    /// Applies `self.velocity * dt` to `self.position`, clamped so the
    /// observer's box never ends up overlapping a solid block.
    ///
    /// Resolves axes in ascending order of displacement magnitude (the
    /// smallest movement first, so a large displacement on one axis never
    /// masks a small, easily-resolved collision on another), then performs
    /// a final two-axis horizontal pass to push the box out of any corner
    /// overlap the two independent single-axis passes couldn't see.
    pub fn prevent_collisions(&mut self, world: &World, half_extents: HalfExtents, dt: f32) {
        let delta = self.velocity * dt;
        let mut axes = [0usize, 1, 2];
        axes.sort_by(|&a, &b| delta[a].abs().partial_cmp(&delta[b].abs()).unwrap_or(std::cmp::Ordering::Equal));

        for axis in axes {
            self.resolve_single_axis(world, half_extents, axis, delta[axis]);
        }

        self.resolve_horizontal_corner(world, half_extents);
    }

    fn resolve_single_axis(&mut self, world: &World, half_extents: HalfExtents, axis: usize, delta: f32) {
        if delta == 0.0 {
            return;
        }
        let mut position = self.position;
        position[axis] += delta;

        if aabb_intersects_solid(world, position, half_extents) {
            let half = [half_extents.x, half_extents.y, half_extents.z][axis];
            let blocked_coord = if delta > 0.0 { (position[axis] + half).floor() } else { (position[axis] - half).ceil() - 1.0 };
            let snapped = if delta > 0.0 { blocked_coord - half } else { blocked_coord + 1.0 + half };
            self.position[axis] = snapped;
            self.velocity[axis] = 0.0;
        } else {
            self.position[axis] = position[axis];
        }
    }

    fn resolve_horizontal_corner(&mut self, world: &World, half_extents: HalfExtents) {
        if !aabb_intersects_solid(world, self.position, half_extents) {
            return;
        }
        // The box is penetrating after independent single-axis resolution
        // (a diagonal corner case): push out along x, then z, whichever
        // clears it first.
        for axis in [0usize, 2] {
            let mut probe = self.position;
            probe[axis] = probe[axis].round();
            if !aabb_intersects_solid(world, probe, half_extents) {
                self.position = probe;
                self.velocity[axis] = 0.0;
                return;
            }
        }
    }
}

fn aabb_intersects_solid(world: &World, center: Vec3, half_extents: HalfExtents) -> bool {
    let min = center - Vec3::new(half_extents.x, half_extents.y, half_extents.z);
    let max = center + Vec3::new(half_extents.x, half_extents.y, half_extents.z);

    let min_block = min.floor().as_ivec3();
    let max_block = (max - Vec3::splat(1e-4)).floor().as_ivec3();

    for x in min_block.x..=max_block.x {
        for y in min_block.y..=max_block.y {
            for z in min_block.z..=max_block.z {
                if world.get_type(BlockCoord::new(x, y, z)).is_solid() {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxel_core::WorldConfig;
    use voxel_procedural::WorldSeed;

    fn flat_world() -> World {
        let world = World::new(WorldSeed::new(1), &WorldConfig::default());
        world.gen_nearby(ChunkCoord::new(0, 0), 0);
        for x in 0..16 {
            for z in 0..16 {
                world.set_type(BlockCoord::new(x, 10, z), BlockType::Stone);
            }
        }
        world
    }

    fn standard_extents() -> HalfExtents {
        HalfExtents { x: 0.3, y: 0.9, z: 0.3 }
    }

    #[test]
    fn falling_observer_stops_on_floor() {
        let world = flat_world();
        let mut observer = Observer::new(Vec3::new(8.0, 12.0, 8.0));
        observer.velocity = Vec3::new(0.0, -10.0, 0.0);

        for _ in 0..20 {
            observer.prevent_collisions(&world, standard_extents(), 0.05);
        }

        assert_eq!(observer.velocity.y, 0.0);
        assert!(observer.position.y >= 11.0 - 1e-3, "observer should rest above the floor, got y={}", observer.position.y);
    }

    #[test]
    fn chunk_change_is_detected_once() {
        let mut observer = Observer::new(Vec3::new(0.0, 64.0, 0.0));
        assert_eq!(observer.update_chunk(), Some(ChunkCoord::new(0, 0)));
        assert_eq!(observer.update_chunk(), None);
        observer.position = Vec3::new(20.0, 64.0, 0.0);
        assert_eq!(observer.update_chunk(), Some(ChunkCoord::new(1, 0)));
    }

    #[test]
    fn in_water_reflects_current_feet_block() {
        let world = World::new(WorldSeed::new(1), &WorldConfig::default());
        world.gen_nearby(ChunkCoord::new(0, 0), 0);
        world.set_type(BlockCoord::new(5, 64, 5), BlockType::StillWater);
        let mut observer = Observer::new(Vec3::new(5.5, 64.5, 5.5));
        observer.update_in_water(&world);
        assert!(observer.in_water);
    }
}
