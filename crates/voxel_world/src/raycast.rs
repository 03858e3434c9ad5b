//! Block raycasting via the Amanatides-Woo DDA algorithm.
//!
//! Walks a ray through the block grid one cell at a time, always stepping
//! into whichever of the three axes reaches its next grid line soonest, so
//! no block the ray passes through is ever skipped.

use glam::Vec3;

use voxel_core::{BlockCoord, BlockType};

use crate::world::World;

/// A solid block hit by a raycast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayHit {
    /// The block the ray stopped at.
    pub block: BlockCoord,
    /// The face the ray entered through, as an axis and sign
    /// (`(0, 1)` = entered through -X face i.e. hit the +X... see
    /// [`RayHit::face_normal`] for the outward normal this implies).
    pub face_axis: usize,
    /// `true` if the ray was travelling in the negative direction on
    /// `face_axis` when it entered the block.
    pub face_negative: bool,
}

impl RayHit {
    /// The outward-facing normal of the face the ray entered through.
    #[must_use]
    pub fn face_normal(self) -> BlockCoord {
        let mut normal = BlockCoord::ZERO;
        normal[self.face_axis] = if self.face_negative { 1 } else { -1 };
        normal
    }
}

/// Walks a ray from `origin` in `direction` (need not be normalized, but
/// must be non-zero) up to `max_distance` blocks, returning the first
/// solid block it enters, if any.
#[must_use]
pub fn cast_ray(world: &World, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }

    let mut block = origin.floor().as_ivec3();

    let step = [signum_i32(direction.x), signum_i32(direction.y), signum_i32(direction.z)];

    let t_delta = [safe_div(1.0, direction.x.abs()), safe_div(1.0, direction.y.abs()), safe_div(1.0, direction.z.abs())];

    let mut t_max = [0usize, 1, 2].map(|axis| {
        let dir = direction[axis];
        if dir > 0.0 {
            (block[axis] as f32 + 1.0 - origin[axis]) / dir
        } else if dir < 0.0 {
            (origin[axis] - block[axis] as f32) / -dir
        } else {
            f32::INFINITY
        }
    });

    let mut last_axis = 0usize;
    let mut last_negative = false;
    let mut traveled = 0.0f32;

    while traveled <= max_distance {
        if world.get_type(block).is_solid() {
            return Some(RayHit { block, face_axis: last_axis, face_negative: last_negative });
        }

        let axis = if t_max[0] < t_max[1] { if t_max[0] < t_max[2] { 0 } else { 2 } } else if t_max[1] < t_max[2] { 1 } else { 2 };

        traveled = t_max[axis];
        block[axis] += step[axis];
        t_max[axis] += t_delta[axis];
        last_axis = axis;
        last_negative = step[axis] < 0;
    }

    None
}

fn signum_i32(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn safe_div(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        f32::INFINITY
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxel_core::{ChunkCoord, WorldConfig};
    use voxel_procedural::WorldSeed;

    fn world_with_wall() -> World {
        let world = World::new(WorldSeed::new(1), &WorldConfig::default());
        world.gen_nearby(ChunkCoord::new(0, 0), 0);
        world.set_type(BlockCoord::new(5, 64, 0), BlockType::Stone);
        world
    }

    #[test]
    fn ray_hits_block_directly_ahead() {
        let world = world_with_wall();
        let hit = cast_ray(&world, Vec3::new(0.5, 64.5, 0.5), Vec3::new(1.0, 0.0, 0.0), 20.0);
        assert_eq!(hit.map(|h| h.block), Some(BlockCoord::new(5, 64, 0)));
    }

    #[test]
    fn ray_misses_when_distance_too_short() {
        let world = world_with_wall();
        let hit = cast_ray(&world, Vec3::new(0.5, 64.5, 0.5), Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_through_empty_world_never_hits() {
        let world = World::new(WorldSeed::new(1), &WorldConfig::default());
        world.gen_nearby(ChunkCoord::new(0, 0), 0);
        let hit = cast_ray(&world, Vec3::new(0.5, 64.5, 0.5), Vec3::new(0.0, 1.0, 0.0), 100.0);
        assert!(hit.is_none());
    }

    #[test]
    fn zero_direction_returns_none() {
        let world = world_with_wall();
        assert!(cast_ray(&world, Vec3::ZERO, Vec3::ZERO, 10.0).is_none());
    }
}
