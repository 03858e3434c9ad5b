//! Tick-scheduled flowing-liquid simulation.
//!
//! Water is either a source (`StillWater`, always level 7) or a decaying
//! flow (`FlowingWater`, level `0..=7` carried in the low metadata
//! nibble). Every placement or removal near water schedules a
//! `propagate_water` check a fixed number of ticks later; a check that
//! changes a block's level re-schedules its neighbors the same way, so a
//! flood spreads outward one ring per scheduling delay rather than all at
//! once (SPEC_FULL.md §4.4).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use parking_lot::Mutex;

use voxel_core::{BlockCoord, BlockType, Metadata};

use crate::world::{orthogonal_neighbors, World};

/// Ticks between a liquid update being scheduled and it actually running.
pub const SCHEDULE_DELAY_TICKS: u64 = 5;

/// The world runs the liquid simulation at this many ticks per second.
pub const TICKS_PER_SECOND: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledFlow {
    tick: u64,
    block: BlockCoord,
}

impl Ord for ScheduledFlow {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest tick first.
        other.tick.cmp(&self.tick)
    }
}

impl PartialOrd for ScheduledFlow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending liquid re-evaluations, keyed by the tick they're due.
pub struct LiquidQueue {
    heap: Mutex<BinaryHeap<ScheduledFlow>>,
}

impl LiquidQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self { heap: Mutex::new(BinaryHeap::new()) }
    }

    /// Schedules `block` for re-evaluation at `tick`.
    pub fn schedule(&self, tick: u64, block: BlockCoord) {
        self.heap.lock().push(ScheduledFlow { tick, block });
    }

    /// Pops and returns every block due at or before `tick`.
    pub fn drain_due(&self, tick: u64) -> Vec<BlockCoord> {
        let mut heap = self.heap.lock();
        let mut due = Vec::new();
        while matches!(heap.peek(), Some(entry) if entry.tick <= tick) {
            due.push(heap.pop().expect("peek just confirmed an entry").block);
        }
        due
    }
}

impl Default for LiquidQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-evaluates the liquid level at `block` and propagates any change.
///
/// A block directly above `block` that is also water forces this block's
/// level to 7 regardless of the horizontal decay rule - a column standing
/// under any body of water is always full, matching this engine's kept
/// quirk from the reference implementation (SPEC_FULL.md Open Question (b)).
pub fn propagate_water(world: &World, block: BlockCoord, tick: u64) {
    let block_type = world.get_type(block);
    if block_type != BlockType::Air && block_type != BlockType::FlowingWater {
        return; // stale or a source block: neither spreads into nor decays here
    }

    let above = block + BlockCoord::new(0, 1, 0);
    let forced_by_above = world.get_type(above).is_water();

    // `None` unless the cell is already a decaying flow - an Air cell's
    // zero metadata must never be mistaken for an already-settled level 0.
    let current_level = (block_type == BlockType::FlowingWater).then(|| i32::from(world.get_metadata(block).liquid_level()));

    let new_level: i32 = if forced_by_above { 7 } else { best_horizontal_level(world, block).map_or(-1, |l| i32::from(l) - 1) };

    if !(0..=7).contains(&new_level) {
        if current_level.is_some() {
            world.set(block, BlockType::Air, Metadata::ZERO);
        }
        return;
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let new_level = new_level as u8;

    if current_level != Some(i32::from(new_level)) {
        world.set(block, BlockType::FlowingWater, Metadata::liquid(new_level));
    }

    for neighbor in orthogonal_neighbors(block) {
        if world.get_type(neighbor).is_nonsolid() {
            world.schedule_liquid(tick + SCHEDULE_DELAY_TICKS, neighbor);
        }
    }
}

/// The highest liquid level among the four horizontal neighbors whose floor
/// is solid (water only spreads from blocks that have something to sit on),
/// or `None` if no qualifying neighbor is water.
fn best_horizontal_level(world: &World, block: BlockCoord) -> Option<u8> {
    [
        block + BlockCoord::new(1, 0, 0),
        block + BlockCoord::new(-1, 0, 0),
        block + BlockCoord::new(0, 0, 1),
        block + BlockCoord::new(0, 0, -1),
    ]
    .into_iter()
    .filter(|&neighbor| world.get_type(neighbor + BlockCoord::new(0, -1, 0)).is_solid())
    .filter_map(|neighbor| {
        let neighbor_type = world.get_type(neighbor);
        neighbor_type.liquid_level(world.get_metadata(neighbor))
    })
    .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxel_core::{ChunkCoord, WorldConfig};
    use voxel_procedural::WorldSeed;

    fn world_with_chunk() -> World {
        let w = World::new(WorldSeed::new(1), &WorldConfig::default());
        w.gen_nearby(ChunkCoord::new(0, 0), 0);
        w
    }

    #[test]
    fn queue_drains_only_due_entries() {
        let queue = LiquidQueue::new();
        queue.schedule(10, BlockCoord::new(0, 0, 0));
        queue.schedule(20, BlockCoord::new(1, 0, 0));
        assert_eq!(queue.drain_due(15), vec![BlockCoord::new(0, 0, 0)]);
        assert_eq!(queue.drain_due(20), vec![BlockCoord::new(1, 0, 0)]);
    }

    #[test]
    fn still_water_never_decays() {
        let world = world_with_chunk();
        let block = BlockCoord::new(5, 60, 5);
        world.set_type(block, BlockType::StillWater);
        propagate_water(&world, block, 1);
        assert_eq!(world.get_type(block), BlockType::StillWater);
    }

    #[test]
    fn isolated_flowing_water_with_no_source_decays_to_air() {
        let world = world_with_chunk();
        let block = BlockCoord::new(5, 60, 5);
        world.set(block, BlockType::FlowingWater, Metadata::liquid(3));
        propagate_water(&world, block, 1);
        assert_eq!(world.get_type(block), BlockType::Air);
    }

    #[test]
    fn flowing_water_decays_one_level_from_its_strongest_neighbor() {
        let world = world_with_chunk();
        let source = BlockCoord::new(4, 60, 5);
        let target = BlockCoord::new(5, 60, 5);
        world.set_type(source + BlockCoord::new(0, -1, 0), BlockType::Stone);
        world.set_type(target + BlockCoord::new(0, -1, 0), BlockType::Stone);
        world.set_type(source, BlockType::StillWater);
        world.set(target, BlockType::FlowingWater, Metadata::liquid(0));
        propagate_water(&world, target, 1);
        assert_eq!(world.get_metadata(target).liquid_level(), 6);
    }

    #[test]
    fn water_directly_above_forces_level_seven() {
        let world = world_with_chunk();
        let block = BlockCoord::new(5, 60, 5);
        let above = block + BlockCoord::new(0, 1, 0);
        world.set_type(above, BlockType::StillWater);
        world.set(block, BlockType::FlowingWater, Metadata::liquid(1));
        propagate_water(&world, block, 1);
        assert_eq!(world.get_metadata(block).liquid_level(), 7);
    }

    #[test]
    fn air_next_to_floored_source_becomes_flowing_water() {
        let world = world_with_chunk();
        let source = BlockCoord::new(4, 60, 5);
        let target = BlockCoord::new(5, 60, 5);
        world.set_type(source + BlockCoord::new(0, -1, 0), BlockType::Stone);
        world.set_type(target + BlockCoord::new(0, -1, 0), BlockType::Stone);
        world.set_type(source, BlockType::StillWater);
        propagate_water(&world, target, 1);
        assert_eq!(world.get_type(target), BlockType::FlowingWater);
        assert_eq!(world.get_metadata(target).liquid_level(), 6);
    }

    #[test]
    fn neighbor_without_a_floor_is_not_counted() {
        let world = world_with_chunk();
        let source = BlockCoord::new(4, 60, 5);
        let target = BlockCoord::new(5, 60, 5);
        // No floor placed under either cell: the source's level must not
        // spread into `target`, which stays Air.
        world.set_type(source, BlockType::StillWater);
        propagate_water(&world, target, 1);
        assert_eq!(world.get_type(target), BlockType::Air);
    }

    #[test]
    fn flowing_water_with_only_a_level_zero_neighbor_destroys_to_air() {
        let world = world_with_chunk();
        let source = BlockCoord::new(4, 60, 5);
        let target = BlockCoord::new(5, 60, 5);
        world.set_type(source + BlockCoord::new(0, -1, 0), BlockType::Stone);
        world.set_type(target + BlockCoord::new(0, -1, 0), BlockType::Stone);
        world.set(source, BlockType::FlowingWater, Metadata::liquid(0));
        world.set(target, BlockType::FlowingWater, Metadata::liquid(3));
        propagate_water(&world, target, 1);
        assert_eq!(world.get_type(target), BlockType::Air);
    }
}
