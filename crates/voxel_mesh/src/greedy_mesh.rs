//! Greedy surface-mesh extraction for one mini-chunk.
//!
//! Reduces a mini-chunk's visible faces to a minimal set of merged quads by
//! sweeping each axis in both directions, building a 2D occlusion mask per
//! layer, and greedily extracting maximal same-key rectangles from it.
//! Adapted from this codebase's existing voxel mesher: the six-sweep /
//! build-mask / greedy-extract structure is unchanged, generalized from a
//! single flat chunk to the spec's six-sweep-over-one-mini contract with
//! neighbor-mini occlusion queries and separate opaque/water output lists
//! (SPEC_FULL.md §4.3).

use bytemuck::{Pod, Zeroable};
use voxel_core::{BlockType, Metadata};
use voxel_procedural::{MiniChunk, BLOCKS_PER_MINI};

/// Edge length of a mini-chunk, in blocks.
const MINI_SIZE: usize = 16;

/// A merged quad produced by greedy meshing, ready for GPU instancing.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshQuad {
    /// Quad origin x, relative to the mini's local space.
    pub x: f32,
    /// Quad origin y.
    pub y: f32,
    /// Quad origin z.
    pub z: f32,
    /// Merged width, in blocks, along the sweep's U axis.
    pub width: f32,
    /// Merged height, in blocks, along the sweep's V axis.
    pub height: f32,
    /// Block type backing this quad, as its `repr(u8)` discriminant.
    pub material_id: u32,
    /// Face normal, encoded 0..6 for (+X, -X, +Y, -Y, +Z, -Z).
    pub normal: u32,
    /// Flat per-face light level (SPEC_FULL.md non-goal: no lighting model
    /// beyond this - the value is a function of face normal only).
    pub light_level: u32,
    /// Average liquid-surface height fraction across the merged cells, in
    /// `(0, 1]`. `1.0` for every non-water quad and for water side/bottom
    /// faces, which are always full-height.
    pub water_height: f32,
}

impl MeshQuad {
    /// Normal index for the +X face.
    pub const NORMAL_POS_X: u32 = 0;
    /// Normal index for the -X face.
    pub const NORMAL_NEG_X: u32 = 1;
    /// Normal index for the +Y face.
    pub const NORMAL_POS_Y: u32 = 2;
    /// Normal index for the -Y face.
    pub const NORMAL_NEG_Y: u32 = 3;
    /// Normal index for the +Z face.
    pub const NORMAL_POS_Z: u32 = 4;
    /// Normal index for the -Z face.
    pub const NORMAL_NEG_Z: u32 = 5;
}

/// The opaque and water quads extracted from one mini-chunk.
#[derive(Debug, Clone, Default)]
pub struct MeshOutput {
    /// Quads for solid (non-water) block faces.
    pub opaque: Vec<MeshQuad>,
    /// Quads for water surfaces, kept separate for alpha-blended rendering.
    pub water: Vec<MeshQuad>,
}

/// Borrowed access to a mini-chunk and its six face-adjacent neighbors.
///
/// A missing neighbor (chunk not yet generated/resident) is treated the
/// same way this codebase's existing mesher treats a chunk edge: the face
/// is assumed visible rather than occluded, so a temporarily-absent
/// neighbor never hides real geometry.
pub struct MiniNeighborhood<'a> {
    center: &'a MiniChunk,
    neg_x: Option<&'a MiniChunk>,
    pos_x: Option<&'a MiniChunk>,
    neg_y: Option<&'a MiniChunk>,
    pos_y: Option<&'a MiniChunk>,
    neg_z: Option<&'a MiniChunk>,
    pos_z: Option<&'a MiniChunk>,
}

impl<'a> MiniNeighborhood<'a> {
    /// Builds a neighborhood view. Any neighbor may be `None`.
    #[must_use]
    pub const fn new(
        center: &'a MiniChunk,
        neg_x: Option<&'a MiniChunk>,
        pos_x: Option<&'a MiniChunk>,
        neg_y: Option<&'a MiniChunk>,
        pos_y: Option<&'a MiniChunk>,
        neg_z: Option<&'a MiniChunk>,
        pos_z: Option<&'a MiniChunk>,
    ) -> Self {
        Self { center, neg_x, pos_x, neg_y, pos_y, neg_z, pos_z }
    }

    /// A neighborhood with no neighbors resident - every boundary face is
    /// treated as visible.
    #[must_use]
    pub const fn isolated(center: &'a MiniChunk) -> Self {
        Self::new(center, None, None, None, None, None, None)
    }

    /// Samples the block at local coordinates that may range `-1..=16` on
    /// any axis (one cell past the mini's own bounds, reaching into a
    /// neighbor). Returns `None` if that cell falls in an absent neighbor.
    fn sample(&self, x: i32, y: i32, z: i32) -> Option<(BlockType, Metadata)> {
        let (mini, lx, ly, lz) = if x < 0 {
            (self.neg_x, MINI_SIZE as i32 - 1, y, z)
        } else if x >= MINI_SIZE as i32 {
            (self.pos_x, 0, y, z)
        } else if y < 0 {
            (self.neg_y, x, MINI_SIZE as i32 - 1, z)
        } else if y >= MINI_SIZE as i32 {
            (self.pos_y, x, 0, z)
        } else if z < 0 {
            (self.neg_z, x, y, MINI_SIZE as i32 - 1)
        } else if z >= MINI_SIZE as i32 {
            (self.pos_z, x, y, 0)
        } else {
            (Some(self.center), x, y, z)
        };

        mini.map(|m| (m.block_at(lx as usize, ly as usize, lz as usize), m.metadata_at(lx as usize, ly as usize, lz as usize)))
    }
}

/// Flat per-face light level, a function of face normal only (no sunlight
/// propagation, no per-block tinting - see SPEC_FULL.md §4.3's lighting
/// non-goal).
const fn flat_light(axis: usize, positive: bool) -> u8 {
    match (axis, positive) {
        (1, true) => 15,  // top faces: fully lit
        (1, false) => 4,  // bottom faces: darkest
        _ => 10,          // side faces: in between
    }
}

/// Face mask entry for one cell of a 2D sweep layer.
#[derive(Clone, Copy, PartialEq)]
struct FaceMask {
    block: BlockType,
    light: u8,
    /// Liquid surface height fraction, meaningful only for water top faces.
    water_fraction: f32,
    present: bool,
}

impl FaceMask {
    const EMPTY: Self = Self { block: BlockType::Air, light: 0, water_fraction: 1.0, present: false };

    /// Merge key: cells merge only when this matches exactly. Lighting is
    /// part of the key (SPEC_FULL.md Open Question (a)): two faces with the
    /// same material but different flat light never merge. Water level is
    /// deliberately excluded so adjoining water cells at different levels
    /// still merge into one surface, with `water_fraction` carrying the
    /// average height across the merged run instead.
    fn key(self) -> (BlockType, u8) {
        (self.block, self.light)
    }
}

/// Greedy mesher for a single mini-chunk. Reusable across minis; clears its
/// own scratch buffers on each call.
pub struct GreedyMesher {
    mask: Box<[[FaceMask; MINI_SIZE]; MINI_SIZE]>,
    output: MeshOutput,
}

impl GreedyMesher {
    /// Theoretical worst-case quad count for one mini (every cell its own
    /// quad, three axes).
    const MAX_QUADS: usize = BLOCKS_PER_MINI * 3;

    /// Creates a mesher with pre-allocated scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mask: Box::new([[FaceMask::EMPTY; MINI_SIZE]; MINI_SIZE]),
            output: MeshOutput {
                opaque: Vec::with_capacity(Self::MAX_QUADS / 8),
                water: Vec::with_capacity(Self::MAX_QUADS / 16),
            },
        }
    }

    /// Extracts the opaque and water quads for one mini-chunk's neighborhood.
    ///
    /// The returned [`MeshOutput`] is valid until the next call to `mesh`.
    pub fn mesh(&mut self, neighborhood: &MiniNeighborhood<'_>) -> &MeshOutput {
        let coord = neighborhood.center.coord();
        self.output.opaque.clear();
        self.output.water.clear();

        if neighborhood.center.is_all_air() {
            tracing::trace!(cx = coord.cx, my = coord.my, cz = coord.cz, "mini is all-air, skipping mesh extraction");
            return &self.output;
        }

        self.mesh_axis(neighborhood, 0); // X
        self.mesh_axis(neighborhood, 1); // Y
        self.mesh_axis(neighborhood, 2); // Z

        tracing::trace!(
            cx = coord.cx,
            my = coord.my,
            cz = coord.cz,
            opaque = self.output.opaque.len(),
            water = self.output.water.len(),
            "mini meshed"
        );
        &self.output
    }

    fn mesh_axis(&mut self, neighborhood: &MiniNeighborhood<'_>, axis: usize) {
        let (u_axis, v_axis) = match axis {
            0 => (1, 2),
            1 => (0, 2),
            2 => (0, 1),
            _ => unreachable!("axis is always 0, 1, or 2"),
        };

        for d in 0..MINI_SIZE {
            self.build_mask(neighborhood, axis, d, u_axis, v_axis, true);
            self.greedy_extract(d as f32, axis, true);

            self.build_mask(neighborhood, axis, d, u_axis, v_axis, false);
            self.greedy_extract(d as f32, axis, false);
        }
    }

    fn build_mask(&mut self, neighborhood: &MiniNeighborhood<'_>, axis: usize, d: usize, u_axis: usize, v_axis: usize, positive: bool) {
        for row in self.mask.iter_mut() {
            row.fill(FaceMask::EMPTY);
        }

        for v in 0..MINI_SIZE {
            for u in 0..MINI_SIZE {
                let mut pos = [0i32; 3];
                pos[axis] = d as i32;
                pos[u_axis] = u as i32;
                pos[v_axis] = v as i32;

                let Some((block, meta)) = neighborhood.sample(pos[0], pos[1], pos[2]) else {
                    continue;
                };
                if block == BlockType::Air {
                    continue;
                }

                let mut neighbor_pos = pos;
                neighbor_pos[axis] += if positive { 1 } else { -1 };
                let neighbor = neighborhood.sample(neighbor_pos[0], neighbor_pos[1], neighbor_pos[2]);

                let visible = match neighbor {
                    None => true, // unresolved neighbor: assume visible, never hide real geometry
                    Some((neighbor_block, _)) => {
                        if block.is_water() {
                            neighbor_block == BlockType::Air
                        } else {
                            neighbor_block.is_nonsolid()
                        }
                    }
                };
                if !visible {
                    continue;
                }

                let water_fraction = if block.is_water() && axis == 1 && positive {
                    let level = block.liquid_level(meta).unwrap_or(7);
                    f32::from(level + 1) / 8.0
                } else {
                    1.0
                };

                self.mask[v][u] = FaceMask {
                    block,
                    light: flat_light(axis, positive),
                    water_fraction,
                    present: true,
                };
            }
        }
    }

    fn greedy_extract(&mut self, d: f32, axis: usize, positive: bool) {
        let normal = match (axis, positive) {
            (0, true) => MeshQuad::NORMAL_POS_X,
            (0, false) => MeshQuad::NORMAL_NEG_X,
            (1, true) => MeshQuad::NORMAL_POS_Y,
            (1, false) => MeshQuad::NORMAL_NEG_Y,
            (2, true) => MeshQuad::NORMAL_POS_Z,
            (2, false) => MeshQuad::NORMAL_NEG_Z,
            _ => unreachable!("axis is always 0, 1, or 2"),
        };

        for v in 0..MINI_SIZE {
            let mut u = 0;
            while u < MINI_SIZE {
                let face = self.mask[v][u];
                if !face.present {
                    u += 1;
                    continue;
                }

                let mut width = 1;
                while u + width < MINI_SIZE && self.mask[v][u + width].present && self.mask[v][u + width].key() == face.key() {
                    width += 1;
                }

                let mut height = 1;
                'height: while v + height < MINI_SIZE {
                    for du in 0..width {
                        let cell = self.mask[v + height][u + du];
                        if !cell.present || cell.key() != face.key() {
                            break 'height;
                        }
                    }
                    height += 1;
                }

                let mut fraction_sum = 0.0f32;
                let mut fraction_count = 0u32;
                for dv in 0..height {
                    for du in 0..width {
                        let cell = self.mask[v + dv][u + du];
                        fraction_sum += cell.water_fraction;
                        fraction_count += 1;
                    }
                }
                let water_height = fraction_sum / fraction_count.max(1) as f32;

                let (x, y, z) = Self::compute_position(d, u, v, axis, positive);

                let quad = MeshQuad {
                    x,
                    y,
                    z,
                    width: width as f32,
                    height: height as f32,
                    material_id: face.block as u32,
                    normal,
                    light_level: u32::from(face.light),
                    water_height,
                };

                if face.block.is_water() {
                    self.output.water.push(quad);
                } else {
                    self.output.opaque.push(quad);
                }

                for dv in 0..height {
                    for du in 0..width {
                        self.mask[v + dv][u + du] = FaceMask::EMPTY;
                    }
                }

                u += width;
            }
        }
    }

    fn compute_position(d: f32, u: usize, v: usize, axis: usize, positive: bool) -> (f32, f32, f32) {
        let d_offset = if positive { d + 1.0 } else { d };
        match axis {
            0 => (d_offset, u as f32, v as f32),
            1 => (u as f32, d_offset, v as f32),
            2 => (u as f32, v as f32, d_offset),
            _ => unreachable!("axis is always 0, 1, or 2"),
        }
    }
}

impl Default for GreedyMesher {
    fn default() -> Self {
        Self::new()
    }
}
