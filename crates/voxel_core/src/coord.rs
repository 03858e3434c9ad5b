//! Coordinate conventions shared by every crate in the workspace.
//!
//! World-block coordinates are `glam::IVec3` (the external math primitive
//! named in SPEC_FULL.md §6); everything else here is this engine's own
//! convention for deriving chunk/mini-chunk coordinates from them.

use glam::IVec3;

/// Width/depth of a chunk and a mini-chunk, in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Height of a chunk, in blocks (16 stacked mini-chunks).
pub const CHUNK_HEIGHT: i32 = 256;
/// Number of mini-chunks stacked in one chunk.
pub const MINIS_PER_CHUNK: i32 = CHUNK_HEIGHT / CHUNK_WIDTH;

/// World-block coordinate: signed integers, `0 <= y < 256`.
pub type BlockCoord = IVec3;

/// Horizontal chunk coordinate: `(cx, cz) = (floor(x/16), floor(z/16))`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// Chunk index along world x.
    pub x: i32,
    /// Chunk index along world z.
    pub z: i32,
}

impl ChunkCoord {
    /// Builds a chunk coordinate directly.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Derives the chunk coordinate containing a world-block coordinate.
    #[inline]
    #[must_use]
    pub fn containing(block: BlockCoord) -> Self {
        Self {
            x: block.x.div_euclid(CHUNK_WIDTH),
            z: block.z.div_euclid(CHUNK_WIDTH),
        }
    }

    /// World-block x coordinate of this chunk's west edge.
    #[inline]
    #[must_use]
    pub const fn base_x(self) -> i32 {
        self.x * CHUNK_WIDTH
    }

    /// World-block z coordinate of this chunk's north edge.
    #[inline]
    #[must_use]
    pub const fn base_z(self) -> i32 {
        self.z * CHUNK_WIDTH
    }

    /// The four chunks sharing an edge with this one, then the four sharing
    /// only a corner - matches `surrounding_chunks` in the reference
    /// implementation this engine's neighbor re-mesh trigger is modeled on.
    #[must_use]
    pub fn surrounding(self) -> [Self; 8] {
        [
            Self::new(self.x + 1, self.z),
            Self::new(self.x, self.z + 1),
            Self::new(self.x - 1, self.z),
            Self::new(self.x, self.z - 1),
            Self::new(self.x + 1, self.z + 1),
            Self::new(self.x - 1, self.z + 1),
            Self::new(self.x - 1, self.z - 1),
            Self::new(self.x + 1, self.z - 1),
        ]
    }
}

/// Mini-chunk coordinate: `(cx, my, cz)` with `my in {0, 16, ..., 240}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MiniCoord {
    /// Chunk index along world x (same units as `ChunkCoord::x`).
    pub cx: i32,
    /// Mini-chunk base y, a multiple of 16 in `0..256`.
    pub my: i32,
    /// Chunk index along world z (same units as `ChunkCoord::z`).
    pub cz: i32,
}

impl MiniCoord {
    /// Builds a mini-chunk coordinate directly.
    #[inline]
    #[must_use]
    pub const fn new(cx: i32, my: i32, cz: i32) -> Self {
        Self { cx, my, cz }
    }

    /// Derives the mini-chunk coordinate containing a world-block coordinate.
    #[inline]
    #[must_use]
    pub fn containing(block: BlockCoord) -> Self {
        let chunk = ChunkCoord::containing(block);
        Self {
            cx: chunk.x,
            my: block.y.div_euclid(CHUNK_WIDTH) * CHUNK_WIDTH,
            cz: chunk.z,
        }
    }

    /// The enclosing chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::new(self.cx, self.cz)
    }

    /// The index of this mini within its chunk's `minis` array (`0..16`).
    #[inline]
    #[must_use]
    pub const fn index_in_chunk(self) -> usize {
        (self.my / CHUNK_WIDTH) as usize
    }

    /// The mini directly above, if within world bounds.
    #[must_use]
    pub fn above(self) -> Option<Self> {
        (self.my + CHUNK_WIDTH < CHUNK_HEIGHT).then(|| Self::new(self.cx, self.my + CHUNK_WIDTH, self.cz))
    }

    /// The mini directly below, if within world bounds.
    #[must_use]
    pub fn below(self) -> Option<Self> {
        (self.my > 0).then(|| Self::new(self.cx, self.my - CHUNK_WIDTH, self.cz))
    }
}

/// Block-within-mini local coordinates, each in `0..16`, using true
/// mathematical modulo (negative world coordinates still yield `0..16`).
#[inline]
#[must_use]
pub fn local_coord(block: BlockCoord) -> (usize, usize, usize) {
    (
        block.x.rem_euclid(CHUNK_WIDTH) as usize,
        block.y.rem_euclid(CHUNK_WIDTH) as usize,
        block.z.rem_euclid(CHUNK_WIDTH) as usize,
    )
}

/// Linear index of a local `(x, y, z)` (each `0..16`) into a mini's flat
/// 4096-element block array. x varies fastest, then z, then y - matching
/// the "increase x, then z, then y" layout this engine's data model follows.
#[inline]
#[must_use]
pub const fn local_index(x: usize, y: usize, z: usize) -> usize {
    y * CHUNK_WIDTH as usize * CHUNK_WIDTH as usize + z * CHUNK_WIDTH as usize + x
}
