//! Chunk/mini-chunk storage and the deterministic chunk generator.
//!
//! Grounded on this codebase's existing chunk storage shape (a flat,
//! bounds-checked block array plus a parallel metadata array and a dirty
//! flag), generalized from a single 16×256×16 array to the spec's stack of
//! sixteen 16×16×16 mini-chunks (SPEC_FULL.md §3).

use voxel_core::coord::{local_coord, local_index};
use voxel_core::{BlockCoord, BlockType, ChunkCoord, Metadata, MiniCoord, WorldConfig, VoxelError, VoxelResult, CHUNK_WIDTH, MINIS_PER_CHUNK};

use crate::noise::WorldSeed;
use crate::terrain::TerrainSampler;

/// Total blocks in one mini-chunk (16×16×16).
pub const BLOCKS_PER_MINI: usize = (CHUNK_WIDTH * CHUNK_WIDTH * CHUNK_WIDTH) as usize;

/// A 16×16×16 sub-cube of a chunk - the mesh extraction and rendering unit.
///
/// Invariant: both arrays have exactly [`BLOCKS_PER_MINI`] (4096) entries.
#[derive(Debug, Clone)]
pub struct MiniChunk {
    coord: MiniCoord,
    blocks: Box<[BlockType]>,
    metadata: Box<[Metadata]>,
    dirty: bool,
}

impl MiniChunk {
    /// Creates an all-Air mini-chunk at the given mini-coordinate.
    #[must_use]
    pub fn empty(coord: MiniCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockType::Air; BLOCKS_PER_MINI].into_boxed_slice(),
            metadata: vec![Metadata::ZERO; BLOCKS_PER_MINI].into_boxed_slice(),
            dirty: true,
        }
    }

    /// This mini's coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> MiniCoord {
        self.coord
    }

    /// Block type at local coordinates (each `0..16`).
    ///
    /// # Panics
    /// Panics if any coordinate is out of `0..16` (a caller bug).
    #[inline]
    #[must_use]
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.blocks[local_index(x, y, z)]
    }

    /// Metadata at local coordinates (each `0..16`).
    #[inline]
    #[must_use]
    pub fn metadata_at(&self, x: usize, y: usize, z: usize) -> Metadata {
        self.metadata[local_index(x, y, z)]
    }

    /// Sets the block type at local coordinates and marks the mini dirty.
    #[inline]
    pub fn set_block_at(&mut self, x: usize, y: usize, z: usize, block: BlockType) {
        self.blocks[local_index(x, y, z)] = block;
        self.dirty = true;
    }

    /// Sets metadata at local coordinates and marks the mini dirty.
    #[inline]
    pub fn set_metadata_at(&mut self, x: usize, y: usize, z: usize, meta: Metadata) {
        self.metadata[local_index(x, y, z)] = meta;
        self.dirty = true;
    }

    /// Block type at a world-block coordinate known to fall inside this mini.
    #[must_use]
    pub fn block_at_world(&self, block: BlockCoord) -> BlockType {
        let (x, y, z) = local_coord(block);
        self.block_at(x, y, z)
    }

    /// Metadata at a world-block coordinate known to fall inside this mini.
    #[must_use]
    pub fn metadata_at_world(&self, block: BlockCoord) -> Metadata {
        let (x, y, z) = local_coord(block);
        self.metadata_at(x, y, z)
    }

    /// Sets a block type and metadata at a world-block coordinate known to
    /// fall inside this mini.
    pub fn set_at_world(&mut self, block: BlockCoord, block_type: BlockType, meta: Metadata) {
        let (x, y, z) = local_coord(block);
        self.set_block_at(x, y, z, block_type);
        self.set_metadata_at(x, y, z, meta);
    }

    /// Whether this mini's mesh is stale relative to its current contents
    /// (or its neighbors', per the world actor's re-mesh trigger).
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks this mini's mesh dirty (e.g. because a neighbor changed).
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag once a fresh mesh has been produced.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// `true` if every block in this mini is Air.
    #[must_use]
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| *b == BlockType::Air)
    }
}

/// A 16×256×16 column of blocks: the residency unit and world-map key's
/// value. Owns exactly [`MINIS_PER_CHUNK`] mini-chunks stacked along y.
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    minis: Vec<MiniChunk>,
}

impl Chunk {
    /// Creates an all-Air chunk at the given chunk coordinate.
    #[must_use]
    pub fn empty(coord: ChunkCoord) -> Self {
        let minis = (0..MINIS_PER_CHUNK)
            .map(|i| MiniChunk::empty(MiniCoord::new(coord.x, i * CHUNK_WIDTH, coord.z)))
            .collect();
        Self { coord, minis }
    }

    /// This chunk's coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// All sixteen minis, bottom to top.
    #[inline]
    #[must_use]
    pub fn minis(&self) -> &[MiniChunk] {
        &self.minis
    }

    /// The mini at stack index `0..16`.
    #[inline]
    #[must_use]
    pub fn mini(&self, index: usize) -> &MiniChunk {
        &self.minis[index]
    }

    /// Mutable access to the mini at stack index `0..16`.
    #[inline]
    pub fn mini_mut(&mut self, index: usize) -> &mut MiniChunk {
        &mut self.minis[index]
    }

    /// The mini containing a given world-block y (`0..256`).
    #[must_use]
    pub fn mini_at_y(&self, y: i32) -> &MiniChunk {
        &self.minis[(y.div_euclid(CHUNK_WIDTH)) as usize]
    }

    /// Mutable access to the mini containing a given world-block y.
    pub fn mini_at_y_mut(&mut self, y: i32) -> &mut MiniChunk {
        let index = (y.div_euclid(CHUNK_WIDTH)) as usize;
        &mut self.minis[index]
    }

    /// Reads the block type at a world-block coordinate inside this chunk.
    #[must_use]
    pub fn get_type(&self, block: BlockCoord) -> BlockType {
        self.mini_at_y(block.y).block_at_world(block)
    }

    /// Reads the metadata at a world-block coordinate inside this chunk.
    #[must_use]
    pub fn get_metadata(&self, block: BlockCoord) -> Metadata {
        self.mini_at_y(block.y).metadata_at_world(block)
    }

    /// Writes a block type and metadata at a world-block coordinate inside
    /// this chunk.
    pub fn set(&mut self, block: BlockCoord, block_type: BlockType, meta: Metadata) {
        self.mini_at_y_mut(block.y).set_at_world(block, block_type, meta);
    }

    /// Validates the §3 data-model invariants: exactly [`MINIS_PER_CHUNK`]
    /// minis, each at the expected stacked coordinate.
    ///
    /// # Errors
    /// Returns [`VoxelError::InvariantViolation`] describing the mismatch.
    pub fn check_invariants(&self) -> VoxelResult<()> {
        if self.minis.len() != MINIS_PER_CHUNK as usize {
            return Err(VoxelError::InvariantViolation(format!(
                "chunk {},{} has {} minis, expected {MINIS_PER_CHUNK}",
                self.coord.x,
                self.coord.z,
                self.minis.len()
            )));
        }
        for (i, mini) in self.minis.iter().enumerate() {
            let expected = MiniCoord::new(self.coord.x, i as i32 * CHUNK_WIDTH, self.coord.z);
            if mini.coord() != expected {
                return Err(VoxelError::InvariantViolation(format!(
                    "chunk {},{} mini {i} has coord {:?}, expected {expected:?}",
                    self.coord.x,
                    self.coord.z,
                    mini.coord()
                )));
            }
        }
        Ok(())
    }
}

/// Deterministic, pure chunk generator: `(chunk_coord, seed) -> Chunk`.
pub struct ChunkGenerator {
    sampler: TerrainSampler,
    sea_level: i32,
}

impl ChunkGenerator {
    /// Builds a generator for one world seed and configuration.
    #[must_use]
    pub fn new(seed: WorldSeed, config: &WorldConfig) -> Self {
        Self {
            sampler: TerrainSampler::new(seed, config),
            sea_level: config.sea_level,
        }
    }

    /// Generates the full chunk at `coord`.
    ///
    /// Pure and deterministic: the same `(coord, seed)` byte-for-byte
    /// reproduces the same chunk, across runs and platforms
    /// (SPEC_FULL.md §4.1, §8 invariant 1).
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::empty(coord);

        for lx in 0..CHUNK_WIDTH {
            for lz in 0..CHUNK_WIDTH {
                let wx = coord.base_x() + lx;
                let wz = coord.base_z() + lz;
                self.fill_column(&mut chunk, wx, wz, lx, lz);
            }
        }

        chunk
    }

    fn fill_column(&self, chunk: &mut Chunk, wx: i32, wz: i32, lx: i32, lz: i32) {
        let height = self.sampler.height_at(wx, wz);
        let surface_block = if self.sampler.is_shoreline(height) {
            BlockType::Sand
        } else {
            BlockType::Grass
        };
        let decorate = self.sampler.has_decoration(wx, wz) && surface_block == BlockType::Grass;

        for wy in 0..256 {
            let block = if wy < height - crate::terrain::dirt_depth() {
                BlockType::Stone
            } else if wy < height {
                BlockType::Dirt
            } else if wy == height {
                surface_block
            } else if wy <= self.sea_level {
                BlockType::StillWater
            } else if wy == height + 1 && decorate {
                // Single-block decoration: reuses Stone as a stand-in "bush"
                // marker so this generator stays a closed enumeration over
                // BlockType without inventing a new variant for a cosmetic.
                BlockType::Stone
            } else {
                BlockType::Air
            };

            if block == BlockType::Air {
                continue; // chunk starts all-Air; skip the redundant write
            }

            let (x, y, z) = (lx as usize, wy as usize, lz as usize);
            chunk.mini_at_y_mut(wy).set_block_at(x, y, z, block);
        }
    }
}
