//! Optional on-disk chunk cache (SPEC_FULL.md §10.5).
//!
//! Layered strictly outside [`crate::chunk::ChunkGenerator`]'s pure contract:
//! the world actor consults the cache before calling `generate()` and writes
//! to it afterward, but `generate()` itself never knows the cache exists.
//! Chunks are serialized as a flat, bytemuck-compatible block/metadata byte
//! array and LZ4-compressed, mirroring this codebase's existing
//! compress-on-save / decompress-on-load pattern.

use std::io;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};

use voxel_core::coord::local_index;
use voxel_core::{BlockType, ChunkCoord, Metadata, MINIS_PER_CHUNK};

use crate::chunk::{Chunk, MiniChunk, BLOCKS_PER_MINI};

/// Plain-old-data mirror of one stored block: type id plus raw metadata
/// byte. `Pod`/`Zeroable` let the whole mini's array be reinterpreted as
/// bytes for compression without a per-block copy loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct StoredBlock {
    block_id: u8,
    meta: u8,
}

/// Errors from reading or writing the chunk cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Underlying filesystem operation failed.
    #[error("chunk cache I/O error: {0}")]
    Io(#[from] io::Error),
    /// Stored bytes didn't decompress to a whole number of blocks.
    #[error("corrupt chunk cache entry for chunk ({0}, {1})")]
    Corrupt(i32, i32),
    /// Stored block id has no corresponding [`BlockType`] variant.
    #[error("chunk cache entry for chunk ({0}, {1}) has unknown block id {2}")]
    UnknownBlockId(i32, i32, u8),
}

/// LZ4-backed cache of generated chunks, keyed by chunk coordinate.
pub struct ChunkCache {
    root: PathBuf,
}

impl ChunkCache {
    /// Opens (without creating) a cache rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, coord: ChunkCoord) -> PathBuf {
        self.root.join(format!("{}.{}.chunk.lz4", coord.x, coord.z))
    }

    /// Loads a previously cached chunk, if present on disk.
    ///
    /// # Errors
    /// Returns [`CacheError`] if the file exists but can't be read, or its
    /// contents are corrupt or reference an unknown block id.
    pub fn load(&self, coord: ChunkCoord) -> Result<Option<Chunk>, CacheError> {
        let path = self.path_for(coord);
        let compressed = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let raw = lz4_flex::block::decompress_size_prepended(&compressed)
            .map_err(|_| CacheError::Corrupt(coord.x, coord.z))?;
        Ok(Some(decode_chunk(coord, &raw)?))
    }

    /// Writes a chunk to the cache, overwriting any existing entry.
    ///
    /// # Errors
    /// Returns [`CacheError`] if the directory can't be created or the file
    /// can't be written.
    pub fn store(&self, chunk: &Chunk) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root)?;
        let raw = encode_chunk(chunk);
        let compressed = lz4_flex::block::compress_prepend_size(&raw);
        std::fs::write(self.path_for(chunk.coord()), compressed)?;
        Ok(())
    }

    /// Root directory this cache reads from and writes to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn encode_chunk(chunk: &Chunk) -> Vec<u8> {
    let mut stored = Vec::with_capacity(chunk.minis().len() * BLOCKS_PER_MINI);
    for mini in chunk.minis() {
        for y in 0..16usize {
            for z in 0..16usize {
                for x in 0..16usize {
                    stored.push(StoredBlock {
                        block_id: mini.block_at(x, y, z) as u8,
                        meta: mini.metadata_at(x, y, z).0,
                    });
                }
            }
        }
    }
    bytemuck::cast_slice(&stored).to_vec()
}

fn decode_chunk(coord: ChunkCoord, raw: &[u8]) -> Result<Chunk, CacheError> {
    let stored: &[StoredBlock] = bytemuck::try_cast_slice(raw).map_err(|_| CacheError::Corrupt(coord.x, coord.z))?;
    let expected = MINIS_PER_CHUNK as usize * BLOCKS_PER_MINI;
    if stored.len() != expected {
        return Err(CacheError::Corrupt(coord.x, coord.z));
    }

    let mut chunk = Chunk::empty(coord);
    for (mini_index, mini_chunk_slice) in stored.chunks_exact(BLOCKS_PER_MINI).enumerate() {
        let mini: &mut MiniChunk = chunk.mini_mut(mini_index);
        for y in 0..16usize {
            for z in 0..16usize {
                for x in 0..16usize {
                    let stored_block = mini_chunk_slice[local_index(x, y, z)];
                    let block_type = BlockType::from_id(stored_block.block_id)
                        .ok_or(CacheError::UnknownBlockId(coord.x, coord.z, stored_block.block_id))?;
                    mini.set_block_at(x, y, z, block_type);
                    mini.set_metadata_at(x, y, z, Metadata(stored_block.meta));
                }
            }
        }
        mini.clear_dirty();
    }
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkGenerator;
    use crate::noise::WorldSeed;
    use voxel_core::WorldConfig;

    #[test]
    fn round_trips_through_compression() {
        let dir = std::env::temp_dir().join(format!("voxel_chunk_cache_test_{:p}", &0u8));
        let cache = ChunkCache::new(&dir);
        let generator = ChunkGenerator::new(WorldSeed::new(42), &WorldConfig::default());
        let coord = ChunkCoord::new(4, -2);
        let original = generator.generate(coord);

        cache.store(&original).expect("store should succeed");
        let loaded = cache.load(coord).expect("load should succeed").expect("entry should exist");

        for (a, b) in original.minis().iter().zip(loaded.minis()) {
            for y in 0..16usize {
                for z in 0..16usize {
                    for x in 0..16usize {
                        assert_eq!(a.block_at(x, y, z), b.block_at(x, y, z));
                        assert_eq!(a.metadata_at(x, y, z), b.metadata_at(x, y, z));
                    }
                }
            }
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_entry_returns_none() {
        let dir = std::env::temp_dir().join("voxel_chunk_cache_test_missing");
        let cache = ChunkCache::new(&dir);
        assert!(cache.load(ChunkCoord::new(999, 999)).unwrap().is_none());
    }
}
