//! Terrain height and surface-block selection.
//!
//! Implements SPEC_FULL.md §4.1's column-sampling contract: a scalar
//! coherent noise sample mapped to a terrain height, then a fixed layering
//! of stone / dirt / surface / water / air derived from that height.

use crate::noise::{NoiseField, WorldSeed};
use voxel_core::WorldConfig;

/// Number of octaves summed for terrain height noise.
const HEIGHT_OCTAVES: u32 = 4;
/// Amplitude decay per octave.
const HEIGHT_PERSISTENCE: f64 = 0.5;
/// Frequency growth per octave.
const HEIGHT_LACUNARITY: f64 = 2.0;
/// Thickness of the dirt layer beneath the surface block.
const DIRT_DEPTH: i32 = 4;
/// How close to sea level a surface counts as "shoreline" (sand instead of grass).
const SHORELINE_BAND: i32 = 1;

/// Deterministic terrain sampler for one world seed.
///
/// Pure given `(x, z)`: the same seed and coordinates always produce the
/// same height and surface-block decision, satisfying the generator's
/// determinism invariant (SPEC_FULL.md §8, invariant 1).
pub struct TerrainSampler {
    height_noise: NoiseField,
    decoration_noise: NoiseField,
    base_height: i32,
    amplitude: i32,
    scale: f64,
    sea_level: i32,
}

impl TerrainSampler {
    /// Derivation tag for the height noise stream.
    const HEIGHT_PURPOSE: u64 = 1;
    /// Derivation tag for the decoration noise stream.
    const DECORATION_PURPOSE: u64 = 2;

    /// Builds a sampler from a world seed and the relevant config fields.
    #[must_use]
    pub fn new(seed: WorldSeed, config: &WorldConfig) -> Self {
        Self {
            height_noise: NoiseField::new(seed.derive(Self::HEIGHT_PURPOSE)),
            decoration_noise: NoiseField::new(seed.derive(Self::DECORATION_PURPOSE)),
            base_height: config.base_height,
            amplitude: config.terrain_amplitude,
            scale: config.terrain_scale,
            sea_level: config.sea_level,
        }
    }

    /// Terrain surface height at world column `(x, z)`, in `[base_height, base_height + amplitude]`.
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let n = self
            .height_noise
            .octaved2(f64::from(x) * self.scale, f64::from(z) * self.scale, HEIGHT_OCTAVES, HEIGHT_PERSISTENCE, HEIGHT_LACUNARITY);
        let normalized = (n + 1.0) * 0.5; // map [-1, 1] -> [0, 1]
        self.base_height + (normalized * f64::from(self.amplitude)) as i32
    }

    /// Whether a surface at `(x, surface_height, z)` should be sand rather
    /// than grass, because it sits within the shoreline band around sea level.
    #[must_use]
    pub fn is_shoreline(&self, surface_height: i32) -> bool {
        (surface_height - self.sea_level).abs() <= SHORELINE_BAND
    }

    /// Deterministic decoration threshold test: `true` for columns that
    /// should receive a single-block decoration on an exposed grass surface.
    #[must_use]
    pub fn has_decoration(&self, x: i32, z: i32) -> bool {
        const DECORATION_SCALE: f64 = 0.5;
        const DECORATION_THRESHOLD: f64 = 0.94;
        self.decoration_noise.sample2(f64::from(x) * DECORATION_SCALE, f64::from(z) * DECORATION_SCALE) > DECORATION_THRESHOLD
    }

    /// Sea level this sampler was built with.
    #[inline]
    #[must_use]
    pub const fn sea_level(&self) -> i32 {
        self.sea_level
    }
}

/// Dirt-layer thickness beneath the surface block, re-exported for callers
/// building a column without going through [`TerrainSampler`].
#[must_use]
pub const fn dirt_depth() -> i32 {
    DIRT_DEPTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler(seed: u64) -> TerrainSampler {
        TerrainSampler::new(WorldSeed::new(seed), &WorldConfig::default())
    }

    #[test]
    fn height_is_deterministic() {
        let a = sampler(1);
        let b = sampler(1);
        for x in -20..20 {
            assert_eq!(a.height_at(x, 7), b.height_at(x, 7));
        }
    }

    #[test]
    fn height_stays_in_configured_band() {
        let config = WorldConfig::default();
        let s = TerrainSampler::new(WorldSeed::new(99), &config);
        for x in (-500..500).step_by(13) {
            for z in (-500..500).step_by(17) {
                let h = s.height_at(x, z);
                assert!(h >= config.base_height && h <= config.base_height + config.terrain_amplitude);
            }
        }
    }

    #[test]
    fn shoreline_band_is_symmetric_around_sea_level() {
        let s = sampler(5);
        let sea = s.sea_level();
        assert!(s.is_shoreline(sea));
        assert!(s.is_shoreline(sea + 1));
        assert!(!s.is_shoreline(sea + 5));
    }
}
