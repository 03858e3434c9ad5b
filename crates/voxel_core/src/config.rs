//! Startup configuration.
//!
//! Deserializes from an optional `world.toml`; every field has a default so
//! a missing file is not an error. `RENDER_DISTANCE` and `WORLD_SEED`
//! environment variables then override the corresponding fields - env wins
//! over file, file wins over built-in default, matching the "single binary
//! with no flags" interface contract in SPEC_FULL.md §6.

use serde::{Deserialize, Serialize};

/// Sea level used by the chunk generator, in world-block y.
pub const DEFAULT_SEA_LEVEL: i32 = 63;

/// World and pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Render radius in chunks around the observer (Chebyshev radius).
    pub render_distance: u32,
    /// World seed; all procedural generation derives from this.
    pub world_seed: u64,
    /// World-block y at which `StillWater` fills otherwise-air cells during generation.
    pub sea_level: i32,
    /// Horizontal noise scale for terrain height (smaller = broader features).
    pub terrain_scale: f64,
    /// Vertical span of generated terrain above `base_height`.
    pub terrain_amplitude: i32,
    /// Minimum generated terrain height.
    pub base_height: i32,
    /// Liquid/world tick rate, in ticks per second.
    pub tick_rate_hz: u32,
    /// Number of chunk-generation worker threads.
    pub chunk_gen_workers: usize,
    /// Number of mesh-generation worker threads.
    pub mesh_gen_workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            render_distance: 6,
            world_seed: 0xDEAD_BEEF_CAFE_BABE,
            sea_level: DEFAULT_SEA_LEVEL,
            terrain_scale: 0.01,
            terrain_amplitude: 48,
            base_height: 48,
            tick_rate_hz: 20,
            chunk_gen_workers: 2,
            mesh_gen_workers: 2,
        }
    }
}

impl WorldConfig {
    /// Loads configuration from `path`, falling back to defaults for any
    /// field the file omits, then applies environment overrides.
    ///
    /// A missing file is not an error: defaults are used as if the file
    /// were present but empty.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies `RENDER_DISTANCE` and `WORLD_SEED` environment overrides in
    /// place. Malformed values are ignored (the existing field is kept).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("RENDER_DISTANCE") {
            if let Ok(parsed) = value.parse() {
                self.render_distance = parsed;
            }
        }
        if let Ok(value) = std::env::var("WORLD_SEED") {
            if let Ok(parsed) = value.parse() {
                self.world_seed = parsed;
            }
        }
    }
}

/// Configuration load failure (malformed `world.toml`).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file existed but failed to parse as TOML.
    #[error("invalid world.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = WorldConfig::default();
        assert_eq!(config.sea_level, DEFAULT_SEA_LEVEL);
        assert_eq!(config.tick_rate_hz, 20);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = WorldConfig::load(std::path::Path::new("/nonexistent/world.toml")).unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn partial_toml_fills_remaining_defaults() {
        let config: WorldConfig = toml::from_str("render_distance = 12").unwrap();
        assert_eq!(config.render_distance, 12);
        assert_eq!(config.sea_level, DEFAULT_SEA_LEVEL);
    }
}
