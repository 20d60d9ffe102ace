//! # Generator Configuration
//!
//! Tunables for terrain generation, read from a JSON file. Every field has a
//! default, so a partial file (or `{}`) is a valid configuration.
//!
//! ```json
//! {
//!     "chunk_size": 16,
//!     "noise": { "seed": 0, "persistence": 0.8, "octaves": 1, "scale": 0.05,
//!                "min_height": 0, "max_height": 15 },
//!     "atlas_tiles_per_row": 16,
//!     "atlas": { "path": "atlas.png", "tile_size": 16 },
//!     "workers": 4
//! }
//! ```
//!
//! When `atlas` names an image, its tile count replaces `atlas_tiles_per_row`.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::rendering::atlas::DEFAULT_ATLAS_TILES_PER_ROW;

/// Edge length of a chunk in blocks when nothing else is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Errors raised while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for [`GeneratorConfig`].
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// `atlas_tiles_per_row` was zero.
    #[error("atlas must have at least one tile per row")]
    EmptyAtlas,
    /// `workers` was zero.
    #[error("at least one worker is required")]
    NoWorkers,
}

/// Parameters of the octave noise used for column heights.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Seed of the underlying noise
    pub seed: u32,
    /// Amplitude multiplier between octaves
    pub persistence: f64,
    /// Number of octaves summed
    pub octaves: u32,
    /// Frequency of the first octave
    pub scale: f64,
    /// Lowest height produced
    pub min_height: i32,
    /// Highest height produced
    pub max_height: i32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        NoiseParams {
            seed: 0,
            persistence: 0.8,
            octaves: 1,
            scale: 0.05,
            min_height: 0,
            max_height: 15,
        }
    }
}

/// An atlas image to read the tile layout from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AtlasSource {
    /// Image file
    pub path: PathBuf,
    /// Edge length of one square tile in pixels
    pub tile_size: u32,
}

/// Everything needed to set up chunk generation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Edge length of a chunk in blocks, must be greater than 1
    pub chunk_size: usize,
    /// Height noise
    pub noise: NoiseParams,
    /// Tiles on each side of the texture atlas
    pub atlas_tiles_per_row: u32,
    /// Atlas image, if any
    pub atlas: Option<AtlasSource>,
    /// Worker threads used for background generation
    pub workers: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            noise: NoiseParams::default(),
            atlas_tiles_per_row: DEFAULT_ATLAS_TILES_PER_ROW,
            atlas: None,
            workers: std::thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1),
        }
    }
}

impl GeneratorConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    /// I/O and parse failures, or values rejected by [`GeneratorConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: GeneratorConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that are not checked by the components themselves.
    ///
    /// The chunk size is validated when the chunk generator is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atlas_tiles_per_row == 0 {
            return Err(ConfigError::EmptyAtlas);
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}
