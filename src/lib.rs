#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Heightmap terrain generation and per-block meshing for voxel chunks.
//!
//! For every chunk location the generator samples octave noise over a padded
//! grid of columns, fills each column with grass up to its surface, works out
//! which faces of the surface block border open air, and builds textured cube
//! geometry for it. Vertex data is uploaded through a [`GpuUploader`], backed
//! either by `wgpu` or by host memory.
//!
//! ## Key Modules
//!
//! * `config` - Generator configuration loaded from JSON
//! * `rendering` - Vertex format, texture atlas, block meshing and GPU upload
//! * `task_management` - Worker threads for generating chunks in the background
//! * `voxels` - Blocks, chunks and terrain generation
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_terrain::{
//!     config::GeneratorConfig,
//!     rendering::upload::HostUploader,
//!     voxels::{block::block_face::FaceMask, generation::ChunkGenerator},
//! };
//!
//! let generator = ChunkGenerator::from_config(&GeneratorConfig::default()).unwrap();
//! let mut uploader = HostUploader::new();
//! let chunk = generator.generate(Point3::new(0, 0, 0), FaceMask::ALL, &mut uploader);
//! println!("{} vertices", chunk.vertex_count());
//! ```

use cgmath::Point3;
use log::{info, warn};
use thiserror::Error;

use config::{ConfigError, GeneratorConfig};
use rendering::{
    atlas::UvAtlasResolver,
    texture_atlas::{AtlasError, TextureAtlas},
    upload::{GpuUploader, HostUploader, WgpuUploader},
};
use task_management::{chunk_generation_task::ChunkGenerationTask, TaskManager};
use voxels::{
    block::block_face::FaceMask,
    generation::{ChunkGenerator, GenerationError},
};

pub mod config;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Chunks generated around the origin in each direction by [`run`].
pub const DEMO_RADIUS: i32 = 1;

/// Errors that stop [`run`].
#[derive(Error, Debug)]
pub enum RunError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The configured atlas image could not be used.
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    /// The generator could not be set up.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Runs the terrain demo.
///
/// Installs the logger, loads the configuration named by the first command
/// line argument (defaults otherwise), reads the tile layout of the configured
/// atlas image, generates the square of chunks within [`DEMO_RADIUS`] of the
/// origin on worker threads and logs what was built.
///
/// Uploads go to a headless `wgpu` device when one is available, and to host
/// memory otherwise.
pub fn run() -> Result<(), RunError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            GeneratorConfig::load(path)?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(source) = &config.atlas {
        let atlas = TextureAtlas::open(&source.path, source.tile_size, source.tile_size)?;
        let resolver = UvAtlasResolver::from_geometry(atlas.geometry());
        info!(
            "Atlas {:?}: {} tiles per row, {} bytes of pixel data",
            source.path,
            resolver.tiles_per_row(),
            atlas.pixels().len()
        );
        config.atlas_tiles_per_row = resolver.tiles_per_row();
    }

    let generator = ChunkGenerator::from_config(&config)?.shared();

    let mut uploader: Box<dyn GpuUploader> = match WgpuUploader::request_headless() {
        Ok(uploader) => Box::new(uploader),
        Err(err) => {
            warn!("No GPU available ({}), keeping vertex data in host memory", err);
            Box::new(HostUploader::new())
        }
    };

    let mut task_manager = TaskManager::new(config.workers);
    for x in -DEMO_RADIUS..=DEMO_RADIUS {
        for y in -DEMO_RADIUS..=DEMO_RADIUS {
            task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                generator.clone(),
                Point3::new(x, y, 0),
                FaceMask::ALL,
            )));
        }
    }

    let chunks = task_manager.wait_for_all(uploader.as_mut());

    let mut total_vertices = 0;
    let mut total_blocks = 0;
    for chunk in &chunks {
        info!(
            "Chunk {:?}: {} blocks with geometry, {} vertices",
            chunk.location(),
            chunk.render_index().meshed_count(),
            chunk.vertex_count()
        );
        total_vertices += chunk.vertex_count();
        total_blocks += chunk.render_index().meshed_count();
    }
    info!(
        "Generated {} chunks of size {}: {} blocks with geometry, {} vertices",
        chunks.len(),
        config.chunk_size,
        total_blocks,
        total_vertices
    );

    let released: usize = chunks
        .into_iter()
        .map(|chunk| chunk.release(uploader.as_mut()))
        .sum();
    info!("Released {} buffer pairs", released);

    Ok(())
}
