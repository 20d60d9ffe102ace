//! # Terrain Generation
//!
//! Turns a chunk location into a meshed [`Chunk`].
//!
//! Generation runs in two halves:
//!
//! 1. [`ChunkGenerator::plan`] samples the height grid, decides the type and
//!    visible faces of every cell and builds the vertex data. It is pure and
//!    may run on any thread.
//! 2. [`ChunkPlan::upload`] hands the vertex data to a [`GpuUploader`] and
//!    assembles the chunk. It must run on the thread owning the uploader.
//!
//! [`ChunkGenerator::generate`] does both in one call.
//!
//! ## Terrain Rule
//!
//! Each column has a single surface height `h`, clamped to
//! `[0, chunk_size - 1]`. Cells at `z <= h` are grass, cells above are air.
//! Only the surface cell has visible faces: top and bottom always, and each
//! side whose neighbouring column is strictly lower. Buried cells keep their
//! type but carry no geometry.

use std::sync::Arc;

use cgmath::{Matrix4, Point3, Vector3};
use log::debug;
use thiserror::Error;

use crate::{
    config::GeneratorConfig,
    rendering::{
        atlas::UvAtlasResolver,
        meshing::{BlockMesh, BlockMeshBuilder},
        upload::GpuUploader,
    },
};

use super::{
    block::{block_face::FaceMask, block_type::BlockType},
    chunk::Chunk,
};

pub mod height_grid;
pub mod noise_field;

pub use height_grid::HeightGrid;
pub use noise_field::{HeightSource, NoiseField, TerrainNoise};

/// Errors raised while setting up generation.
#[derive(Error, Debug, PartialEq)]
pub enum GenerationError {
    /// Chunks must be at least two blocks wide.
    #[error("chunk size must be greater than 1, got {chunk_size}")]
    ChunkTooSmall {
        /// The rejected chunk size
        chunk_size: usize,
    },
    /// The noise parameters cannot produce heights.
    #[error("invalid noise parameters: {0}")]
    InvalidNoise(String),
}

/// Terrain data of one cell, independent of its geometry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellData {
    /// What the cell is made of
    pub block_type: BlockType,
    /// Faces the terrain rule exposes
    pub faces: FaceMask,
}

/// A generated chunk whose geometry has not been uploaded yet.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    location: Point3<i32>,
    faces: FaceMask,
    chunk_size: usize,
    cells: Vec<CellData>,
    meshes: Vec<BlockMesh>,
}

impl ChunkPlan {
    /// Location in chunk coordinates.
    pub fn location(&self) -> Point3<i32> {
        self.location
    }

    /// Edge length in blocks.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Terrain data of cell (x, y, z), or `None` outside the chunk.
    pub fn cell(&self, x: usize, y: usize, z: usize) -> Option<CellData> {
        let size = self.chunk_size;
        if x >= size || y >= size || z >= size {
            return None;
        }
        self.cells.get(x + size * y + size * size * z).copied()
    }

    /// Terrain data of every cell, `[z][y][x]`.
    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    /// Vertices that [`ChunkPlan::upload`] will hand to the GPU.
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(BlockMesh::vertex_count).sum()
    }

    /// Uploads the geometry and assembles the chunk.
    pub fn upload(self, uploader: &mut dyn GpuUploader) -> Chunk {
        let blocks = self
            .meshes
            .into_iter()
            .map(|mesh| mesh.upload(uploader))
            .collect();

        let chunk = Chunk::new(self.location, self.faces, self.chunk_size, blocks);
        debug!(
            "Uploaded chunk {:?}: {} blocks meshed, {} vertices",
            chunk.location(),
            chunk.render_index().meshed_count(),
            chunk.vertex_count()
        );
        chunk
    }
}

/// Generates chunks of terrain from a height source.
#[derive(Debug, Clone)]
pub struct ChunkGenerator<H = TerrainNoise> {
    chunk_size: usize,
    heights: H,
    mesh_builder: BlockMeshBuilder,
}

impl ChunkGenerator<TerrainNoise> {
    /// Builds a noise-driven generator from a configuration.
    ///
    /// # Errors
    /// [`GenerationError::ChunkTooSmall`] for chunk sizes below 2 and
    /// [`GenerationError::InvalidNoise`] for non-finite noise parameters.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let noise = &config.noise;
        if !noise.scale.is_finite() || !noise.persistence.is_finite() {
            return Err(GenerationError::InvalidNoise(format!(
                "scale {} and persistence {} must be finite",
                noise.scale, noise.persistence
            )));
        }

        ChunkGenerator::new(
            config.chunk_size,
            TerrainNoise::new(*noise),
            BlockMeshBuilder::new(UvAtlasResolver::new(config.atlas_tiles_per_row)),
        )
    }
}

impl<H: HeightSource> ChunkGenerator<H> {
    /// Creates a generator.
    ///
    /// # Errors
    /// [`GenerationError::ChunkTooSmall`] if `chunk_size` is 0 or 1. The height
    /// source is never sampled in that case.
    pub fn new(
        chunk_size: usize,
        heights: H,
        mesh_builder: BlockMeshBuilder,
    ) -> Result<Self, GenerationError> {
        if chunk_size <= 1 {
            return Err(GenerationError::ChunkTooSmall { chunk_size });
        }

        Ok(ChunkGenerator {
            chunk_size,
            heights,
            mesh_builder,
        })
    }

    /// Edge length of generated chunks.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Samples the padded height grid for the chunk at `location`.
    pub fn height_grid(&self, location: Point3<i32>) -> HeightGrid {
        HeightGrid::sample(&self.heights, location, self.chunk_size)
    }

    /// Computes types, faces and vertex data for the chunk at `location`.
    ///
    /// `faces` records which chunk faces border empty space; it is stored on
    /// the chunk and does not change the generated blocks.
    pub fn plan(&self, location: Point3<i32>, faces: FaceMask) -> ChunkPlan {
        let size = self.chunk_size;
        let grid = self.height_grid(location);

        let mut cells = vec![CellData::default(); size * size * size];
        for y in 0..size {
            for x in 0..size {
                let surface = grid.surface(x as isize, y as isize);
                let exposed = grid.exposed_faces(x, y);
                for z in 0..=surface {
                    cells[x + size * y + size * size * z] = CellData {
                        block_type: BlockType::GRASS,
                        faces: if z == surface { exposed } else { FaceMask::NONE },
                    };
                }
            }
        }

        let origin = Vector3::new(
            -(location.x as f32 * size as f32),
            location.y as f32 * size as f32,
            location.z as f32 * size as f32,
        );

        let meshes = cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let (x, y, z) = (index % size, (index / size) % size, index / (size * size));
                let transform = Matrix4::from_translation(
                    origin + Vector3::new(x as f32, y as f32, z as f32),
                );
                self.mesh_builder.mesh(cell.block_type, &transform, cell.faces)
            })
            .collect();

        let plan = ChunkPlan {
            location,
            faces,
            chunk_size: size,
            cells,
            meshes,
        };
        debug!(
            "Planned chunk {:?}: {} vertices",
            location,
            plan.vertex_count()
        );
        plan
    }

    /// Generates, meshes and uploads the chunk at `location`.
    pub fn generate(
        &self,
        location: Point3<i32>,
        faces: FaceMask,
        uploader: &mut dyn GpuUploader,
    ) -> Chunk {
        self.plan(location, faces).upload(uploader)
    }

    /// Wraps the generator for sharing with worker threads.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
