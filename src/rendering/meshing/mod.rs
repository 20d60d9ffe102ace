//! Mesh generation for single blocks.
//!
//! This module converts a block type, a placement transform and a face mask
//! into interleaved vertex data, two triangles per visible face.
//!
//! # Architecture
//! - [`BlockMeshBuilder`]: emits vertex data and hands it to the GPU uploader
//! - [`BlockMesh`]: vertex data that has not been uploaded yet
//! - `face_table`: the unit cube corners and per-face winding table
//!
//! # Usage
//! ```no_run
//! use cgmath::{Matrix4, Vector3};
//! use voxel_terrain::rendering::{
//!     atlas::UvAtlasResolver, meshing::BlockMeshBuilder, upload::HostUploader,
//! };
//! use voxel_terrain::voxels::block::{block_face::FaceMask, block_type::BlockType};
//!
//! let builder = BlockMeshBuilder::new(UvAtlasResolver::new(16));
//! let mut uploader = HostUploader::new();
//! let block = builder.build(
//!     BlockType::GRASS,
//!     &Matrix4::from_translation(Vector3::new(0.0, 0.0, 2.0)),
//!     FaceMask::TOP | FaceMask::BOTTOM,
//!     &mut uploader,
//! );
//! assert_eq!(block.vertex_count(), 12);
//! ```

mod block_mesh;
mod face_table;

pub use block_mesh::*;
