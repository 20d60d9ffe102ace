//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the meshed
//! block produced by the mesh builder.

use block_face::FaceMask;
use block_type::BlockType;

use crate::rendering::{upload::BufferHandles, FLOATS_PER_VERTEX};

pub mod block_face;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for compact storage and for keying the atlas tile table.
pub type BlockTypeSize = u8;

/// A single block of a chunk together with its geometry.
///
/// A block of type [`BlockType::AIR`] or with no visible faces carries no
/// vertex data and no GPU buffers. Otherwise `vertex_data` holds
/// 5 floats per vertex (x, y, z, u, v), six vertices per visible face, and
/// `buffers` names the vertex array and vertex buffer holding the same data
/// on the GPU. Whoever owns the block owns those buffers.
#[derive(Debug, Default)]
pub struct Block {
    block_type: BlockType,
    visible_faces: FaceMask,
    vertex_data: Vec<f32>,
    buffers: Option<BufferHandles>,
}

impl Block {
    /// An air block: no faces, no vertices, no buffers.
    pub fn air() -> Self {
        Block::default()
    }

    /// Assembles a meshed block. Only the mesh builder creates these.
    pub(crate) fn meshed(
        block_type: BlockType,
        visible_faces: FaceMask,
        vertex_data: Vec<f32>,
        buffers: BufferHandles,
    ) -> Self {
        Block {
            block_type,
            visible_faces,
            vertex_data,
            buffers: Some(buffers),
        }
    }

    /// The type of this block.
    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// The faces that carry geometry.
    pub fn visible_faces(&self) -> FaceMask {
        self.visible_faces
    }

    /// Interleaved vertex data, 5 floats per vertex.
    pub fn vertex_data(&self) -> &[f32] {
        &self.vertex_data
    }

    /// Number of vertices in [`Block::vertex_data`].
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / FLOATS_PER_VERTEX
    }

    /// GPU handles, present only when the block has geometry.
    pub fn buffers(&self) -> Option<BufferHandles> {
        self.buffers
    }

    /// Hands the GPU handles back to the caller, leaving the block without them.
    pub(crate) fn take_buffers(&mut self) -> Option<BufferHandles> {
        self.buffers.take()
    }
}
