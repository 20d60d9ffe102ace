//! # Chunk Module
//!
//! A [`Chunk`] is a cubic grid of `chunk_size³` blocks at a location in chunk
//! coordinates. Blocks are stored densely in `[z][y][x]` order, air included,
//! so any cell can be reached in O(1):
//!
//! ```text
//! index = x + chunk_size * y + chunk_size² * z
//! ```
//!
//! Alongside the blocks every chunk carries a [`ChunkRenderIndex`], built once
//! from the blocks when the chunk is assembled, listing only the cells that
//! have geometry.
//!
//! ## Ownership
//!
//! A chunk owns its blocks, and through them their GPU buffers. Whoever evicts
//! a chunk hands it back to the uploader with [`Chunk::release`].
//!
//! The uploader keeps its buffers until they are released. A chunk dropped
//! without [`Chunk::release`] leaves them allocated there and logs a warning
//! with the number of buffer pairs left behind.

use cgmath::Point3;
use log::{debug, warn};

use crate::rendering::upload::GpuUploader;

use super::block::{block_face::FaceMask, Block};

pub mod chunk_index;

pub use chunk_index::{ChunkRenderIndex, DrawEntry};

/// A generated, meshed chunk.
#[derive(Debug)]
pub struct Chunk {
    location: Point3<i32>,
    faces: FaceMask,
    chunk_size: usize,
    blocks: Vec<Block>,
    render_index: ChunkRenderIndex,
}

impl Chunk {
    /// Assembles a chunk and builds its render index.
    ///
    /// # Panics
    /// Panics if `blocks` does not hold exactly `chunk_size³` blocks.
    pub(crate) fn new(
        location: Point3<i32>,
        faces: FaceMask,
        chunk_size: usize,
        blocks: Vec<Block>,
    ) -> Self {
        assert_eq!(
            blocks.len(),
            chunk_size * chunk_size * chunk_size,
            "chunk of size {} needs {} blocks",
            chunk_size,
            chunk_size * chunk_size * chunk_size
        );

        let render_index = ChunkRenderIndex::build(&blocks, chunk_size);

        Chunk {
            location,
            faces,
            chunk_size,
            blocks,
            render_index,
        }
    }

    /// Location in chunk coordinates.
    pub fn location(&self) -> Point3<i32> {
        self.location
    }

    /// Chunk faces bordering empty space, as requested at generation.
    pub fn faces(&self) -> FaceMask {
        self.faces
    }

    /// Edge length in blocks.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// All blocks, `[z][y][x]`.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The block at (x, y, z), or `None` outside the chunk.
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Option<&Block> {
        if x >= self.chunk_size || y >= self.chunk_size || z >= self.chunk_size {
            return None;
        }
        self.blocks.get(self.index_of(x, y, z))
    }

    /// Flat index of cell (x, y, z).
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.chunk_size * y + self.chunk_size * self.chunk_size * z
    }

    /// Cell coordinates of flat `index`.
    pub fn position_of(&self, index: usize) -> Point3<usize> {
        let size = self.chunk_size;
        Point3::new(index % size, (index / size) % size, index / (size * size))
    }

    /// The render index.
    pub fn render_index(&self) -> &ChunkRenderIndex {
        &self.render_index
    }

    /// Vertices across all blocks.
    pub fn vertex_count(&self) -> usize {
        self.render_index.vertex_count()
    }

    /// Vertex data of every drawable block, concatenated in draw-list order.
    pub fn flattened_vertices(&self) -> Vec<f32> {
        let floats = self
            .render_index
            .draw_list()
            .iter()
            .map(|entry| self.blocks[entry.index].vertex_data().len())
            .sum();

        let mut vertices = Vec::with_capacity(floats);
        for entry in self.render_index.draw_list() {
            vertices.extend_from_slice(self.blocks[entry.index].vertex_data());
        }
        vertices
    }

    /// Returns every GPU buffer of the chunk to `uploader` and drops the chunk.
    ///
    /// # Returns
    /// The number of buffer pairs released.
    pub fn release(mut self, uploader: &mut dyn GpuUploader) -> usize {
        let mut released = 0;
        for block in &mut self.blocks {
            if let Some(buffers) = block.take_buffers() {
                uploader.destroy_buffer(buffers);
                released += 1;
            }
        }

        debug!(
            "Released chunk {:?}: {} buffer pairs",
            self.location, released
        );
        released
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        let leaked = self
            .blocks
            .iter()
            .filter(|block| block.buffers().is_some())
            .count();
        if leaked > 0 {
            warn!(
                "Chunk {:?} dropped without release, {} buffer pairs stay allocated",
                self.location, leaked
            );
        }
    }
}
