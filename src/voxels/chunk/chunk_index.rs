//! Flattened render index of a chunk.
//!
//! A chunk is mostly air and buried blocks without geometry. The render index
//! keeps one bit per cell saying whether it carries GPU buffers, and a dense
//! draw list of the cells that do, so the render loop never walks the full
//! grid.

use bitvec::prelude::BitVec;
use cgmath::Point3;

use crate::{rendering::upload::BufferHandles, voxels::block::Block};

/// One drawable block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawEntry {
    /// Flat index of the cell, `[z][y][x]` order
    pub index: usize,
    /// Cell coordinates within the chunk
    pub position: Point3<usize>,
    /// GPU buffers of the block
    pub buffers: BufferHandles,
    /// Vertices to draw
    pub vertex_count: usize,
}

/// Which cells of a chunk have geometry, and how to draw them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkRenderIndex {
    meshed: BitVec,
    draw_list: Vec<DrawEntry>,
    vertex_count: usize,
}

impl ChunkRenderIndex {
    /// Builds the index from blocks stored `[z][y][x]` in a chunk of edge `chunk_size`.
    pub fn build(blocks: &[Block], chunk_size: usize) -> Self {
        let mut meshed = BitVec::repeat(false, blocks.len());
        let mut draw_list = Vec::new();
        let mut vertex_count = 0;

        for (index, block) in blocks.iter().enumerate() {
            let Some(buffers) = block.buffers() else {
                continue;
            };

            meshed.set(index, true);
            vertex_count += block.vertex_count();
            draw_list.push(DrawEntry {
                index,
                position: Point3::new(
                    index % chunk_size,
                    (index / chunk_size) % chunk_size,
                    index / (chunk_size * chunk_size),
                ),
                buffers,
                vertex_count: block.vertex_count(),
            });
        }

        ChunkRenderIndex {
            meshed,
            draw_list,
            vertex_count,
        }
    }

    /// Returns `true` if the cell at flat `index` carries geometry.
    pub fn is_meshed(&self, index: usize) -> bool {
        self.meshed.get(index).is_some_and(|bit| *bit)
    }

    /// Number of cells with geometry.
    pub fn meshed_count(&self) -> usize {
        self.draw_list.len()
    }

    /// Drawable cells in `[z][y][x]` order.
    pub fn draw_list(&self) -> &[DrawEntry] {
        &self.draw_list
    }

    /// Vertices across the whole chunk.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
