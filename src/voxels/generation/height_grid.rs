//! Padded column heights for one chunk.
//!
//! The grid covers x, y in `[-1, chunk_size]`, one column wider than the chunk
//! on every side, so boundary columns can be compared against their
//! neighbours without touching the adjacent chunk.

use cgmath::Point3;

use crate::voxels::block::block_face::FaceMask;

use super::noise_field::HeightSource;

/// Column heights of a chunk plus a ring of neighbouring columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightGrid {
    chunk_size: usize,
    heights: Vec<i32>,
}

impl HeightGrid {
    /// Samples every column of the padded grid for the chunk at `location`.
    ///
    /// Local column (x, y) maps to world column
    /// `(-(location.x * chunk_size) + x, location.y * chunk_size + y)`.
    /// The x axis is mirrored relative to y; neighbouring chunks still agree on
    /// their shared padded columns.
    pub fn sample<H>(source: &H, location: Point3<i32>, chunk_size: usize) -> Self
    where
        H: HeightSource + ?Sized,
    {
        let padded = chunk_size + 2;
        let size = chunk_size as i64;
        let mut heights = Vec::with_capacity(padded * padded);

        for y in -1..=size {
            for x in -1..=size {
                let world_x = -(location.x as i64 * size) + x;
                let world_y = location.y as i64 * size + y;
                heights.push(source.height_at(world_x, world_y));
            }
        }

        HeightGrid {
            chunk_size,
            heights,
        }
    }

    /// Builds a grid from raw padded heights, row by row in y, x in `[-1, chunk_size]`.
    ///
    /// # Returns
    /// `None` if `heights` does not hold exactly `(chunk_size + 2)²` values.
    pub fn from_padded(chunk_size: usize, heights: Vec<i32>) -> Option<Self> {
        let padded = chunk_size + 2;
        (heights.len() == padded * padded).then_some(HeightGrid {
            chunk_size,
            heights,
        })
    }

    /// Edge length of the chunk the grid belongs to.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Raw sampled height of column (x, y), with x and y in `[-1, chunk_size]`.
    ///
    /// # Panics
    /// Panics if the column is outside the padded grid.
    pub fn get(&self, x: isize, y: isize) -> i32 {
        let padded = self.chunk_size as isize + 2;
        assert!(
            (-1..padded - 1).contains(&x) && (-1..padded - 1).contains(&y),
            "column ({}, {}) outside padded grid of chunk size {}",
            x,
            y,
            self.chunk_size
        );
        self.heights[((y + 1) * padded + (x + 1)) as usize]
    }

    /// Surface z of column (x, y), clamped into the chunk's vertical range.
    pub fn surface(&self, x: isize, y: isize) -> usize {
        self.get(x, y).clamp(0, self.chunk_size as i32 - 1) as usize
    }

    /// Faces of the surface block of interior column (x, y) that border open air.
    ///
    /// Top and Bottom are always present. A side face is present when the
    /// column stands strictly higher than the neighbour on that side, comparing
    /// clamped surfaces.
    ///
    /// # Panics
    /// Panics if x or y is not below `chunk_size`. Padding columns have no
    /// neighbours on their outer side.
    pub fn exposed_faces(&self, x: usize, y: usize) -> FaceMask {
        assert!(
            x < self.chunk_size && y < self.chunk_size,
            "column ({}, {}) is not inside chunk of size {}",
            x,
            y,
            self.chunk_size
        );
        let (x, y) = (x as isize, y as isize);
        let height = self.surface(x, y);

        let mut faces = FaceMask::TOP | FaceMask::BOTTOM;
        if height > self.surface(x - 1, y) {
            faces |= FaceMask::FRONT;
        }
        if height > self.surface(x + 1, y) {
            faces |= FaceMask::BACK;
        }
        if height > self.surface(x, y - 1) {
            faces |= FaceMask::LEFT;
        }
        if height > self.surface(x, y + 1) {
            faces |= FaceMask::RIGHT;
        }
        faces
    }
}
