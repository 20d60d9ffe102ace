//! # Block Face Module
//!
//! This module defines the six faces of a voxel block and the 6-bit mask used
//! to record which of them are exposed and need geometry.
//!
//! The axis convention is right-handed with z pointing up:
//!
//! ```text
//!             z (up)
//!   (back) +x |
//!            \|
//!  (left) -y--+--+y (right)
//! ```
//!
//! The front face looks down -x, the back face +x, left -y, right +y,
//! bottom -z and top +z. Terrain generation and meshing both rely on it.

use std::ops::{BitOr, BitOrAssign};

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant is the bit position of the face inside a [`FaceMask`],
/// and also the order in which the mesh builder emits faces.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockFace {
    /// The right face (facing positive Y)
    RIGHT = 0,

    /// The left face (facing negative Y)
    LEFT = 1,

    /// The back face (facing positive X)
    BACK = 2,

    /// The front face (facing negative X)
    FRONT = 3,

    /// The bottom face (facing negative Z)
    BOTTOM = 4,

    /// The top face (facing positive Z)
    TOP = 5,
}

impl BlockFace {
    /// Returns an array containing all six block faces in mask-bit order.
    ///
    /// The order is: [RIGHT, LEFT, BACK, FRONT, BOTTOM, TOP]
    pub fn all() -> [BlockFace; 6] {
        [
            BlockFace::RIGHT,
            BlockFace::LEFT,
            BlockFace::BACK,
            BlockFace::FRONT,
            BlockFace::BOTTOM,
            BlockFace::TOP,
        ]
    }

    /// The bit this face occupies inside a [`FaceMask`].
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Unit normal pointing out of the block through this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockFace::RIGHT => Vector3::new(0.0, 1.0, 0.0),
            BlockFace::LEFT => Vector3::new(0.0, -1.0, 0.0),
            BlockFace::BACK => Vector3::new(1.0, 0.0, 0.0),
            BlockFace::FRONT => Vector3::new(-1.0, 0.0, 0.0),
            BlockFace::BOTTOM => Vector3::new(0.0, 0.0, -1.0),
            BlockFace::TOP => Vector3::new(0.0, 0.0, 1.0),
        }
    }
}

/// A 6-bit set of [`BlockFace`]s.
///
/// Bits outside the six defined faces carry no meaning and are dropped on
/// construction, so a mask never reports more than six faces.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct FaceMask(u8);

impl FaceMask {
    /// No faces.
    pub const NONE: FaceMask = FaceMask(0);
    /// Only the right face.
    pub const RIGHT: FaceMask = FaceMask(BlockFace::RIGHT.bit());
    /// Only the left face.
    pub const LEFT: FaceMask = FaceMask(BlockFace::LEFT.bit());
    /// Only the back face.
    pub const BACK: FaceMask = FaceMask(BlockFace::BACK.bit());
    /// Only the front face.
    pub const FRONT: FaceMask = FaceMask(BlockFace::FRONT.bit());
    /// Only the bottom face.
    pub const BOTTOM: FaceMask = FaceMask(BlockFace::BOTTOM.bit());
    /// Only the top face.
    pub const TOP: FaceMask = FaceMask(BlockFace::TOP.bit());
    /// All six faces.
    pub const ALL: FaceMask = FaceMask(0b11_1111);

    /// Builds a mask from raw bits, discarding anything above bit 5.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        FaceMask(bits & Self::ALL.0)
    }

    /// The raw 6-bit value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when no face is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when `face` is set.
    pub const fn contains(self, face: BlockFace) -> bool {
        self.0 & face.bit() != 0
    }

    /// Sets `face`.
    pub fn insert(&mut self, face: BlockFace) {
        self.0 |= face.bit();
    }

    /// Clears `face`.
    pub fn remove(&mut self, face: BlockFace) {
        self.0 &= !face.bit();
    }

    /// Number of faces set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the set faces in mask-bit order.
    pub fn faces(self) -> impl Iterator<Item = BlockFace> {
        BlockFace::all()
            .into_iter()
            .filter(move |face| self.contains(*face))
    }
}

impl From<BlockFace> for FaceMask {
    fn from(face: BlockFace) -> Self {
        FaceMask(face.bit())
    }
}

impl BitOr for FaceMask {
    type Output = FaceMask;

    fn bitor(self, rhs: FaceMask) -> FaceMask {
        FaceMask(self.0 | rhs.0)
    }
}

impl BitOr<BlockFace> for FaceMask {
    type Output = FaceMask;

    fn bitor(self, rhs: BlockFace) -> FaceMask {
        FaceMask(self.0 | rhs.bit())
    }
}

impl BitOrAssign for FaceMask {
    fn bitor_assign(&mut self, rhs: FaceMask) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<BlockFace> for FaceMask {
    fn bitor_assign(&mut self, rhs: BlockFace) {
        self.0 |= rhs.bit();
    }
}

impl std::fmt::Debug for FaceMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.faces()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_bits_match_mask_layout() {
        assert_eq!(FaceMask::RIGHT.bits(), 1);
        assert_eq!(FaceMask::LEFT.bits(), 2);
        assert_eq!(FaceMask::BACK.bits(), 4);
        assert_eq!(FaceMask::FRONT.bits(), 8);
        assert_eq!(FaceMask::BOTTOM.bits(), 16);
        assert_eq!(FaceMask::TOP.bits(), 32);
        assert_eq!(FaceMask::ALL.count(), 6);
    }

    #[test]
    fn undefined_bits_are_dropped() {
        assert_eq!(FaceMask::from_bits_truncate(0xFF), FaceMask::ALL);
        assert_eq!(FaceMask::from_bits_truncate(0b1100_0000), FaceMask::NONE);
        assert!(FaceMask::from_bits_truncate(0x40).is_empty());
    }

    #[test]
    fn faces_iterate_in_bit_order() {
        let mask = FaceMask::TOP | FaceMask::RIGHT | BlockFace::FRONT;
        let faces: Vec<BlockFace> = mask.faces().collect();
        assert_eq!(
            faces,
            vec![BlockFace::RIGHT, BlockFace::FRONT, BlockFace::TOP]
        );
    }

    #[test]
    fn insert_and_remove() {
        let mut mask = FaceMask::NONE;
        mask.insert(BlockFace::BACK);
        mask |= BlockFace::BOTTOM;
        assert!(mask.contains(BlockFace::BACK));
        mask.remove(BlockFace::BACK);
        assert!(!mask.contains(BlockFace::BACK));
        assert_eq!(mask, FaceMask::BOTTOM);
    }

    #[test]
    fn opposite_faces_have_opposite_normals() {
        let pairs = [
            (BlockFace::RIGHT, BlockFace::LEFT),
            (BlockFace::BACK, BlockFace::FRONT),
            (BlockFace::TOP, BlockFace::BOTTOM),
        ];
        for (a, b) in pairs {
            assert_eq!(a.normal(), -b.normal());
        }
    }
}
