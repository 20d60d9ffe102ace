//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion from
//! the compact integer form used for storage and atlas lookups.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the compact
/// [`BlockTypeSize`] representation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// No geometry and no faces.
    #[default]
    AIR,

    /// A basic dirt block, one texture on every face.
    DIRT,

    /// A grass block with different textures on top and sides.
    /// The top is green, sides have grass on dirt, and bottom is plain dirt.
    GRASS,

    /// Solid rock.
    STONE,

    /// Loose sand.
    SAND,

    /// Water.
    WATER,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// The compact integer form of this type.
    pub fn as_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Returns `true` for [`BlockType::AIR`].
    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversion() {
        assert_eq!(BlockType::from_int(2), Some(BlockType::GRASS));
        assert_eq!(BlockType::from_int(BlockType::WATER.as_int()), Some(BlockType::WATER));
        assert_eq!(BlockType::from_int(6), None);
    }

    #[test]
    fn only_air_is_air() {
        assert!(BlockType::AIR.is_air());
        assert!(!BlockType::STONE.is_air());
        assert_eq!(BlockType::default(), BlockType::AIR);
    }
}
