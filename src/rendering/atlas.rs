//! # UV Atlas Module
//!
//! Maps block types to the tiles they use inside the square texture atlas.
//! A block has three face groups: top, sides and bottom. Each group resolves
//! to the UV origin (lower corner) of one atlas tile, normalized so that one
//! tile is `1 / tiles_per_row` wide.

use cgmath::Vector2;
use phf::phf_map;

use crate::voxels::block::{block_face::BlockFace, block_type::BlockType, BlockTypeSize};

use super::texture_atlas::AtlasGeometry;

/// Inset applied to every tile edge so bilinear filtering never samples a
/// neighbouring tile. Fixed, not proportional to the tile size.
pub const UV_PAD: f32 = 0.005;

/// Tiles per atlas row when nothing else is configured.
pub const DEFAULT_ATLAS_TILES_PER_ROW: u32 = 16;

/// Atlas tile (column, row) for the top, side and bottom faces of each
/// textured block type, keyed by `BlockTypeSize`.
static BLOCK_TYPE_TO_ATLAS_TILES: phf::Map<BlockTypeSize, [[u32; 2]; 3]> = phf_map! {
    1u8 => [[2, 0], [2, 0], [2, 0]], // DIRT (all faces use tile 2)
    2u8 => [[0, 0], [1, 0], [2, 0]], // GRASS (top: 0, sides: 1, bottom: 2)
};

/// UV origins for the three face groups of a block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceUvs {
    /// Origin of the tile used by the top face
    pub top: Vector2<f32>,
    /// Origin of the tile used by the four side faces
    pub sides: Vector2<f32>,
    /// Origin of the tile used by the bottom face
    pub bottom: Vector2<f32>,
}

impl FaceUvs {
    /// Every group at the atlas origin. Used for block types without a tile.
    pub fn origin() -> Self {
        FaceUvs {
            top: Vector2::new(0.0, 0.0),
            sides: Vector2::new(0.0, 0.0),
            bottom: Vector2::new(0.0, 0.0),
        }
    }

    /// The origin used by `face`.
    pub fn for_face(&self, face: BlockFace) -> Vector2<f32> {
        match face {
            BlockFace::TOP => self.top,
            BlockFace::BOTTOM => self.bottom,
            BlockFace::RIGHT | BlockFace::LEFT | BlockFace::BACK | BlockFace::FRONT => self.sides,
        }
    }
}

/// Resolves block types to atlas UV origins.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvAtlasResolver {
    tiles_per_row: u32,
}

impl Default for UvAtlasResolver {
    fn default() -> Self {
        UvAtlasResolver::new(DEFAULT_ATLAS_TILES_PER_ROW)
    }
}

impl UvAtlasResolver {
    /// Creates a resolver for an atlas with `tiles_per_row` tiles on each side.
    /// A value of 0 is treated as 1.
    pub fn new(tiles_per_row: u32) -> Self {
        UvAtlasResolver {
            tiles_per_row: tiles_per_row.max(1),
        }
    }

    /// Creates a resolver matching a loaded atlas image.
    pub fn from_geometry(geometry: &AtlasGeometry) -> Self {
        UvAtlasResolver::new(geometry.tiles_per_row())
    }

    /// Number of tiles on each side of the atlas.
    pub fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    /// Width (and height) of one tile in UV space.
    pub fn tile_size(&self) -> f32 {
        1.0 / self.tiles_per_row as f32
    }

    /// Looks up the UV origins for `block_type`.
    ///
    /// # Returns
    /// `None` for block types without a texture. Callers draw those with the
    /// atlas origin; this is a fallback, not an error.
    pub fn resolve(&self, block_type: BlockType) -> Option<FaceUvs> {
        let [top, sides, bottom] = BLOCK_TYPE_TO_ATLAS_TILES.get(&block_type.as_int())?;
        Some(FaceUvs {
            top: self.tile_origin(*top),
            sides: self.tile_origin(*sides),
            bottom: self.tile_origin(*bottom),
        })
    }

    /// Same as [`UvAtlasResolver::resolve`] with the origin fallback applied.
    pub fn resolve_or_origin(&self, block_type: BlockType) -> FaceUvs {
        self.resolve(block_type).unwrap_or_else(FaceUvs::origin)
    }

    fn tile_origin(&self, [column, row]: [u32; 2]) -> Vector2<f32> {
        let tile = self.tile_size();
        Vector2::new(column as f32 * tile, row as f32 * tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirt_uses_one_tile_everywhere() {
        let resolver = UvAtlasResolver::new(16);
        let uvs = resolver.resolve(BlockType::DIRT).unwrap();

        assert_eq!(uvs.top, Vector2::new(2.0 / 16.0, 0.0));
        assert_eq!(uvs.top, uvs.sides);
        assert_eq!(uvs.sides, uvs.bottom);
    }

    #[test]
    fn grass_uses_three_tiles() {
        let resolver = UvAtlasResolver::new(4);
        let uvs = resolver.resolve(BlockType::GRASS).unwrap();

        assert_eq!(uvs.top, Vector2::new(0.0, 0.0));
        assert_eq!(uvs.sides, Vector2::new(0.25, 0.0));
        assert_eq!(uvs.bottom, Vector2::new(0.5, 0.0));
        assert_eq!(uvs.for_face(BlockFace::FRONT), uvs.sides);
        assert_eq!(uvs.for_face(BlockFace::BOTTOM), uvs.bottom);
    }

    #[test]
    fn untextured_types_fall_back_to_origin() {
        let resolver = UvAtlasResolver::default();
        for block_type in [BlockType::AIR, BlockType::STONE, BlockType::SAND, BlockType::WATER] {
            assert!(resolver.resolve(block_type).is_none());
            assert_eq!(resolver.resolve_or_origin(block_type), FaceUvs::origin());
        }
    }

    #[test]
    fn resolver_follows_atlas_geometry() {
        // 64x16 pixels of 16x16 tiles: four tiles in a row.
        let geometry = AtlasGeometry::new(64, 16, 16, 16, 4).unwrap();
        let resolver = UvAtlasResolver::from_geometry(&geometry);

        assert_eq!(resolver.tiles_per_row(), 4);
        assert_eq!(resolver, UvAtlasResolver::new(4));
        assert_eq!(resolver.resolve(BlockType::GRASS).unwrap().sides, Vector2::new(0.25, 0.0));
    }

    #[test]
    fn zero_tiles_per_row_is_one_tile() {
        let resolver = UvAtlasResolver::new(0);
        assert_eq!(resolver.tiles_per_row(), 1);
        assert_eq!(resolver.tile_size(), 1.0);
    }
}
