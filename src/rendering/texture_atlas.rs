//! Texture atlas image handling.
//!
//! The atlas is a single image cut into equally sized tiles. Meshing only
//! needs the number of tiles per row; the pixel data is kept for whoever
//! uploads the texture.

use std::path::Path;

use log::debug;
use thiserror::Error;

/// Errors raised while loading an atlas.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// The image could not be read or decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// The tile size is zero or larger than the image.
    #[error("tile size {stride}x{pitch} does not fit an image of {width}x{height}")]
    InvalidTileSize {
        /// Tile width in pixels
        stride: u32,
        /// Tile height in pixels
        pitch: u32,
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },
    /// The pixel buffer is shorter than the image size implies.
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    TruncatedPixels {
        /// Bytes required by the geometry
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
}

/// Size of the atlas image and of its tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasGeometry {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Tile width in pixels
    pub tile_stride: u32,
    /// Tile height in pixels
    pub tile_pitch: u32,
    /// Bytes per pixel
    pub channels: u8,
}

impl AtlasGeometry {
    /// Validates and builds a geometry.
    ///
    /// # Errors
    /// [`AtlasError::InvalidTileSize`] if a tile dimension is zero or exceeds the image.
    pub fn new(
        width: u32,
        height: u32,
        tile_stride: u32,
        tile_pitch: u32,
        channels: u8,
    ) -> Result<Self, AtlasError> {
        if tile_stride == 0 || tile_pitch == 0 || tile_stride > width || tile_pitch > height {
            return Err(AtlasError::InvalidTileSize {
                stride: tile_stride,
                pitch: tile_pitch,
                width,
                height,
            });
        }

        Ok(AtlasGeometry {
            width,
            height,
            tile_stride,
            tile_pitch,
            channels,
        })
    }

    /// Number of tile columns.
    pub fn tiles_per_row(&self) -> u32 {
        self.width / self.tile_stride
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.height / self.tile_pitch
    }

    /// Bytes in one row of the image.
    fn row_bytes(&self) -> usize {
        self.width as usize * self.channels as usize
    }
}

/// A decoded atlas image.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    geometry: AtlasGeometry,
    pixels: Vec<u8>,
}

impl TextureAtlas {
    /// Loads and decodes an atlas image from disk.
    ///
    /// # Errors
    /// Fails if the file cannot be decoded or the tile size does not fit.
    pub fn open<P: AsRef<Path>>(
        path: P,
        tile_stride: u32,
        tile_pitch: u32,
    ) -> Result<Self, AtlasError> {
        let image = image::open(path.as_ref())?;
        let geometry = AtlasGeometry::new(
            image.width(),
            image.height(),
            tile_stride,
            tile_pitch,
            image.color().channel_count(),
        )?;
        debug!(
            "Loaded atlas {:?}: {}x{} tiles",
            path.as_ref(),
            geometry.tiles_per_row(),
            geometry.rows()
        );

        Ok(TextureAtlas {
            geometry,
            pixels: image.into_bytes(),
        })
    }

    /// Wraps already decoded pixel data.
    ///
    /// # Errors
    /// Fails if `pixels` is shorter than `geometry` requires.
    pub fn from_raw(geometry: AtlasGeometry, pixels: Vec<u8>) -> Result<Self, AtlasError> {
        let expected = geometry.row_bytes() * geometry.height as usize;
        if pixels.len() < expected {
            return Err(AtlasError::TruncatedPixels {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(TextureAtlas { geometry, pixels })
    }

    /// The atlas geometry.
    pub fn geometry(&self) -> &AtlasGeometry {
        &self.geometry
    }

    /// The whole image, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copies out the pixels of tile `id`, counting row-major from the top-left tile.
    ///
    /// # Returns
    /// `None` if `id` is past the last tile.
    pub fn tile(&self, id: u32) -> Option<Vec<u8>> {
        let geometry = &self.geometry;
        let columns = geometry.tiles_per_row();
        if id >= columns * geometry.rows() {
            return None;
        }

        let channels = geometry.channels as usize;
        let tile_row_bytes = geometry.tile_stride as usize * channels;
        let x_offset = (id % columns) as usize * tile_row_bytes;
        let y_offset = (id / columns) as usize * geometry.tile_pitch as usize;

        let mut tile = Vec::with_capacity(tile_row_bytes * geometry.tile_pitch as usize);
        for y in y_offset..y_offset + geometry.tile_pitch as usize {
            let start = y * geometry.row_bytes() + x_offset;
            tile.extend_from_slice(&self.pixels[start..start + tile_row_bytes]);
        }

        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 4x2 single-channel image cut into 2x1 tiles, each pixel holding its own index.
    fn small_atlas() -> TextureAtlas {
        let geometry = AtlasGeometry::new(4, 2, 2, 1, 1).unwrap();
        TextureAtlas::from_raw(geometry, (0..8).collect()).unwrap()
    }

    #[test]
    fn tiles_are_cut_row_major() {
        let atlas = small_atlas();
        assert_eq!(atlas.geometry().tiles_per_row(), 2);
        assert_eq!(atlas.tile(0), Some(vec![0, 1]));
        assert_eq!(atlas.tile(1), Some(vec![2, 3]));
        assert_eq!(atlas.tile(2), Some(vec![4, 5]));
        assert_eq!(atlas.tile(4), None);
    }

    #[test]
    fn multi_channel_tiles_keep_whole_pixels() {
        let geometry = AtlasGeometry::new(2, 2, 1, 2, 3).unwrap();
        let atlas = TextureAtlas::from_raw(geometry, (0..12).collect()).unwrap();
        assert_eq!(atlas.tile(1), Some(vec![3, 4, 5, 9, 10, 11]));
    }

    #[test]
    fn opens_png_from_disk() {
        let name = format!("voxel-terrain-atlas-{}.png", std::process::id());
        let path = std::env::temp_dir().join(name);
        let image =
            image::RgbaImage::from_fn(64, 32, |x, y| image::Rgba([x as u8, y as u8, 0, 255]));
        image.save(&path).unwrap();

        let atlas = TextureAtlas::open(&path, 16, 16);
        std::fs::remove_file(&path).unwrap();
        let atlas = atlas.unwrap();

        let geometry = atlas.geometry();
        assert_eq!((geometry.tiles_per_row(), geometry.rows()), (4, 2));
        assert_eq!(geometry.channels, 4);
        assert_eq!(atlas.pixels().len(), 64 * 32 * 4);

        // Tile 5 starts at pixel (16, 16).
        let tile = atlas.tile(5).unwrap();
        assert_eq!(tile.len(), 16 * 16 * 4);
        assert_eq!(&tile[..4], &[16, 16, 0, 255]);
        assert_eq!(atlas.tile(8), None);
    }

    #[test]
    fn missing_image_is_an_image_error() {
        assert!(matches!(
            TextureAtlas::open("/nonexistent/atlas.png", 16, 16),
            Err(AtlasError::Image(_))
        ));
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(matches!(
            AtlasGeometry::new(16, 16, 0, 16, 4),
            Err(AtlasError::InvalidTileSize { .. })
        ));
        assert!(matches!(
            AtlasGeometry::new(16, 16, 32, 16, 4),
            Err(AtlasError::InvalidTileSize { .. })
        ));

        let geometry = AtlasGeometry::new(4, 4, 2, 2, 4).unwrap();
        assert!(matches!(
            TextureAtlas::from_raw(geometry, vec![0; 10]),
            Err(AtlasError::TruncatedPixels { expected: 64, actual: 10 })
        ));
    }
}
