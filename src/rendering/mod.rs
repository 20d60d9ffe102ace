//! Rendering-side building blocks.
//!
//! Nothing in here draws. This module turns blocks into vertex data, resolves
//! atlas texture coordinates and defines the boundary to the GPU.

pub mod atlas;
pub mod meshing;
pub mod texture_atlas;
pub mod upload;
pub mod vertex;

// Re-export commonly used types
pub use vertex::{BlockVertex, FLOATS_PER_VERTEX};
