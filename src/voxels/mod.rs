//! # Voxel Core
//!
//! This module contains the voxel side of the crate: what a block is, how a
//! chunk stores its blocks, and how terrain is generated for a chunk.
//!
//! ## Architecture
//!
//! * **Block**: block types, the six block faces and the meshed block
//! * **Chunk**: a cubic grid of blocks plus the flattened render index
//! * **Generation**: noise field, padded height grid and the chunk generator
//!
//! ## Data Flow
//!
//! 1. The chunk generator samples the noise field over a padded column grid
//! 2. Block types and visible faces are derived from the column heights
//! 3. Every block goes through the mesh builder in `rendering::meshing`
//! 4. The meshed blocks are assembled into a `Chunk`
//!
//! ## Thread Safety
//!
//! Generation up to step 3 is pure and may run on worker threads. Only the
//! upload of vertex data touches the GPU and has to stay on one thread.
//! Finished chunks are immutable.

pub mod block;
pub mod chunk;
pub mod generation;
