//! Vertex data structures and layouts for block rendering.
//!
//! This module defines the vertex format emitted by the mesh builder and the
//! matching vertex buffer layout handed to the GPU pipeline.

use cgmath::{Point3, Vector2};

/// Number of `f32`s that make up one vertex in a block's vertex data.
pub const FLOATS_PER_VERTEX: usize = 5;

/// Byte distance between two consecutive vertices.
pub const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

/// Byte offset of the texture coordinates inside a vertex.
pub const TEX_COORDS_OFFSET: u64 = (3 * std::mem::size_of::<f32>()) as u64;

/// A vertex in the block rendering pipeline.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockVertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Atlas texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl BlockVertex {
    /// Creates a new vertex from a world position and atlas coordinates.
    pub fn new(position: Point3<f32>, tex_coords: Vector2<f32>) -> Self {
        BlockVertex {
            position: position.into(),
            tex_coords: tex_coords.into(),
        }
    }

    /// Reinterprets flat vertex data as vertices.
    ///
    /// # Panics
    /// Panics if `data.len()` is not a multiple of [`FLOATS_PER_VERTEX`].
    pub fn slice_from_floats(data: &[f32]) -> &[BlockVertex] {
        bytemuck::cast_slice(data)
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>) at offset 0
    /// - `location = 1`: tex_coords (vec2<f32>) at offset 12
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: TEX_COORDS_OFFSET as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_flat_vertex_data() {
        assert_eq!(std::mem::size_of::<BlockVertex>() as u64, VERTEX_STRIDE);
        assert_eq!(VERTEX_STRIDE, 20);

        let layout = BlockVertex::desc();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn floats_reinterpret_as_vertices() {
        let data = [1.0, 2.0, 3.0, 0.25, 0.5, 4.0, 5.0, 6.0, 0.75, 1.0];
        let vertices = BlockVertex::slice_from_floats(&data);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [4.0, 5.0, 6.0]);
        assert_eq!(vertices[1].tex_coords, [0.75, 1.0]);
    }
}
