//! Per-block mesh construction.
//!
//! [`BlockMeshBuilder::mesh`] is pure and may run on any thread.
//! [`BlockMesh::upload`] hands the result to a [`GpuUploader`] and must run on
//! the thread that owns it. [`BlockMeshBuilder::build`] does both.

use cgmath::{Matrix4, Point3, Transform, Vector2};
use log::trace;

use crate::{
    rendering::{
        atlas::{UvAtlasResolver, UV_PAD},
        upload::GpuUploader,
        vertex::{BlockVertex, FLOATS_PER_VERTEX},
    },
    voxels::block::{block_face::FaceMask, block_type::BlockType, Block},
};

use super::face_table::{face_vertices, CUBE_CORNERS};

/// Vertices emitted for every visible face: two triangles, no index buffer.
pub const VERTICES_PER_FACE: usize = 6;

/// Vertex data for one block, not yet uploaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockMesh {
    /// Block type, [`BlockType::AIR`] when nothing is drawn
    pub block_type: BlockType,
    /// Faces present in `vertices`
    pub faces: FaceMask,
    /// Interleaved x, y, z, u, v
    pub vertices: Vec<f32>,
}

impl BlockMesh {
    /// Returns `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Uploads the vertex data and produces the finished block.
    ///
    /// Empty meshes become air blocks without touching the uploader.
    pub fn upload(self, uploader: &mut dyn GpuUploader) -> Block {
        if self.is_empty() {
            return Block::air();
        }

        let buffers = uploader.create_buffer(&self.vertices);
        Block::meshed(self.block_type, self.faces, self.vertices, buffers)
    }
}

/// Builds textured cube geometry for single blocks.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BlockMeshBuilder {
    atlas: UvAtlasResolver,
}

impl BlockMeshBuilder {
    /// Creates a builder texturing blocks from `atlas`.
    pub fn new(atlas: UvAtlasResolver) -> Self {
        BlockMeshBuilder { atlas }
    }

    /// The atlas resolver in use.
    pub fn atlas(&self) -> &UvAtlasResolver {
        &self.atlas
    }

    /// Emits the vertex data for one block.
    ///
    /// # Arguments
    /// * `block_type` - The block to draw
    /// * `transform` - Places the unit cube (centred on the origin) in the world
    /// * `faces` - Which faces to emit
    ///
    /// # Returns
    /// An empty air mesh when `block_type` is air or `faces` is empty,
    /// otherwise six vertices per face in mask-bit order.
    pub fn mesh(
        &self,
        block_type: BlockType,
        transform: &Matrix4<f32>,
        faces: FaceMask,
    ) -> BlockMesh {
        if block_type.is_air() || faces.is_empty() {
            return BlockMesh::default();
        }

        let corners: [Point3<f32>; 8] =
            CUBE_CORNERS.map(|corner| transform.transform_point(Point3::from(corner)));

        let uvs = self.atlas.resolve_or_origin(block_type);
        let far_edge = self.atlas.tile_size() - UV_PAD;

        let mut vertices =
            Vec::with_capacity(faces.count() as usize * VERTICES_PER_FACE * FLOATS_PER_VERTEX);

        for face in faces.faces() {
            let origin = uvs.for_face(face);
            for (corner, uv_corner) in face_vertices(face) {
                let (u_far, v_far) = uv_corner.is_far();
                let offset = Vector2::new(
                    if u_far { far_edge } else { UV_PAD },
                    if v_far { far_edge } else { UV_PAD },
                );
                let vertex = BlockVertex::new(corners[*corner], origin + offset);
                vertices.extend_from_slice(bytemuck::cast_slice(&[vertex]));
            }
        }

        trace!(
            "Meshed {:?} with faces {:?}: {} vertices",
            block_type,
            faces,
            vertices.len() / FLOATS_PER_VERTEX
        );

        BlockMesh {
            block_type,
            faces,
            vertices,
        }
    }

    /// Meshes one block and uploads it.
    ///
    /// Air blocks and empty masks return [`Block::air`] without allocating
    /// anything on the GPU.
    pub fn build(
        &self,
        block_type: BlockType,
        transform: &Matrix4<f32>,
        faces: FaceMask,
        uploader: &mut dyn GpuUploader,
    ) -> Block {
        self.mesh(block_type, transform, faces).upload(uploader)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{SquareMatrix, Vector3};

    use super::*;
    use crate::{
        rendering::upload::HostUploader,
        voxels::block::block_face::BlockFace,
    };

    fn builder() -> BlockMeshBuilder {
        BlockMeshBuilder::new(UvAtlasResolver::new(16))
    }

    #[test]
    fn six_vertices_per_visible_face() {
        let builder = builder();
        let identity = Matrix4::identity();

        for bits in 1..=u8::MAX {
            let faces = FaceMask::from_bits_truncate(bits);
            let mesh = builder.mesh(BlockType::GRASS, &identity, faces);
            assert_eq!(mesh.vertex_count(), 6 * faces.count() as usize, "mask {:#b}", bits);
            assert_eq!(mesh.vertices.len() % FLOATS_PER_VERTEX, 0);
        }
    }

    #[test]
    fn undefined_mask_bits_add_nothing() {
        let builder = builder();
        let mesh = builder.mesh(
            BlockType::DIRT,
            &Matrix4::identity(),
            FaceMask::from_bits_truncate(0b1110_0001),
        );
        assert_eq!(mesh.faces, FaceMask::TOP | FaceMask::RIGHT);
        assert_eq!(mesh.vertex_count(), 12);
    }

    #[test]
    fn air_and_empty_masks_skip_the_gpu() {
        let builder = builder();
        let mut uploader = HostUploader::new();
        let identity = Matrix4::identity();

        let air = builder.build(BlockType::AIR, &identity, FaceMask::ALL, &mut uploader);
        let hidden = builder.build(BlockType::GRASS, &identity, FaceMask::NONE, &mut uploader);

        for block in [&air, &hidden] {
            assert_eq!(block.block_type(), BlockType::AIR);
            assert!(block.vertex_data().is_empty());
            assert!(block.buffers().is_none());
        }
        assert_eq!(uploader.total_allocations(), 0);
    }

    #[test]
    fn visible_block_allocates_one_buffer_pair() {
        let builder = builder();
        let mut uploader = HostUploader::new();

        let block = builder.build(
            BlockType::GRASS,
            &Matrix4::identity(),
            FaceMask::TOP | FaceMask::BOTTOM,
            &mut uploader,
        );

        let buffers = block.buffers().unwrap();
        assert_eq!(uploader.total_allocations(), 1);
        assert_eq!(uploader.vertices(buffers), Some(block.vertex_data()));
        assert_eq!(block.vertex_count(), 12);
        assert_eq!(block.visible_faces(), FaceMask::TOP | FaceMask::BOTTOM);
    }

    #[test]
    fn transform_places_the_cube() {
        let builder = builder();
        let transform = Matrix4::from_translation(Vector3::new(-8.0, 3.0, 5.0));
        let mesh = builder.mesh(BlockType::DIRT, &transform, FaceMask::ALL);

        for vertex in BlockVertex::slice_from_floats(&mesh.vertices) {
            let [x, y, z] = vertex.position;
            assert!((-8.5..=-7.5).contains(&x));
            assert!((2.5..=3.5).contains(&y));
            assert!((4.5..=5.5).contains(&z));
        }
    }

    #[test]
    fn faces_sample_their_own_inset_tile() {
        let builder = builder();
        let tile = builder.atlas().tile_size();
        let uvs = builder.atlas().resolve(BlockType::GRASS).unwrap();

        for face in BlockFace::all() {
            let mesh = builder.mesh(BlockType::GRASS, &Matrix4::identity(), face.into());
            let origin = uvs.for_face(face);
            for vertex in BlockVertex::slice_from_floats(&mesh.vertices) {
                let [u, v] = vertex.tex_coords;
                let inset = 1e-6;
                assert!(u >= origin.x + UV_PAD - inset && u <= origin.x + tile - UV_PAD + inset);
                assert!(v >= origin.y + UV_PAD - inset && v <= origin.y + tile - UV_PAD + inset);
            }
        }
    }

    #[test]
    fn vertices_are_laid_out_as_block_vertices() {
        let builder = builder();
        let mesh = builder.mesh(BlockType::GRASS, &Matrix4::identity(), FaceMask::TOP);
        let first = BlockVertex::new(Point3::new(0.5, -0.5, 0.5), Vector2::new(UV_PAD, UV_PAD));

        let expected = [first];
        let floats: &[f32] = bytemuck::cast_slice(&expected);
        assert_eq!(&mesh.vertices[..FLOATS_PER_VERTEX], floats);
        assert_eq!(BlockVertex::slice_from_floats(&mesh.vertices)[0], first);
    }

    #[test]
    fn untextured_blocks_use_the_origin_tile() {
        let builder = builder();
        let mesh = builder.mesh(BlockType::STONE, &Matrix4::identity(), FaceMask::TOP);
        let vertices = BlockVertex::slice_from_floats(&mesh.vertices);

        assert_eq!(vertices[0].tex_coords, [UV_PAD, UV_PAD]);
        assert!(vertices
            .iter()
            .all(|vertex| vertex.tex_coords.iter().all(|c| *c < builder.atlas().tile_size())));
    }
}
