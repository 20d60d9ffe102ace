//! End-to-end generation through the public API.

use cgmath::Point3;
use voxel_terrain::{
    config::GeneratorConfig,
    rendering::{
        atlas::UvAtlasResolver,
        meshing::BlockMeshBuilder,
        upload::{GpuUploader, HostUploader},
        vertex::BlockVertex,
    },
    task_management::{chunk_generation_task::ChunkGenerationTask, TaskManager},
    voxels::{
        block::{block_face::FaceMask, block_type::BlockType},
        generation::{ChunkGenerator, GenerationError, HeightGrid, NoiseField},
    },
};

fn flat(height: i32) -> impl Fn(i64, i64) -> i32 + Send + Sync + 'static {
    move |_, _| height
}

#[test]
fn flat_chunk_has_one_textured_slab() {
    let generator = ChunkGenerator::new(4, flat(2), BlockMeshBuilder::default()).unwrap();
    let mut uploader = HostUploader::new();
    let chunk = generator.generate(Point3::new(0, 0, 0), FaceMask::ALL, &mut uploader);

    assert_eq!(chunk.blocks().len(), 64);
    assert_eq!(chunk.vertex_count(), 192);
    assert_eq!(uploader.live_buffers(), 16);

    let tile = UvAtlasResolver::default().tile_size();
    for entry in chunk.render_index().draw_list() {
        assert_eq!(entry.position.z, 2);
        let block = &chunk.blocks()[entry.index];
        assert_eq!(block.block_type(), BlockType::GRASS);
        assert_eq!(uploader.vertices(entry.buffers), Some(block.vertex_data()));

        // Grass draws its top from tile 0 and its bottom from tile 2.
        let vertices = BlockVertex::slice_from_floats(block.vertex_data());
        let (bottom, top) = vertices.split_at(6);
        assert!(bottom.iter().all(|v| v.tex_coords[0] > 2.0 * tile));
        assert!(top.iter().all(|v| v.tex_coords[0] < tile));
    }

    let released = chunk.release(&mut uploader);
    assert_eq!(released, 16);
    assert_eq!(uploader.live_buffers(), 0);
}

#[test]
fn config_drives_the_generator() {
    let config = GeneratorConfig::from_json_str(
        r#"{
            "chunk_size": 8,
            "noise": {
                "seed": 42, "octaves": 3, "persistence": 0.5,
                "min_height": 1, "max_height": 6
            },
            "atlas_tiles_per_row": 8,
            "workers": 2
        }"#,
    )
    .unwrap();
    let generator = ChunkGenerator::from_config(&config).unwrap();
    let field = NoiseField::new(42);

    let grid = generator.height_grid(Point3::new(-1, 2, 0));
    for y in -1..=8_isize {
        for x in -1..=8_isize {
            let height = grid.get(x, y);
            assert!((1..=6).contains(&height));
            assert_eq!(
                height,
                field.sample(8 + x as i64, 16 + y as i64, 0.5, 3, 0.05, 1, 6)
            );
        }
    }
}

#[test]
fn chunk_size_below_two_is_rejected() {
    let config = GeneratorConfig::from_json_str(r#"{ "chunk_size": 0 }"#).unwrap();
    assert_eq!(
        ChunkGenerator::from_config(&config).map(|_| ()),
        Err(GenerationError::ChunkTooSmall { chunk_size: 0 })
    );
}

#[test]
fn adjacent_chunks_agree_on_their_border() {
    let generator = ChunkGenerator::from_config(&GeneratorConfig::default()).unwrap();
    let size = generator.chunk_size() as isize;

    let here: HeightGrid = generator.height_grid(Point3::new(0, 0, 0));
    let north = generator.height_grid(Point3::new(0, 1, 0));
    for x in -1..=size {
        assert_eq!(here.get(x, size), north.get(x, 0));
        assert_eq!(north.get(x, -1), here.get(x, size - 1));
    }
}

#[test]
fn background_generation_fills_the_area() {
    let generator = ChunkGenerator::new(4, flat(0), BlockMeshBuilder::default())
        .unwrap()
        .shared();
    let mut uploader = HostUploader::new();
    let mut task_manager = TaskManager::new(4);

    for x in -1..=1 {
        for y in -1..=1 {
            task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                generator.clone(),
                Point3::new(x, y, 0),
                FaceMask::ALL,
            )));
        }
    }

    let chunks = task_manager.wait_for_all(&mut uploader);
    assert_eq!(chunks.len(), 9);
    assert!(chunks.iter().all(|chunk| chunk.vertex_count() == 16 * 12));

    let uploader: &mut dyn GpuUploader = &mut uploader;
    let released: usize = chunks.into_iter().map(|chunk| chunk.release(uploader)).sum();
    assert_eq!(released, 9 * 16);
}
