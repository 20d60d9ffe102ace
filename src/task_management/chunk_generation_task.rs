//! # Chunk Generation Task
//!
//! Plans a chunk on a worker thread and uploads it when the result is handled.

use std::sync::Arc;

use cgmath::Point3;
use log::trace;

use crate::{
    rendering::upload::GpuUploader,
    voxels::{
        block::block_face::FaceMask,
        generation::{ChunkGenerator, ChunkPlan, HeightSource},
    },
};

use super::task::{Task, TaskOutput, TaskResult};

/// Generates the chunk at one location.
pub struct ChunkGenerationTask<H> {
    /// The generator shared by all tasks
    generator: Arc<ChunkGenerator<H>>,
    /// Chunk coordinates to generate
    location: Point3<i32>,
    /// Chunk faces bordering empty space
    faces: FaceMask,
}

impl<H> ChunkGenerationTask<H> {
    /// Creates a task for the chunk at `location`.
    pub fn new(generator: Arc<ChunkGenerator<H>>, location: Point3<i32>, faces: FaceMask) -> Self {
        ChunkGenerationTask {
            generator,
            location,
            faces,
        }
    }
}

impl<H: HeightSource> Task for ChunkGenerationTask<H> {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        trace!("Planning chunk {:?} on {:?}", self.location, std::thread::current().id());
        Box::new(ChunkGenerationTaskResult {
            plan: self.generator.plan(self.location, self.faces),
        })
    }
}

/// A planned chunk waiting for upload.
pub struct ChunkGenerationTaskResult {
    plan: ChunkPlan,
}

impl TaskResult for ChunkGenerationTaskResult {
    fn handle_result(self: Box<Self>, uploader: &mut dyn GpuUploader) -> TaskOutput {
        TaskOutput::chunks(vec![self.plan.upload(uploader)])
    }
}
