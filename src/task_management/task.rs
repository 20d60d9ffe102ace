//! # Task System Core Traits
//!
//! A [`Task`] runs on a worker thread and returns a boxed [`TaskResult`].
//! The result travels back to the thread owning the [`TaskManager`] and is
//! handled there, with access to the GPU uploader.
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved to a worker
//! - `TaskResult` must be `Send` to be moved back
//! - Nothing handed to `handle_result` ever leaves the owning thread
//!
//! [`TaskManager`]: super::TaskManager

use crate::{rendering::upload::GpuUploader, voxels::chunk::Chunk};

/// A unit of work executed on a worker thread.
///
/// Tasks own everything they need. Shared read-only state, such as the chunk
/// generator, is held through an `Arc`.
pub trait Task: Send {
    /// Does the work and returns a result to be handled on the owning thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// What a handled result hands back to the task manager.
pub struct TaskOutput {
    /// Follow-up tasks to publish
    pub tasks: Vec<Box<dyn Task + Send>>,
    /// Chunks that are ready for use
    pub chunks: Vec<Chunk>,
}

impl TaskOutput {
    /// Output carrying finished chunks and nothing else.
    pub fn chunks(chunks: Vec<Chunk>) -> Self {
        TaskOutput {
            tasks: Vec::new(),
            chunks,
        }
    }
}

/// The result of a [`Task`], handled on the thread owning the uploader.
pub trait TaskResult: Send {
    /// Finishes the work that needs the uploader.
    ///
    /// # Arguments
    /// * `uploader` - The GPU uploader, only ever used from this thread
    fn handle_result(self: Box<Self>, uploader: &mut dyn GpuUploader) -> TaskOutput;
}
