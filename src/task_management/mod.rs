//! # Task Management System
//!
//! A pool of worker threads that runs [`Task`]s off the thread owning the GPU
//! uploader.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: distributes tasks to workers and collects their results
//! - `Task`: a unit of work executed on a worker
//! - `TaskResult`: the outcome of a task, handled on the owning thread
//! - `TaskChannel`: the pair of channels connecting the manager to one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to workers round-robin, queueing when all are busy
//! 3. Workers call `Task::process` and send the result back
//! 4. `process_completed_tasks()` handles results with the uploader and
//!    returns the finished chunks
//! 5. Results can publish follow-up tasks
//!
//! ## Example Usage
//! ```no_run
//! use cgmath::Point3;
//! use voxel_terrain::{
//!     config::GeneratorConfig,
//!     rendering::upload::HostUploader,
//!     task_management::{chunk_generation_task::ChunkGenerationTask, TaskManager},
//!     voxels::{block::block_face::FaceMask, generation::ChunkGenerator},
//! };
//!
//! let config = GeneratorConfig::default();
//! let generator = ChunkGenerator::from_config(&config).unwrap().shared();
//! let mut uploader = HostUploader::new();
//! let mut task_manager = TaskManager::new(config.workers);
//!
//! task_manager.publish_task(Box::new(ChunkGenerationTask::new(
//!     generator.clone(),
//!     Point3::new(0, 0, 0),
//!     FaceMask::ALL,
//! )));
//!
//! // Once per frame:
//! let chunks = task_manager.process_completed_tasks(&mut uploader);
//! task_manager.process_queued_tasks();
//! ```

pub mod chunk_generation_task;
pub mod task;

use std::{
    collections::VecDeque,
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, error, info};
use task::{Task, TaskOutput, TaskResult};

use crate::{rendering::upload::GpuUploader, voxels::chunk::Chunk};

/// A communication channel between the owning thread and one worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tasks sent but not yet collected
/// - `worker`: Handle to the worker thread, joined on drop
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: One channel per worker
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with `num_workers` worker threads.
    ///
    /// With zero workers every task is queued and only runs when
    /// [`TaskManager::wait_for_all`] processes it on the calling thread.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("chunk-worker-{}", index))
                .spawn(task_closure);

            match worker {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    worker: Some(worker),
                }),
                Err(err) => error!("Failed to spawn worker {}: {}", index, err),
            }
        }

        info!(
            "Started {} workers (available parallelism: {:?})",
            channels.len(),
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of running workers.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Tasks sent to workers whose results have not been collected.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Tasks waiting for a worker.
    pub fn queued_tasks(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Returns `true` when nothing is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was sent
    /// - `Err(task)` if the worker has disconnected
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds a worker channel that can accept a new task, round-robin from
    /// the last used channel.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was handed to a worker
    /// - `false` if it was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to workers until the queue is empty or every worker
    /// is busy. Tasks are sent oldest first.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };

            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Disconnected worker: keep the task and stop for now.
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles every result that has arrived, without blocking.
    ///
    /// Must be called on the thread owning `uploader`. Follow-up tasks are
    /// published before returning.
    ///
    /// # Returns
    /// The chunks finished by the handled results.
    pub fn process_completed_tasks(&mut self, uploader: &mut dyn GpuUploader) -> Vec<Chunk> {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }

        self.handle_results(results, uploader)
    }

    /// Runs every published task to completion, blocking until done.
    ///
    /// Without workers the queued tasks are processed on the calling thread.
    ///
    /// # Returns
    /// All chunks finished along the way.
    pub fn wait_for_all(&mut self, uploader: &mut dyn GpuUploader) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        loop {
            self.process_queued_tasks();
            chunks.extend(self.process_completed_tasks(uploader));

            if self.is_idle() {
                break;
            }

            let Some(channel) = self
                .channels
                .iter_mut()
                .find(|channel| channel.num_tasks_in_flight > 0)
            else {
                // No worker can take the queue; finish it on this thread.
                let results = self
                    .queued_tasks
                    .drain(..)
                    .map(|task| task.process())
                    .collect();
                chunks.extend(self.handle_results(results, uploader));
                continue;
            };

            match channel.result_receiver.recv() {
                Ok(result) => {
                    channel.num_tasks_in_flight -= 1;
                    chunks.extend(self.handle_results(vec![result], uploader));
                }
                Err(_) => {
                    error!(
                        "Worker disconnected with {} tasks in flight",
                        channel.num_tasks_in_flight
                    );
                    channel.num_tasks_in_flight = 0;
                }
            }
        }

        debug!("All tasks finished: {} chunks", chunks.len());
        chunks
    }

    fn handle_results(
        &mut self,
        results: Vec<Box<dyn TaskResult + Send>>,
        uploader: &mut dyn GpuUploader,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut tasks_to_queue = Vec::new();

        for result in results {
            let TaskOutput { tasks, chunks: finished } = result.handle_result(uploader);
            tasks_to_queue.extend(tasks);
            chunks.extend(finished);
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        chunks
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                result_receiver,
                worker,
                ..
            } = channel;
            drop(task_sender);
            drop(result_receiver);
            if let Some(worker) = worker {
                if worker.join().is_err() {
                    error!("Worker thread panicked");
                }
            }
        }
    }
}
