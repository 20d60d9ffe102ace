//! # GPU Upload Module
//!
//! The mesh builder never talks to a graphics API directly. It hands finished
//! vertex data to a [`GpuUploader`], which allocates one vertex array and one
//! vertex buffer per block and returns opaque handles for them.
//!
//! Two uploaders are provided:
//! * [`WgpuUploader`] creates real `wgpu` vertex buffers (static, `VERTEX` usage)
//! * [`HostUploader`] keeps the vertex data in host memory, for headless runs
//!   and tests
//!
//! ## Thread Safety
//!
//! Graphics contexts are not reentrant across threads, so an uploader is only
//! ever used from the thread that owns it. Everything that produces vertex
//! data can run elsewhere.

use std::collections::HashMap;

use log::{debug, info};
use thiserror::Error;
use wgpu::util::DeviceExt;

use super::vertex::FLOATS_PER_VERTEX;

/// Opaque handles for the GPU resources backing one block.
///
/// `vao` names the vertex array (buffer plus attribute layout) used for
/// drawing, `vbo` the vertex buffer holding the data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandles {
    /// Vertex array handle
    pub vao: u32,
    /// Vertex buffer handle
    pub vbo: u32,
}

/// Errors raised while setting up a GPU backend.
#[derive(Error, Debug)]
pub enum UploadError {
    /// No adapter matched the request.
    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(String),
    /// The adapter refused to create a device.
    #[error("failed to create GPU device: {0}")]
    Device(String),
}

/// The boundary between meshing and the graphics API.
///
/// Implementations must configure two vertex attributes for every buffer:
/// position (3 floats at offset 0) and texture coordinates (2 floats at
/// offset 12), with a 20 byte stride and static-draw usage.
pub trait GpuUploader {
    /// Uploads interleaved vertex data and returns the handles owning it.
    fn create_buffer(&mut self, vertices: &[f32]) -> BufferHandles;

    /// Frees the resources behind `handles`. Unknown handles are ignored.
    fn destroy_buffer(&mut self, handles: BufferHandles);
}

/// A vertex buffer kept in host memory.
#[derive(Debug)]
struct HostBuffer {
    vao: u32,
    vertices: Vec<f32>,
}

/// An uploader that keeps vertex data on the host.
///
/// Handles are allocated from a counter starting at 1 so that 0 is never a
/// valid handle, matching what OpenGL-style APIs hand out.
#[derive(Debug, Default)]
pub struct HostUploader {
    next_handle: u32,
    buffers: HashMap<u32, HostBuffer>,
    total_allocations: usize,
}

impl HostUploader {
    /// Creates an uploader with no buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffers currently alive.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of buffers ever created, including destroyed ones.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    /// The vertex data stored under `handles`, if still alive.
    pub fn vertices(&self, handles: BufferHandles) -> Option<&[f32]> {
        self.buffers
            .get(&handles.vbo)
            .filter(|buffer| buffer.vao == handles.vao)
            .map(|buffer| buffer.vertices.as_slice())
    }

    fn allocate_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GpuUploader for HostUploader {
    fn create_buffer(&mut self, vertices: &[f32]) -> BufferHandles {
        let handles = BufferHandles {
            vao: self.allocate_handle(),
            vbo: self.allocate_handle(),
        };
        self.buffers.insert(
            handles.vbo,
            HostBuffer {
                vao: handles.vao,
                vertices: vertices.to_vec(),
            },
        );
        self.total_allocations += 1;
        handles
    }

    fn destroy_buffer(&mut self, handles: BufferHandles) {
        if self
            .buffers
            .get(&handles.vbo)
            .is_some_and(|buffer| buffer.vao == handles.vao)
        {
            self.buffers.remove(&handles.vbo);
        }
    }
}

/// A vertex array: which buffer to bind and how many vertices it holds.
///
/// `wgpu` has no vertex array objects; the attribute layout is the same for
/// every block and lives in [`BlockVertex::desc`](super::vertex::BlockVertex::desc).
#[derive(Debug, Copy, Clone)]
pub struct VertexArray {
    /// Vertex buffer bound by this array
    pub vbo: u32,
    /// Number of vertices to draw
    pub vertex_count: u32,
}

/// An uploader backed by a `wgpu` device.
pub struct WgpuUploader {
    device: wgpu::Device,
    next_handle: u32,
    arrays: HashMap<u32, VertexArray>,
    buffers: HashMap<u32, wgpu::Buffer>,
    /// Bytes currently held in vertex buffers
    allocated_memory: u64,
}

impl WgpuUploader {
    /// Wraps an existing device.
    pub fn new(device: wgpu::Device) -> Self {
        WgpuUploader {
            device,
            next_handle: 0,
            arrays: HashMap::new(),
            buffers: HashMap::new(),
            allocated_memory: 0,
        }
    }

    /// Requests a device without a surface, for offline generation.
    ///
    /// # Errors
    /// Fails when no adapter is available or the device request is refused.
    pub fn request_headless() -> Result<Self, UploadError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::empty(),
            backend_options: wgpu::BackendOptions::from_env_or_default(),
        });

        pollster::block_on(async move {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .map_err(|err| UploadError::NoAdapter(err.to_string()))?;

            info!("Using adapter {:?}", adapter.get_info().name);

            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    label: Some("Chunk Upload Device"),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                    trace: wgpu::Trace::Off,
                })
                .await
                .map_err(|err| UploadError::Device(err.to_string()))?;

            Ok(WgpuUploader::new(device))
        })
    }

    /// Looks up the buffer behind a `vbo` handle.
    pub fn buffer(&self, vbo: u32) -> Option<&wgpu::Buffer> {
        self.buffers.get(&vbo)
    }

    /// Looks up the vertex array behind a `vao` handle.
    pub fn vertex_array(&self, vao: u32) -> Option<VertexArray> {
        self.arrays.get(&vao).copied()
    }

    /// Bytes currently held in vertex buffers.
    pub fn allocated_memory(&self) -> u64 {
        self.allocated_memory
    }

    fn allocate_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GpuUploader for WgpuUploader {
    fn create_buffer(&mut self, vertices: &[f32]) -> BufferHandles {
        let handles = BufferHandles {
            vao: self.allocate_handle(),
            vbo: self.allocate_handle(),
        };

        let contents: &[u8] = bytemuck::cast_slice(vertices);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Block Vertex Buffer"),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            });

        self.allocated_memory += buffer.size();
        self.buffers.insert(handles.vbo, buffer);
        self.arrays.insert(
            handles.vao,
            VertexArray {
                vbo: handles.vbo,
                vertex_count: (vertices.len() / FLOATS_PER_VERTEX) as u32,
            },
        );

        handles
    }

    fn destroy_buffer(&mut self, handles: BufferHandles) {
        self.arrays.remove(&handles.vao);
        if let Some(buffer) = self.buffers.remove(&handles.vbo) {
            self.allocated_memory = self.allocated_memory.saturating_sub(buffer.size());
            buffer.destroy();
        } else {
            debug!("Ignoring release of unknown buffer {:?}", handles);
        }
    }
}
