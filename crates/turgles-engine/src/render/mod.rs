//! GPU upload of turtle buffers.
//!
//! The buffer layer already keeps each shape's records as a packed instance
//! array; this module only mirrors those arrays into wgpu vertex buffers and
//! describes their per-instance layouts. Pipelines, shaders and draw calls
//! belong to the caller.

mod instance;
mod upload;

pub use upload::{instance_capacity, upload_len, InstanceUploader, ShapeInstances};
