//! Turtle data buffers.
//!
//! Responsibilities:
//! - keep each shape's turtle records in flat, gap-free `f32` arrays
//! - keep a turtle's model and color records at the same index
//! - map stable [`TurtleId`]s to the indices compaction moves around
//!
//! Layering, leaves first: [`ChunkBuffer`] -> [`ShapeBuffer`] -> [`BufferManager`].

mod chunk;
mod config;
mod error;
mod id;
mod manager;
mod shape;

pub use chunk::ChunkBuffer;
pub use config::BufferConfig;
pub use error::{BufferError, Result};
pub use id::{IdAllocator, TurtleId};
pub use manager::BufferManager;
pub use shape::{ShapeBuffer, TurtleData, TurtleDataMut};
