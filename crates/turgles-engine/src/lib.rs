//! Turgles engine crate.
//!
//! Keeps per-shape turtle attributes in packed `f32` arrays that can be
//! mutated in place and handed to the GPU as instance buffers in one write.

pub mod buffer;
pub mod logging;
pub mod record;
pub mod render;

pub use buffer::{BufferConfig, BufferError, BufferManager, TurtleId};
pub use record::{TurtleColor, TurtleModel};
