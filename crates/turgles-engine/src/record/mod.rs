//! Typed turtle records.
//!
//! Each record is `#[repr(C)]` + `bytemuck::Pod` and has exactly the float
//! layout of one chunk, so a chunk can be reinterpreted in place without
//! copying. Sizes follow the shader's per-instance uniform slots: the model
//! record fills a 4x4 matrix slot, the color record a 3x3 one.

mod color;
mod model;

pub use color::{TurtleColor, COLOR_CHUNK_SIZE};
pub use model::{TurtleModel, MODEL_CHUNK_SIZE};
