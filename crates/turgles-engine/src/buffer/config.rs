use crate::record::{COLOR_CHUNK_SIZE, MODEL_CHUNK_SIZE};

use super::error::{BufferError, Result};

/// Sizing parameters for a [`BufferManager`](super::BufferManager).
///
/// Chunk sizes are part of the contract with the shader layer and are fixed
/// for the manager's lifetime. The defaults match [`TurtleModel`] and
/// [`TurtleColor`], which the typed accessors require.
///
/// [`TurtleModel`]: crate::record::TurtleModel
/// [`TurtleColor`]: crate::record::TurtleColor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Turtles per shape before the first growth.
    pub initial_capacity: usize,

    /// Floats per model record.
    pub model_chunk_size: usize,

    /// Floats per color record.
    pub color_chunk_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            model_chunk_size: MODEL_CHUNK_SIZE,
            color_chunk_size: COLOR_CHUNK_SIZE,
        }
    }
}

impl BufferConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_chunk_sizes(mut self, model: usize, color: usize) -> Self {
        self.model_chunk_size = model;
        self.color_chunk_size = color;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(BufferError::invalid("initial capacity must be at least 1"));
        }
        if self.model_chunk_size == 0 || self.color_chunk_size == 0 {
            return Err(BufferError::invalid("chunk sizes must be at least 1"));
        }
        Ok(())
    }

    /// Whether the chunk sizes match the typed record layouts.
    #[inline]
    pub fn has_typed_layout(&self) -> bool {
        self.model_chunk_size == MODEL_CHUNK_SIZE && self.color_chunk_size == COLOR_CHUNK_SIZE
    }
}
