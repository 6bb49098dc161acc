use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::record::{TurtleColor, TurtleModel};

use super::config::BufferConfig;
use super::error::{BufferError, Result};
use super::id::IdAllocator;
use super::shape::{ShapeBuffer, TurtleData, TurtleDataMut};
use super::TurtleId;

/// Owns one [`ShapeBuffer`] per shape and routes turtles between them.
///
/// Callers only hold [`TurtleId`]s. Chunk views are re-fetched per call, since
/// any create, destroy or reshape may move data around inside a shape.
#[derive(Debug)]
pub struct BufferManager {
    config: BufferConfig,
    buffers: HashMap<String, ShapeBuffer>,
    shapes: HashMap<TurtleId, String>,
    ids: IdAllocator,
}

impl BufferManager {
    pub fn new(config: BufferConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            buffers: HashMap::new(),
            shapes: HashMap::new(),
            ids: IdAllocator::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Number of live turtles across all shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: TurtleId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Shape `id` is currently drawn with.
    pub fn shape_of(&self, id: TurtleId) -> Result<&str> {
        self.shapes
            .get(&id)
            .map(String::as_str)
            .ok_or(BufferError::UnknownId(id))
    }

    /// Returns the buffer for `shape`, creating it on first use.
    ///
    /// Buffers are never dropped once created. The buffer is read-only here:
    /// turtles enter and leave it through the manager so routing stays exact.
    pub fn get_buffer(&mut self, shape: &str) -> Result<&ShapeBuffer> {
        self.buffer_mut(shape).map(|buffer| &*buffer)
    }

    fn buffer_mut(&mut self, shape: &str) -> Result<&mut ShapeBuffer> {
        match self.buffers.entry(shape.to_owned()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                log::debug!(
                    "BufferManager: new shape buffer '{}' (capacity {})",
                    shape,
                    self.config.initial_capacity
                );
                let buffer = ShapeBuffer::new(
                    shape,
                    self.config.initial_capacity,
                    self.config.model_chunk_size,
                    self.config.color_chunk_size,
                )?;
                Ok(e.insert(buffer))
            }
        }
    }

    /// Returns the buffer for `shape` without creating it.
    #[inline]
    pub fn buffer(&self, shape: &str) -> Option<&ShapeBuffer> {
        self.buffers.get(shape)
    }

    /// All shape buffers created so far.
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeBuffer> {
        self.buffers.values()
    }

    /// Creates turtle `id` in `shape`'s buffer.
    ///
    /// Ids are unique across shapes; a live id is rejected wherever it lives.
    pub fn create_turtle(
        &mut self,
        id: TurtleId,
        shape: &str,
        model_init: Option<&[f32]>,
        color_init: Option<&[f32]>,
    ) -> Result<TurtleDataMut<'_>> {
        if self.shapes.contains_key(&id) {
            return Err(BufferError::DuplicateId(id));
        }

        self.buffer_mut(shape)?
            .allocate(id, model_init, color_init)?;
        self.ids.observe(id);
        self.shapes.insert(id, shape.to_owned());

        self.get_mut(id)
    }

    /// Creates a turtle with a fresh id from this manager's allocator.
    pub fn spawn(
        &mut self,
        shape: &str,
        model: &TurtleModel,
        color: &TurtleColor,
    ) -> Result<TurtleId> {
        let id = self
            .ids
            .next_id()
            .ok_or_else(|| BufferError::invalid("turtle id space exhausted"))?;
        self.create_turtle(id, shape, Some(model.as_chunk()), Some(color.as_chunk()))?;
        Ok(id)
    }

    /// Moves `id` to `new_shape`, keeping its model and color values.
    ///
    /// Reshaping to the current shape is a no-op.
    pub fn set_shape(&mut self, id: TurtleId, new_shape: &str) -> Result<TurtleDataMut<'_>> {
        let old_shape = self.shape_of(id)?.to_owned();
        if old_shape == new_shape {
            return self.get_mut(id);
        }

        // Copy out first: removal from the old buffer zeroes or overwrites the slot.
        let (model, color) = {
            let data = self.get(id)?;
            (data.model.to_vec(), data.color.to_vec())
        };

        self.buffer_mut(new_shape)?
            .allocate(id, Some(&model[..]), Some(&color[..]))?;
        self.buffers
            .get_mut(&old_shape)
            .ok_or(BufferError::UnknownId(id))?
            .remove(id)?;
        self.shapes.insert(id, new_shape.to_owned());

        log::trace!("BufferManager: {id} reshaped '{old_shape}' -> '{new_shape}'");

        self.get_mut(id)
    }

    /// Removes `id` from whichever shape holds it.
    pub fn destroy_turtle(&mut self, id: TurtleId) -> Result<()> {
        let shape = self.shapes.get(&id).ok_or(BufferError::UnknownId(id))?;
        self.buffers
            .get_mut(shape)
            .ok_or(BufferError::UnknownId(id))?
            .remove(id)?;
        self.shapes.remove(&id);
        Ok(())
    }

    /// Chunks of `id`, valid until the next structural change.
    pub fn get(&self, id: TurtleId) -> Result<TurtleData<'_>> {
        let shape = self.shape_of(id)?;
        self.buffers
            .get(shape)
            .ok_or(BufferError::UnknownId(id))?
            .get(id)
    }

    pub fn get_mut(&mut self, id: TurtleId) -> Result<TurtleDataMut<'_>> {
        let shape = self.shapes.get(&id).ok_or(BufferError::UnknownId(id))?;
        self.buffers
            .get_mut(shape)
            .ok_or(BufferError::UnknownId(id))?
            .get_mut(id)
    }

    // ── typed access ──────────────────────────────────────────────────────

    pub fn model(&self, id: TurtleId) -> Result<&TurtleModel> {
        self.check_typed()?;
        TurtleModel::from_chunk(self.get(id)?.model).ok_or_else(untyped)
    }

    pub fn model_mut(&mut self, id: TurtleId) -> Result<&mut TurtleModel> {
        self.check_typed()?;
        TurtleModel::from_chunk_mut(self.get_mut(id)?.model).ok_or_else(untyped)
    }

    pub fn color(&self, id: TurtleId) -> Result<&TurtleColor> {
        self.check_typed()?;
        TurtleColor::from_chunk(self.get(id)?.color).ok_or_else(untyped)
    }

    pub fn color_mut(&mut self, id: TurtleId) -> Result<&mut TurtleColor> {
        self.check_typed()?;
        TurtleColor::from_chunk_mut(self.get_mut(id)?.color).ok_or_else(untyped)
    }

    fn check_typed(&self) -> Result<()> {
        if self.config.has_typed_layout() {
            Ok(())
        } else {
            Err(untyped())
        }
    }
}

fn untyped() -> BufferError {
    BufferError::invalid("chunk sizes do not match the typed record layout")
}
