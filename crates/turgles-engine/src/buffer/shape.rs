use std::collections::HashMap;

use super::chunk::ChunkBuffer;
use super::error::{BufferError, Result};
use super::TurtleId;

/// Read-only view of one turtle's model and color chunks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TurtleData<'a> {
    pub model: &'a [f32],
    pub color: &'a [f32],
}

/// Mutable view of one turtle's model and color chunks.
///
/// Borrows the owning buffer, so it cannot outlive the next structural change.
#[derive(Debug)]
pub struct TurtleDataMut<'a> {
    pub model: &'a mut [f32],
    pub color: &'a mut [f32],
}

/// Model and color buffers for every turtle of one shape.
///
/// Both chunk buffers grow and compact together, so a turtle's model chunk and
/// color chunk always share one index. The id map is updated whenever
/// compaction relocates a turtle.
#[derive(Debug, Clone)]
pub struct ShapeBuffer {
    shape: String,
    model: ChunkBuffer,
    color: ChunkBuffer,
    id_to_index: HashMap<TurtleId, usize>,
    /// Ids in chunk order; always `count` long.
    index_to_id: Vec<TurtleId>,
}

impl ShapeBuffer {
    pub fn new(
        shape: impl Into<String>,
        capacity: usize,
        model_chunk_size: usize,
        color_chunk_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            shape: shape.into(),
            model: ChunkBuffer::new(model_chunk_size, capacity)?,
            color: ChunkBuffer::new(color_chunk_size, capacity)?,
            id_to_index: HashMap::with_capacity(capacity),
            index_to_id: Vec::with_capacity(capacity),
        })
    }

    #[inline]
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// Number of turtles stored.
    ///
    /// # Panics
    /// Panics if the model and color buffers disagree.
    pub fn count(&self) -> usize {
        assert_eq!(
            self.model.count(),
            self.color.count(),
            "shape '{}': model/color count diverged",
            self.shape
        );
        self.model.count()
    }

    /// Capacity in turtles.
    ///
    /// # Panics
    /// Panics if the model and color buffers disagree.
    pub fn size(&self) -> usize {
        assert_eq!(
            self.model.size(),
            self.color.size(),
            "shape '{}': model/color capacity diverged",
            self.shape
        );
        self.model.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_to_id.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: TurtleId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    /// Current chunk index of `id`. Changes whenever another turtle is removed.
    #[inline]
    pub fn index_of(&self, id: TurtleId) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// Ids in chunk (and therefore instance) order.
    #[inline]
    pub fn ids(&self) -> &[TurtleId] {
        &self.index_to_id
    }

    /// Stores a new turtle and returns its chunks.
    ///
    /// `None` inits leave the corresponding chunk zeroed.
    pub fn allocate(
        &mut self,
        id: TurtleId,
        model_init: Option<&[f32]>,
        color_init: Option<&[f32]>,
    ) -> Result<TurtleDataMut<'_>> {
        if self.contains(id) {
            return Err(BufferError::DuplicateId(id));
        }
        // Validate both inits before touching either buffer so a rejected
        // color init cannot leave a lone model chunk behind.
        check_init("model", model_init, self.model.chunk_size())?;
        check_init("color", color_init, self.color.chunk_size())?;

        let index = self.count();
        self.model.allocate(model_init)?;
        self.color.allocate(color_init)?;

        self.id_to_index.insert(id, index);
        self.index_to_id.push(id);

        self.pair_mut(index)
    }

    pub fn get(&self, id: TurtleId) -> Result<TurtleData<'_>> {
        let index = self.index_of(id).ok_or(BufferError::UnknownId(id))?;
        Ok(TurtleData {
            model: self.model.get(index)?,
            color: self.color.get(index)?,
        })
    }

    pub fn get_mut(&mut self, id: TurtleId) -> Result<TurtleDataMut<'_>> {
        let index = self.index_of(id).ok_or(BufferError::UnknownId(id))?;
        self.pair_mut(index)
    }

    /// Removes `id`, moving the last turtle into its slot if needed.
    ///
    /// # Panics
    /// Panics if the model and color buffers report different relocations.
    pub fn remove(&mut self, id: TurtleId) -> Result<()> {
        let index = self.index_of(id).ok_or(BufferError::UnknownId(id))?;

        let moved_model = self.model.remove(index)?;
        let moved_color = self.color.remove(index)?;
        assert_eq!(
            moved_model, moved_color,
            "shape '{}': model/color compaction diverged removing {id}",
            self.shape
        );

        let removed = self.index_to_id.swap_remove(index);
        debug_assert_eq!(removed, id);
        self.id_to_index.remove(&id);

        if moved_model.is_some() {
            let relocated = self.index_to_id[index];
            self.id_to_index.insert(relocated, index);
        }
        Ok(())
    }

    #[inline]
    pub fn model(&self) -> &ChunkBuffer {
        &self.model
    }

    #[inline]
    pub fn color(&self) -> &ChunkBuffer {
        &self.color
    }

    /// Live model records as bytes (`count * model_chunk_size` floats).
    #[inline]
    pub fn model_bytes(&self) -> &[u8] {
        self.model.as_bytes()
    }

    /// Live color records as bytes (`count * color_chunk_size` floats).
    #[inline]
    pub fn color_bytes(&self) -> &[u8] {
        self.color.as_bytes()
    }

    fn pair_mut(&mut self, index: usize) -> Result<TurtleDataMut<'_>> {
        Ok(TurtleDataMut {
            model: self.model.get_mut(index)?,
            color: self.color.get_mut(index)?,
        })
    }
}

fn check_init(kind: &str, init: Option<&[f32]>, chunk_size: usize) -> Result<()> {
    match init {
        Some(values) if values.len() != chunk_size => Err(BufferError::invalid(format!(
            "{kind} init has {} values, expected {chunk_size}",
            values.len()
        ))),
        _ => Ok(()),
    }
}
