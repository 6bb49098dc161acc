use super::error::{BufferError, Result};

/// Flat, growable array of fixed-size `f32` records.
///
/// Occupied chunks always form the prefix `[0, count)`; the slots in
/// `[count, size)` are zero. The live prefix is handed to the GPU as-is, so
/// removal compacts by moving the last chunk into the hole instead of
/// shifting the tail.
///
/// Performance characteristics:
/// - `allocate()` is amortized O(chunk_size) (capacity doubles when full)
/// - `remove()` is O(chunk_size), independent of `count`
#[derive(Debug, Clone)]
pub struct ChunkBuffer {
    data: Vec<f32>,
    chunk_size: usize,
    count: usize,
    size: usize,
}

impl ChunkBuffer {
    /// Creates a zeroed buffer with room for `size` chunks of `chunk_size` floats.
    ///
    /// Both values must be non-zero; doubling a zero capacity would never grow.
    pub fn new(chunk_size: usize, size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(BufferError::invalid("chunk size must be at least 1"));
        }
        if size == 0 {
            return Err(BufferError::invalid("buffer capacity must be at least 1"));
        }

        Ok(Self {
            data: vec![0.0; size * chunk_size],
            chunk_size,
            count: 0,
            size,
        })
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of occupied chunks.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Capacity in chunks.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Appends a chunk and returns it.
    ///
    /// `init` must hold exactly `chunk_size` values; `None` leaves the chunk
    /// zeroed. Doubles the capacity first when the buffer is full.
    pub fn allocate(&mut self, init: Option<&[f32]>) -> Result<&mut [f32]> {
        if let Some(init) = init {
            if init.len() != self.chunk_size {
                return Err(BufferError::invalid(format!(
                    "chunk init has {} values, expected {}",
                    init.len(),
                    self.chunk_size
                )));
            }
        }

        if self.count == self.size {
            self.resize(self.size * 2)?;
        }

        let index = self.count;
        self.count += 1;

        let chunk = self.chunk_mut(index);
        match init {
            Some(values) => chunk.copy_from_slice(values),
            None => chunk.fill(0.0),
        }
        Ok(chunk)
    }

    /// Returns the chunk at `index`.
    pub fn get(&self, index: usize) -> Result<&[f32]> {
        self.check(index)?;
        Ok(self.chunk(index))
    }

    /// Returns the chunk at `index` for in-place mutation.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut [f32]> {
        self.check(index)?;
        Ok(self.chunk_mut(index))
    }

    /// Removes the chunk at `index`, keeping the occupied prefix gap-free.
    ///
    /// When `index` is not the last occupied slot, the last chunk is copied
    /// into it and its old index is returned so the caller can remap whatever
    /// identity lived there. Removing the last slot returns `None`.
    pub fn remove(&mut self, index: usize) -> Result<Option<usize>> {
        self.check(index)?;

        let last = self.count - 1;
        let moved = if index == last {
            None
        } else {
            let cs = self.chunk_size;
            self.data.copy_within(last * cs..(last + 1) * cs, index * cs);
            Some(last)
        };

        self.chunk_mut(last).fill(0.0);
        self.count = last;
        Ok(moved)
    }

    /// Grows capacity to `new_size` chunks, preserving every chunk at its index.
    ///
    /// New slots are zeroed. Shrinking (or a no-op resize) is rejected.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        if new_size <= self.size {
            return Err(BufferError::invalid(format!(
                "resize to {new_size} chunks does not grow capacity {}",
                self.size
            )));
        }

        log::debug!(
            "ChunkBuffer: growing {} -> {} chunks ({} floats each)",
            self.size,
            new_size,
            self.chunk_size
        );

        self.data.resize(new_size * self.chunk_size, 0.0);
        self.size = new_size;
        Ok(())
    }

    /// The occupied prefix: `count * chunk_size` floats starting at offset 0.
    #[inline]
    pub fn live(&self) -> &[f32] {
        &self.data[..self.count * self.chunk_size]
    }

    /// The occupied prefix as raw bytes, ready for a single GPU write.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.live())
    }

    /// The whole backing store, including unoccupied slots.
    #[inline]
    pub fn backing(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index >= self.count {
            return Err(BufferError::OutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(())
    }

    #[inline]
    fn chunk(&self, index: usize) -> &[f32] {
        let start = index * self.chunk_size;
        &self.data[start..start + self.chunk_size]
    }

    #[inline]
    fn chunk_mut(&mut self, index: usize) -> &mut [f32] {
        let start = index * self.chunk_size;
        &mut self.data[start..start + self.chunk_size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(buf: &ChunkBuffer, index: usize) -> &[f32] {
        let cs = buf.chunk_size();
        &buf.backing()[index * cs..(index + 1) * cs]
    }

    fn filled(buf: &mut ChunkBuffer, values: &[f32]) {
        for &v in values {
            buf.allocate(Some(&[v; 4][..])).unwrap();
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_is_zeroed_and_empty() {
        let buf = ChunkBuffer::new(4, 3).unwrap();
        assert_eq!(buf.count(), 0);
        assert_eq!(buf.size(), 3);
        assert!(buf.is_empty());
        assert_eq!(buf.backing(), &[0.0; 12][..]);
        assert!(buf.live().is_empty());
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            ChunkBuffer::new(4, 0),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert!(matches!(
            ChunkBuffer::new(0, 4),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    // ── allocate ──────────────────────────────────────────────────────────

    #[test]
    fn allocate_without_init_is_zeroed() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        let chunk = buf.allocate(None).unwrap();
        assert_eq!(chunk, &[0.0; 4][..]);
        assert_eq!(buf.count(), 1);
    }

    #[test]
    fn allocate_round_trips_init() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        buf.allocate(Some(&[1.0, 2.0, 3.0, 4.0][..])).unwrap();
        assert_eq!(buf.get(0).unwrap(), &[1.0, 2.0, 3.0, 4.0][..]);
    }

    #[test]
    fn allocate_rejects_wrong_init_length() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        assert!(matches!(
            buf.allocate(Some(&[1.0, 2.0][..])),
            Err(BufferError::InvalidArgument(_))
        ));
        assert_eq!(buf.count(), 0);
    }

    #[test]
    fn allocate_doubles_when_full() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        filled(&mut buf, &[1.0, 2.0]);
        assert_eq!(buf.size(), 2);
        filled(&mut buf, &[3.0]);
        assert_eq!(buf.size(), 4);
        assert_eq!(buf.count(), 3);
        filled(&mut buf, &[4.0, 5.0]);
        assert_eq!(buf.size(), 8);
    }

    #[test]
    fn returned_chunk_writes_through() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        buf.allocate(None).unwrap()[2] = 9.0;
        assert_eq!(buf.get(0).unwrap(), &[0.0, 0.0, 9.0, 0.0][..]);
    }

    // ── get ───────────────────────────────────────────────────────────────

    #[test]
    fn get_past_count_is_out_of_range() {
        let mut buf = ChunkBuffer::new(4, 4).unwrap();
        filled(&mut buf, &[1.0]);
        assert_eq!(
            buf.get(1).unwrap_err(),
            BufferError::OutOfRange { index: 1, count: 1 }
        );
        assert!(buf.get_mut(3).is_err());
    }

    // ── remove ────────────────────────────────────────────────────────────

    #[test]
    fn remove_last_zeroes_and_reports_nothing_moved() {
        let mut buf = ChunkBuffer::new(4, 4).unwrap();
        filled(&mut buf, &[1.0, 2.0, 3.0]);
        assert_eq!(buf.remove(2).unwrap(), None);
        assert_eq!(buf.count(), 2);
        assert_eq!(slot(&buf, 0), &[1.0; 4][..]);
        assert_eq!(slot(&buf, 1), &[2.0; 4][..]);
        assert_eq!(slot(&buf, 2), &[0.0; 4][..]);
    }

    #[test]
    fn remove_middle_moves_last_into_hole() {
        let mut buf = ChunkBuffer::new(4, 4).unwrap();
        filled(&mut buf, &[1.0, 2.0, 3.0]);
        assert_eq!(buf.remove(1).unwrap(), Some(2));
        assert_eq!(buf.count(), 2);
        assert_eq!(slot(&buf, 0), &[1.0; 4][..]);
        assert_eq!(slot(&buf, 1), &[3.0; 4][..]);
        assert_eq!(slot(&buf, 2), &[0.0; 4][..]);
    }

    #[test]
    fn remove_out_of_range() {
        let mut buf = ChunkBuffer::new(4, 4).unwrap();
        assert_eq!(
            buf.remove(0).unwrap_err(),
            BufferError::OutOfRange { index: 0, count: 0 }
        );
    }

    #[test]
    fn remove_only_chunk_empties_buffer() {
        let mut buf = ChunkBuffer::new(4, 1).unwrap();
        filled(&mut buf, &[7.0]);
        assert_eq!(buf.remove(0).unwrap(), None);
        assert!(buf.is_empty());
        assert_eq!(buf.backing(), &[0.0; 4][..]);
    }

    #[test]
    fn basic_lifecycle() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        filled(&mut buf, &[1.0, 2.0]);
        filled(&mut buf, &[3.0]);
        assert_eq!(buf.size(), 4);

        assert_eq!(buf.remove(0).unwrap(), Some(2));
        assert_eq!(buf.count(), 2);
        assert_eq!(slot(&buf, 0), &[3.0; 4][..]);
        assert_eq!(slot(&buf, 1), &[2.0; 4][..]);
        assert_eq!(slot(&buf, 2), &[0.0; 4][..]);
    }

    #[test]
    fn freed_slot_is_reused() {
        let mut buf = ChunkBuffer::new(4, 4).unwrap();
        filled(&mut buf, &[1.0, 2.0, 3.0]);
        buf.remove(2).unwrap();
        filled(&mut buf, &[4.0]);
        assert_eq!(buf.count(), 3);
        assert_eq!(buf.size(), 4);
        assert_eq!(slot(&buf, 2), &[4.0; 4][..]);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_preserves_chunks_and_zeroes_new_slots() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        filled(&mut buf, &[1.0, 2.0]);
        buf.resize(4).unwrap();
        assert_eq!(buf.size(), 4);
        assert_eq!(buf.backing().len(), 16);
        assert_eq!(slot(&buf, 0), &[1.0; 4][..]);
        assert_eq!(slot(&buf, 1), &[2.0; 4][..]);
        assert_eq!(slot(&buf, 2), &[0.0; 4][..]);
        assert_eq!(slot(&buf, 3), &[0.0; 4][..]);
    }

    #[test]
    fn resize_must_grow() {
        let mut buf = ChunkBuffer::new(4, 2).unwrap();
        assert!(matches!(buf.resize(2), Err(BufferError::InvalidArgument(_))));
        assert!(matches!(buf.resize(1), Err(BufferError::InvalidArgument(_))));
        assert_eq!(buf.size(), 2);
    }

    // ── upload layout ─────────────────────────────────────────────────────

    #[test]
    fn live_prefix_is_contiguous() {
        let mut buf = ChunkBuffer::new(2, 4).unwrap();
        buf.allocate(Some(&[1.0, 1.5][..])).unwrap();
        buf.allocate(Some(&[2.0, 2.5][..])).unwrap();
        buf.allocate(Some(&[3.0, 3.5][..])).unwrap();
        buf.remove(0).unwrap();
        assert_eq!(buf.live(), &[3.0, 3.5, 2.0, 2.5][..]);
        assert_eq!(buf.as_bytes().len(), 4 * 4);
    }

    #[test]
    fn capacity_invariant_holds_under_churn() {
        let mut buf = ChunkBuffer::new(3, 1).unwrap();
        let mut last_size = buf.size();
        for step in 0..200usize {
            if step % 3 == 2 && !buf.is_empty() {
                buf.remove(step % buf.count()).unwrap();
            } else {
                buf.allocate(None).unwrap();
            }
            assert!(buf.count() <= buf.size());
            assert!(buf.size() >= last_size);
            last_size = buf.size();
        }
    }
}
