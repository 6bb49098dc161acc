use std::fmt;

/// Stable turtle handle.
///
/// The id is the only handle that survives compaction and shape changes;
/// chunk indices move whenever another turtle of the same shape is removed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct TurtleId(pub u64);

impl fmt::Display for TurtleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source owned by a single manager.
///
/// Each manager carries its own allocator, so independent managers never
/// share an id space. Once `u64::MAX` has been handed out or observed the
/// allocator is exhausted and never wraps back to ids that may be live.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: Some(0) }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id and advances the counter, or `None` when exhausted.
    pub fn next_id(&mut self) -> Option<TurtleId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(TurtleId(id))
    }

    /// Ensures ids handed out later never collide with `id`.
    pub fn observe(&mut self, id: TurtleId) {
        match self.next {
            Some(next) if id.0 >= next => self.next = id.0.checked_add(1),
            _ => {}
        }
    }
}
