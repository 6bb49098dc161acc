use std::fmt;

use super::TurtleId;

/// Caller-facing buffer errors.
///
/// Lockstep violations between a shape's model and color buffers are not
/// represented here: they indicate a bug in the buffer code itself and panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Chunk index is not inside the occupied prefix.
    OutOfRange { index: usize, count: usize },
    /// The id is already live.
    DuplicateId(TurtleId),
    /// The id is not tracked.
    UnknownId(TurtleId),
    /// A size, chunk length or configuration value was rejected.
    InvalidArgument(String),
}

impl BufferError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, count } => {
                write!(f, "chunk index {index} out of range (count {count})")
            }
            Self::DuplicateId(id) => write!(f, "turtle {id} already exists"),
            Self::UnknownId(id) => write!(f, "unknown turtle {id}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for BufferError {}

pub type Result<T> = std::result::Result<T, BufferError>;
