//! Crate-wide error types.

use crate::direction::DirId;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by catalog construction, schedule mutation, input
/// parsing and run orchestration.
///
/// Every variant is unrecoverable for the run that raised it: the run
/// aborts and the error is reported with its context. Nothing is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A textual direction did not match
    /// `Direction(id=<uint>,theta=<decimal>,phi=<decimal>)`.
    #[error("could not parse direction from {text:?}: {reason}")]
    ParseDirection { text: String, reason: String },

    /// An input file header line was missing or malformed.
    #[error("malformed input header: {0}")]
    ParseHeader(String),

    /// The run id embedded in an input file disagrees with the run id
    /// the file was loaded for.
    #[error("run id mismatch in {path}: expected {expected}, file says {found}")]
    RunIdMismatch {
        path: String,
        expected: u32,
        found: u32,
    },

    /// Catalog insertion out of sequence. Ids must be incremental
    /// (0, 1, 2, ...) and added in order.
    #[error("tried to add direction with id {got} but expected id {expected}; \
             ids must be incremental and inserted in order")]
    OutOfOrderInsert { got: DirId, expected: DirId },

    /// Lookup beyond the catalog bounds.
    #[error("direction id {id} out of range; the catalog holds {len} directions")]
    IndexOutOfRange { id: DirId, len: usize },

    /// Segment-flip bounds touching the fixed anchor at position 0 or
    /// exceeding the schedule length.
    #[error("invalid flip segment [{i}, {j}] for a schedule of {len} directions \
             (position 0 is fixed and both bounds must be within range)")]
    InvalidSegment { i: usize, j: usize, len: usize },

    /// Copy between schedules of different lengths.
    #[error("asked to copy a schedule with {src} directions into a schedule \
             with {dst} directions")]
    SizeMismatch { src: usize, dst: usize },

    /// A numeric parameter outside its legal range.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
