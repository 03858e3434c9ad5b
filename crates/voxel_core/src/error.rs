//! The error kinds the world core recognizes.
//!
//! Most of SPEC_FULL.md §7's kinds never propagate as `Err` - a read of a
//! non-resident chunk returns `Air`/`0`, a write is dropped after a log
//! event. Only the two kinds that are genuinely fatal to a worker or the
//! process are represented as [`VoxelError`] variants; the rest exist here
//! as well so call sites and tests have one shared vocabulary for them.

use thiserror::Error;

/// Error kinds recognized by the world core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoxelError {
    /// A read/write referenced a chunk coordinate not in the world map.
    ///
    /// Reads return `Air`/`0` for this case and never construct this
    /// variant as an `Err`; it exists so a write path can log it before
    /// discarding the write, and so tests can assert the condition was hit.
    #[error("chunk at {cx},{cz} is not resident")]
    NotResident {
        /// The chunk's x coordinate.
        cx: i32,
        /// The chunk's z coordinate.
        cz: i32,
    },

    /// A `CHUNK_GEN_RESPONSE` arrived for a coordinate already resident.
    #[error("duplicate chunk generation response for {cx},{cz}")]
    DuplicateChunk {
        /// The chunk's x coordinate.
        cx: i32,
        /// The chunk's z coordinate.
        cz: i32,
    },

    /// A mesh response whose request has since been superseded.
    #[error("stale mesh response for mini at cx={cx} my={my} cz={cz}")]
    StaleMeshResponse {
        /// The mini's chunk x coordinate.
        cx: i32,
        /// The mini's base y.
        my: i32,
        /// The mini's chunk z coordinate.
        cz: i32,
    },

    /// A generated or deserialized chunk failed a §3 data-model invariant.
    ///
    /// This is a bug, not a runtime condition - callers should abort with
    /// the diagnostic rather than attempt recovery.
    #[error("chunk invariant violated: {0}")]
    InvariantViolation(String),

    /// The message bus was closed while a worker was waiting on it.
    ///
    /// Fatal to the observing worker; the process shuts down.
    #[error("message bus closed")]
    BusClosed,
}

/// Convenience alias for the core's `Result` type.
pub type VoxelResult<T> = Result<T, VoxelError>;
