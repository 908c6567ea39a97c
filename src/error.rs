//! Error types for automaton operations.

use thiserror::Error;

/// Errors that can occur while building, mutating or resizing an automaton.
///
/// Every error is reported before the automaton is modified, so a failed call
/// leaves the automaton exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The pattern is empty.
    ///
    /// An empty pattern would match between every pair of symbols, so it is
    /// rejected on insert.
    #[error("Pattern is empty")]
    EmptyPattern,

    /// The bucket count is not positive.
    ///
    /// This error occurs when creating or resizing an automaton with a bucket
    /// count of zero.
    #[error("Bucket count must be positive, got {0}")]
    InvalidBucketCount(usize),

    /// Growing the node arena, a transition table or the pattern registry
    /// failed to allocate.
    #[error("Allocation failed while growing {0}")]
    AllocationFailure(&'static str),
}

impl AutomatonError {
    /// Returns `true` for errors caused by a bad argument rather than by
    /// resource exhaustion.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            AutomatonError::EmptyPattern | AutomatonError::InvalidBucketCount(_)
        )
    }
}

/// A specialized `Result` type for automaton operations.
pub type Result<T> = std::result::Result<T, AutomatonError>;
