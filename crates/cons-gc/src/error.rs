//! Heap errors

use crate::object::ObjectRef;
use thiserror::Error;

/// Errors returned by heap and root-stack operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GcError {
    /// Push onto a full root stack
    #[error("Root stack overflow (capacity {capacity})")]
    StackOverflow {
        /// Configured maximum depth
        capacity: usize,
    },

    /// Pop or pair construction with too few roots
    #[error("Root stack underflow: needed {needed}, available {available}")]
    StackUnderflow {
        /// Entries the operation consumes
        needed: usize,
        /// Entries that were on the stack
        available: usize,
    },

    /// Memory for a new object could not be obtained.
    ///
    /// Unlike the stack errors this is not a usage mistake; hosts should
    /// treat it as fatal.
    #[error("Heap exhausted: {live} live objects (limit {limit})")]
    ResourceExhaustion {
        /// Live objects at the time of the failed allocation
        live: usize,
        /// The limit that was hit
        limit: usize,
    },

    /// Handle to a freed slot, or to a slot that never existed
    #[error("Invalid object reference {0}")]
    InvalidReference(ObjectRef),

    /// Pair operation on a non-pair object
    #[error("Object {0} is not a pair")]
    NotAPair(ObjectRef),

    /// Integer operation on a non-integer object
    #[error("Object {0} is not an integer")]
    NotAnInteger(ObjectRef),
}

/// Result type for heap operations
pub type Result<T> = std::result::Result<T, GcError>;
