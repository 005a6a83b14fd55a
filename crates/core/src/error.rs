//! Error types for store operations
//!
//! Every failure a store operation can produce is a [`StashError`]. Each
//! variant has a canonical code (see [`StashError::code`]) that is stable and
//! surfaces in soft per-item records.
//!
//! | Code | Description |
//! |------|-------------|
//! | NotArray | Array operation on a non-array value |
//! | NotFound | pop/shift on an absent path |
//! | SizeLimitExceeded | Serialized value larger than the per-value ceiling |
//! | PartitionLimitExceeded | Write would grow a partition past its ceiling |
//! | InvalidPath | Empty path or empty segment |
//! | InvalidParameter | Malformed operation parameter |

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StashError>;

/// Store operation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StashError {
    /// Array operation targeted a value that is not an array
    #[error("value at '{path}' is not an array (found {actual})")]
    NotArray {
        /// Path that was targeted
        path: String,
        /// Type name of the value found there
        actual: &'static str,
    },

    /// pop/shift targeted a path with no value
    #[error("no array found at '{path}'")]
    NotFound {
        /// Path that was targeted
        path: String,
    },

    /// Serialized value is larger than the per-value ceiling
    #[error("value for '{path}' is {size} bytes, exceeding the {limit} byte limit")]
    SizeLimitExceeded {
        /// Path being written
        path: String,
        /// Serialized size in bytes
        size: u64,
        /// Configured ceiling in bytes
        limit: u64,
    },

    /// Write would grow a partition past its aggregate ceiling
    #[error("{scope} partition would reach {size} bytes, exceeding the {limit} byte limit")]
    PartitionLimitExceeded {
        /// Scope name of the partition
        scope: &'static str,
        /// Projected partition size in bytes
        size: u64,
        /// Configured ceiling in bytes
        limit: u64,
    },

    /// Path is empty or has an empty segment
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Operation parameter could not be interpreted
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

impl StashError {
    /// Canonical error code
    pub fn code(&self) -> &'static str {
        match self {
            StashError::NotArray { .. } => "NotArray",
            StashError::NotFound { .. } => "NotFound",
            StashError::SizeLimitExceeded { .. } => "SizeLimitExceeded",
            StashError::PartitionLimitExceeded { .. } => "PartitionLimitExceeded",
            StashError::InvalidPath { .. } => "InvalidPath",
            StashError::InvalidParameter { .. } => "InvalidParameter",
        }
    }

    /// Shorthand for an [`StashError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        StashError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Errors raised by a size ceiling
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            StashError::SizeLimitExceeded { .. } | StashError::PartitionLimitExceeded { .. }
        )
    }
}
