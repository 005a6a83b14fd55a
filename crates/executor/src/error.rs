//! Executor errors
//!
//! All variants are struct-style so they read the same in logs and records.

use stash_core::StashError;
use thiserror::Error;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the executor
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A store operation failed
    #[error("{source}")]
    Store {
        /// Underlying store error
        #[from]
        source: StashError,
    },

    /// An input item could not be decoded
    #[error("invalid item: {reason}")]
    InvalidItem {
        /// Why decoding failed
        reason: String,
    },

    /// Unknown operation name
    #[error("unknown operation '{operation}'")]
    UnknownOperation {
        /// Name as supplied
        operation: String,
    },

    /// A batch item failed and the batch was aborted
    #[error("item {index} failed: {source}")]
    ItemFailed {
        /// Zero-based position of the item in the batch
        index: usize,
        /// The failure
        #[source]
        source: Box<Error>,
    },

    /// Unexpected executor state
    #[error("internal error: {reason}")]
    Internal {
        /// Description
        reason: String,
    },
}

impl Error {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Store { source } => source.code(),
            Error::InvalidItem { .. } => "InvalidItem",
            Error::UnknownOperation { .. } => "UnknownOperation",
            Error::ItemFailed { source, .. } => source.code(),
            Error::Internal { .. } => "Internal",
        }
    }

    /// Batch position of the failing item, if this error aborted a batch
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Error::ItemFailed { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The store error underneath, if any
    pub fn store_error(&self) -> Option<&StashError> {
        match self {
            Error::Store { source } => Some(source),
            Error::ItemFailed { source, .. } => source.store_error(),
            _ => None,
        }
    }
}
