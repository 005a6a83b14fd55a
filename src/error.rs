//! Unified error types for Stash.
//!
//! This module flattens store, executor and configuration errors into one
//! enum with a consistent interface.

use thiserror::Error;

/// All Stash errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Array operation on a value that is not an array
    #[error("value at '{path}' is not an array (found {actual})")]
    NotArray {
        /// Path that was targeted
        path: String,
        /// Type name found there
        actual: String,
    },

    /// pop/shift on an absent path
    #[error("not found: {0}")]
    NotFound(String),

    /// A limit was exceeded (value or partition size)
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Invalid path
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Invalid operation parameter or batch item
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A batch item failed and aborted the batch
    #[error("item {index} failed: {source}")]
    ItemFailed {
        /// Position of the item in the batch
        index: usize,
        /// The failure
        #[source]
        source: Box<Error>,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Stash operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::ItemFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if a size ceiling rejected the operation.
    pub fn is_limit(&self) -> bool {
        match self {
            Error::LimitExceeded(_) => true,
            Error::ItemFailed { source, .. } => source.is_limit(),
            _ => false,
        }
    }

    /// Batch position of the failing item, if any.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Error::ItemFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// Convert from store errors
impl From<stash_core::StashError> for Error {
    fn from(e: stash_core::StashError) -> Self {
        use stash_core::StashError as SE;
        match e {
            SE::NotArray { path, actual } => Error::NotArray {
                path,
                actual: actual.to_string(),
            },
            SE::NotFound { path } => Error::NotFound(path),
            err @ (SE::SizeLimitExceeded { .. } | SE::PartitionLimitExceeded { .. }) => {
                Error::LimitExceeded(err.to_string())
            }
            SE::InvalidPath { path, reason } => Error::InvalidPath(format!("'{}': {}", path, reason)),
            err @ SE::InvalidParameter { .. } => Error::InvalidInput(err.to_string()),
        }
    }
}

// Convert from executor errors
impl From<stash_executor::Error> for Error {
    fn from(e: stash_executor::Error) -> Self {
        use stash_executor::Error as EE;
        match e {
            EE::Store { source } => Error::from(source),
            EE::InvalidItem { reason } => Error::InvalidInput(reason),
            err @ EE::UnknownOperation { .. } => Error::InvalidInput(err.to_string()),
            EE::ItemFailed { index, source } => Error::ItemFailed {
                index,
                source: Box::new(Error::from(*source)),
            },
            EE::Internal { reason } => Error::Internal(reason),
        }
    }
}

// Convert from configuration errors
impl From<stash_engine::ConfigError> for Error {
    fn from(e: stash_engine::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
