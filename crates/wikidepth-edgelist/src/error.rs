//! Error types for wikidepth-edgelist operations.

use std::io;
use thiserror::Error;

/// The error type for edge-list operations.
///
/// Malformed input lines are not errors; they surface as
/// [`Warning`](crate::Warning)s while reading continues.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A title cannot be represented in the edge-list format.
    #[error("Invalid edge field: {0}")]
    InvalidField(String),
}

/// A specialized Result type for edge-list operations.
pub type Result<T> = std::result::Result<T, Error>;
