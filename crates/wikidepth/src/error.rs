//! Error types for wikidepth operations.
//!
//! Errors are split into two kinds:
//!
//! - **`Error`**: fatal errors that end the run (database unavailable, output
//!   file cannot be written, bad arguments)
//! - **`ItemError`**: failures for a single category or page that are logged,
//!   collected and skipped while the rest of the run continues
//!
//! A category or page that was simply not discovered is neither: it is just
//! absent from the depth maps.

use thiserror::Error;

/// Result type for wikidepth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for wikidepth operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Edge-list cache could not be read or written
    #[error("edge-list cache error: {0}")]
    EdgeList(#[from] wikidepth_edgelist::Error),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments
    #[error("usage error: {0}")]
    Usage(String),

    /// A requested row does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Infrastructure failure inside wikidepth itself
    #[error("internal error: {0}")]
    Internal(String),
}

/// A failure affecting one category or page.
///
/// These are collected during aggregation and page output but never halt
/// the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// The category title or page id the failure concerns
    pub key: String,
    /// Which lookup failed
    pub kind: ItemErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.key, self.message, self.kind)
    }
}

impl std::error::Error for ItemError {}

/// Which per-item lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemErrorKind {
    /// Listing the pages of a subcategory failed
    PageQuery,
    /// Resolving a page id to its title failed
    TitleLookup,
    /// Listing the categories of a page failed
    CategoryLookup,
}

impl std::fmt::Display for ItemErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageQuery => write!(f, "page query failed"),
            Self::TitleLookup => write!(f, "title lookup failed"),
            Self::CategoryLookup => write!(f, "category lookup failed"),
        }
    }
}

impl ItemError {
    /// Create a new item error.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: ItemErrorKind, error: &Error) -> Self {
        Self {
            key: key.into(),
            kind,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_error_display_includes_key_and_kind() {
        let error = ItemError::new(
            "Physics",
            ItemErrorKind::PageQuery,
            &Error::Internal("connection lost".to_string()),
        );

        let display = error.to_string();
        assert!(display.starts_with("Physics: "));
        assert!(display.contains("connection lost"));
        assert!(display.contains("page query failed"));
    }

    #[test]
    fn edge_list_errors_convert() {
        let inner = wikidepth_edgelist::Error::InvalidField("title is empty".to_string());
        let error: Error = inner.into();
        assert!(matches!(error, Error::EdgeList(_)));
        assert!(error.to_string().contains("title is empty"));
    }
}
