//! The edge record stored in the cache.

use std::fmt;

use crate::error::{Error, Result};

/// A "subcategory-of" link: `child` is a direct subcategory of `parent`.
///
/// Edges are not deduplicated and may form cycles, including self-loops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// The containing category.
    pub parent: String,
    /// The direct subcategory.
    pub child: String,
}

impl Edge {
    /// Creates a new edge from `parent` to `child`.
    #[must_use]
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Parses one cache line (without its terminator).
    ///
    /// Fields are split on whitespace. On failure the number of fields found
    /// is returned so the caller can report it.
    pub(crate) fn parse_line(line: &str) -> std::result::Result<Self, usize> {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(parent), Some(child), None) => Ok(Self::new(parent, child)),
            _ => Err(line.split_whitespace().count()),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.parent, self.child)
    }
}

/// Checks that a title can be written as a single edge-list field.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the title is empty or contains
/// whitespace, either of which would make the line unreadable.
pub fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::InvalidField("title is empty".to_string()));
    }
    if title.chars().any(char::is_whitespace) {
        return Err(Error::InvalidField(format!(
            "title contains whitespace: {title:?}"
        )));
    }
    Ok(())
}
