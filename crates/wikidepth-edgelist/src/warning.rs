//! Warning types for non-fatal problems found while reading an edge list.
//!
//! A cache file is regenerated from the database, but it can still be
//! truncated or hand-edited. Rather than refusing the whole file, the reader
//! skips lines it cannot interpret and records a [`Warning`] for each one in
//! a [`WarningCollector`].
//!
//! # Examples
//!
//! ```
//! use wikidepth_edgelist::warning::{Warning, WarningCollector};
//!
//! let collector = WarningCollector::new();
//! collector.add(Warning::MalformedLine {
//!     line_number: 5,
//!     field_count: 3,
//! });
//! collector.add(Warning::InvalidUtf8 { line_number: 9 });
//!
//! let warnings = collector.into_warnings();
//! assert_eq!(warnings.len(), 2);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A non-fatal problem with a single line of an edge list.
///
/// Each variant carries the 1-based line number of the skipped line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line did not contain exactly two whitespace-separated fields.
    MalformedLine {
        /// The 1-based line number.
        line_number: usize,
        /// How many fields the line actually had.
        field_count: usize,
    },

    /// The line was not valid UTF-8.
    InvalidUtf8 {
        /// The 1-based line number.
        line_number: usize,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikidepth_edgelist::warning::Warning;
    ///
    /// let warning = Warning::InvalidUtf8 { line_number: 42 };
    /// assert_eq!(warning.line_number(), 42);
    /// ```
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedLine { line_number, .. } | Self::InvalidUtf8 { line_number } => {
                *line_number
            }
        }
    }

    /// Returns a human-readable description of the warning.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedLine {
                line_number,
                field_count,
            } => format!("line {line_number}: expected 2 fields, found {field_count}"),
            Self::InvalidUtf8 { line_number } => {
                format!("line {line_number}: not valid UTF-8")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "malformed_line",
            Self::InvalidUtf8 { .. } => "invalid_utf8",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}

/// A shareable collector for warnings produced while reading.
///
/// Cloning the collector shares the underlying list, so a caller can keep a
/// handle while the reader that feeds it is moved into a consumer such as a
/// graph builder.
///
/// A poisoned lock is recovered rather than propagated: the list only ever
/// receives whole pushes, so its contents stay consistent.
///
/// # Examples
///
/// ```
/// use wikidepth_edgelist::warning::{Warning, WarningCollector};
///
/// let collector = WarningCollector::new();
/// let handle = collector.clone();
///
/// collector.add(Warning::InvalidUtf8 { line_number: 1 });
/// assert_eq!(handle.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Creates a new empty `WarningCollector`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Warning>> {
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a warning to the collector.
    pub fn add(&self, warning: Warning) {
        self.lock().push(warning);
    }

    /// Returns the number of warnings collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no warnings have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a copy of the warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.lock().clone()
    }

    /// Consumes the collector and returns its warnings.
    ///
    /// If other clones are still alive, their shared list is copied.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        match Arc::try_unwrap(self.warnings) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_starts_empty() {
        let collector = WarningCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.len(), 0);
    }

    #[test]
    fn clones_share_the_same_list() {
        let collector = WarningCollector::new();
        let handle = collector.clone();

        collector.add(Warning::MalformedLine {
            line_number: 3,
            field_count: 1,
        });

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.warnings()[0].line_number(), 3);
    }

    #[test]
    fn into_warnings_copies_when_shared() {
        let collector = WarningCollector::new();
        let handle = collector.clone();
        collector.add(Warning::InvalidUtf8 { line_number: 7 });

        let warnings = collector.into_warnings();
        assert_eq!(warnings, vec![Warning::InvalidUtf8 { line_number: 7 }]);
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn description_names_line_and_problem() {
        let warning = Warning::MalformedLine {
            line_number: 12,
            field_count: 3,
        };
        let text = warning.to_string();
        assert!(text.contains("line 12"));
        assert!(text.contains("found 3"));
        assert_eq!(warning.kind(), "malformed_line");
    }

    #[test]
    fn invalid_utf8_kind() {
        let warning = Warning::InvalidUtf8 { line_number: 1 };
        assert_eq!(warning.kind(), "invalid_utf8");
        assert!(warning.description().contains("UTF-8"));
    }
}
