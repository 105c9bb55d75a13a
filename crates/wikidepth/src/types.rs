//! Core type definitions shared across wikidepth.

use std::collections::HashMap;
use std::fmt;

/// Minimum hop count from the nearest seed, per discovered category.
///
/// Seeds are at depth 0. A category absent from the map was not reached.
pub type DepthMap = HashMap<String, u32>;

/// Minimum depth over all discovered categories that contain a page.
pub type PageDepthMap = HashMap<PageId, u32>;

/// A strongly-typed page ID to prevent mixing with category titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub i64);

impl PageId {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for PageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
