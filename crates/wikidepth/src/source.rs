//! Data-source traits for the category database.
//!
//! The pipeline only talks to the database through these traits, so tests
//! and alternative backends can stand in for [`WikiDb`](crate::db::WikiDb).
//!
//! ## Design
//!
//! - [`LinkSource`] streams every subcategory link once, to build the cache
//! - [`PageSource`] lists the pages directly inside one category
//! - [`PageResolver`] turns a page id back into its title and categories
//!
//! `PageSource` and `PageResolver` are `Send + Sync` because they are
//! queried from the aggregation worker pool.

use crate::error::Result;
use crate::types::PageId;

/// Source of all "subcategory-of" links.
pub trait LinkSource {
    /// Calls `visit(parent, child)` for every subcategory link.
    ///
    /// Returns the number of links visited.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or `visit` fails. The
    /// walk stops at the first error.
    fn for_each_subcategory_link(
        &self,
        visit: &mut dyn FnMut(&str, &str) -> Result<()>,
    ) -> Result<usize>;
}

/// Lists the pages directly contained in a category.
pub trait PageSource: Send + Sync {
    /// Returns the ids of pages directly in `category`. Subcategories are not
    /// included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn pages_of(&self, category: &str) -> Result<Vec<PageId>>;
}

/// Resolves page ids for output.
pub trait PageResolver: Send + Sync {
    /// Returns the title of `page`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if no such page
    /// exists, or an error if the query fails.
    fn title_of(&self, page: PageId) -> Result<String>;

    /// Returns every category `page` directly belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn categories_of(&self, page: PageId) -> Result<Vec<String>>;
}
