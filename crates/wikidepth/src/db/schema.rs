//! Database schema definition for the category database.

/// Database schema definition.
///
/// Mirrors the two MediaWiki tables the crawler reads. Only the columns
/// that are queried are declared.
pub(crate) const SCHEMA: &str = r"
-- Every page, category pages included
CREATE TABLE IF NOT EXISTS page (
    page_id INTEGER PRIMARY KEY,
    page_title TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_title ON page(page_title);

-- Membership of a page (cl_from) in a category (cl_to)
CREATE TABLE IF NOT EXISTS categorylinks (
    cl_from INTEGER NOT NULL,
    cl_to TEXT NOT NULL,
    cl_type TEXT NOT NULL CHECK (cl_type IN ('page', 'subcat', 'file'))
);

CREATE INDEX IF NOT EXISTS idx_categorylinks_to_type ON categorylinks(cl_to, cl_type);
CREATE INDEX IF NOT EXISTS idx_categorylinks_from ON categorylinks(cl_from);
";

/// Tables that must exist for a database to be usable.
pub(crate) const REQUIRED_TABLES: [&str; 2] = ["page", "categorylinks"];
