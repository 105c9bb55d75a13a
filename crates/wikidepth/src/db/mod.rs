//! `SQLite` storage layer for the category database.
//!
//! The database holds the MediaWiki `page` and `categorylinks` tables. The
//! crawler only reads it; [`WikiDb::create`] exists to build local dumps and
//! test fixtures.
//!
//! ## Module Structure
//!
//! - `schema` - Database schema (DDL)
//! - `links` - Source trait implementations (`LinkSource`, `PageSource`,
//!   `PageResolver`)

mod links;
mod schema;

pub(crate) use schema::{REQUIRED_TABLES, SCHEMA};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::PageId;

/// The `cl_type` of a category link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// An ordinary article in the category
    Page,
    /// A subcategory of the category
    Subcat,
    /// A media file in the category
    File,
}

impl LinkKind {
    /// Returns the value stored in `categorylinks.cl_type`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Subcat => "subcat",
            Self::File => "file",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts reported by [`WikiDb::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Rows in `page`
    pub page_count: usize,
    /// `categorylinks` rows of type `page`
    pub page_link_count: usize,
    /// `categorylinks` rows of type `subcat`
    pub subcat_link_count: usize,
    /// `categorylinks` rows of type `file`
    pub file_link_count: usize,
}

/// Handle to the category database.
///
/// Holds one connection per worker. Each query locks the connection chosen
/// by the calling rayon thread's index, so workers in a pool of the same
/// size never wait on each other. Connections close when the handle drops.
pub struct WikiDb {
    conns: Vec<Mutex<Connection>>,
    path: PathBuf,
}

impl WikiDb {
    /// Open an existing database read-only with `connections` connections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file does not exist or lacks the
    /// `page` and `categorylinks` tables, or a database error if it cannot
    /// be opened.
    pub fn open(path: &Path, connections: usize) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "database not found: {}",
                path.display()
            )));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conns = (0..connections.max(1))
            .map(|_| Connection::open_with_flags(path, flags).map(Mutex::new))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let db = Self {
            conns,
            path: path.to_path_buf(),
        };
        db.check_tables()?;

        debug!(
            path = %path.display(),
            connections = db.conns.len(),
            "Opened category database"
        );
        Ok(db)
    }

    /// Create (or open for writing) a database and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or database cannot be
    /// created.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Rollback journal, not WAL: read-only handles cannot open a WAL
        // database whose -shm file is missing.
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %path.display(), "Created category database");
        Ok(Self {
            conns: vec![Mutex::new(conn)],
            path: path.to_path_buf(),
        })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of connections held.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.conns.len()
    }

    /// Acquire the connection for the current thread.
    ///
    /// Threads outside a rayon pool share the first connection.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        let slot = rayon::current_thread_index().unwrap_or(0) % self.conns.len();
        self.conns[slot].lock().map_err(|e| {
            Error::Internal(format!(
                "database connection mutex poisoned (a thread panicked while holding the lock): {e}"
            ))
        })
    }

    fn check_tables(&self) -> Result<()> {
        let conn = self.connection()?;
        for table in REQUIRED_TABLES {
            let present: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )?;
            if !present {
                return Err(Error::Config(format!(
                    "{} is missing the `{table}` table",
                    self.path.display()
                )));
            }
        }
        Ok(())
    }

    /// Insert a page row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, for example on a duplicate id
    /// or a read-only handle.
    pub fn insert_page(&self, id: PageId, title: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO page (page_id, page_title) VALUES (?1, ?2)",
            params![id.as_i64(), title],
        )?;
        Ok(())
    }

    /// Insert a category link: `from` is a member of category `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_category_link(&self, from: PageId, to: &str, kind: LinkKind) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO categorylinks (cl_from, cl_to, cl_type) VALUES (?1, ?2, ?3)",
            params![from.as_i64(), to, kind.as_str()],
        )?;
        Ok(())
    }

    /// Get row counts for both tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn stats(&self) -> Result<DatabaseStats> {
        let conn = self.connection()?;
        let mut stats = DatabaseStats {
            page_count: conn.query_row("SELECT COUNT(*) FROM page", [], |row| row.get(0))?,
            ..DatabaseStats::default()
        };

        let mut stmt =
            conn.prepare("SELECT cl_type, COUNT(*) FROM categorylinks GROUP BY cl_type")?;
        let rows = stmt.query_map([], |row| {
            let kind: String = row.get(0)?;
            let count: usize = row.get(1)?;
            Ok((kind, count))
        })?;

        for row in rows {
            let (kind, count) = row?;
            match kind.as_str() {
                "page" => stats.page_link_count = count,
                "subcat" => stats.subcat_link_count = count,
                "file" => stats.file_link_count = count,
                other => debug!(kind = other, count, "Ignoring unknown link type"),
            }
        }

        Ok(stats)
    }
}
