//! Atomic writes of edge-list files.
//!
//! Data is written to a sibling temporary file (`<name>.tmp`), flushed to
//! disk, and then renamed over the target. Renames within one filesystem are
//! atomic on POSIX, so readers see either the previous cache or the complete
//! new one, never a partial file.
//!
//! # Examples
//!
//! ```no_run
//! use wikidepth_edgelist::{write_edge_list_atomic, Edge};
//!
//! let edges = vec![Edge::new("Physics", "Optics"), Edge::new("Optics", "Lasers")];
//! let written = write_edge_list_atomic("data/subcategory_links_cache", &edges)?;
//! assert_eq!(written, 2);
//! # Ok::<(), wikidepth_edgelist::Error>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::edge::Edge;
use crate::error::Result;
use crate::writer::EdgeListWriter;

/// Removes the temp file on drop unless disarmed.
struct TempFileGuard {
    temp_path: PathBuf,
    armed: bool,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                debug!(path = %self.temp_path.display(), error = %e, "Could not remove temp file");
            }
        }
    }
}

/// An edge-list file that only replaces its target on [`commit`](Self::commit).
///
/// Dropping the value without committing discards everything written and
/// leaves the target untouched.
pub struct AtomicEdgeListFile {
    target: PathBuf,
    writer: EdgeListWriter<File>,
    guard: TempFileGuard,
}

impl AtomicEdgeListFile {
    /// Creates the temporary file next to `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or temporary file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let target = path.as_ref().to_path_buf();
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = make_temp_path(&target);
        let file = File::create(&temp_path)?;
        Ok(Self {
            target,
            writer: EdgeListWriter::new(file),
            guard: TempFileGuard {
                temp_path,
                armed: true,
            },
        })
    }

    /// Writes one edge to the temporary file.
    ///
    /// # Errors
    ///
    /// See [`EdgeListWriter::write_edge`].
    pub fn write_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        self.writer.write_edge(parent, child)
    }

    /// Number of edges written so far.
    #[must_use]
    pub fn edges_written(&self) -> usize {
        self.writer.edges_written()
    }

    /// Flushes, syncs and renames the temporary file over the target.
    ///
    /// Returns the number of edges written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing, syncing or renaming fails. The temporary
    /// file is removed in that case.
    pub fn commit(self) -> Result<usize> {
        let Self {
            target,
            writer,
            mut guard,
        } = self;

        let written = writer.edges_written();
        let file = writer.into_inner()?;
        file.sync_all()?;
        drop(file);

        fs::rename(&guard.temp_path, &target)?;
        guard.armed = false;
        debug!(path = %target.display(), edges = written, "Committed edge list");
        Ok(written)
    }
}

/// Atomically writes `edges` to `path`, returning the number written.
///
/// # Errors
///
/// Returns an error if any title is invalid or an I/O operation fails. On
/// error the previous contents of `path`, if any, are left unchanged.
pub fn write_edge_list_atomic<'a, I>(path: impl AsRef<Path>, edges: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut file = AtomicEdgeListFile::create(path)?;
    for edge in edges {
        file.write_edge(&edge.parent, &edge.child)?;
    }
    file.commit()
}

/// Appends `.tmp` to the file name, keeping any existing extension.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}
