//! The subcategory edge-list cache.
//!
//! Fetching every subcategory link from the database is the slowest step of
//! a crawl, so the links are written once to a flat edge-list file and
//! loaded from there on later runs.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};
use wikidepth_edgelist::{AtomicEdgeListFile, EdgeListReader, Warning};

use crate::error::Result;
use crate::graph::EdgeStore;
use crate::source::LinkSource;

/// Outcome of [`build_cache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheBuild {
    /// Links written to the cache
    pub links: usize,
    /// Links dropped because a title contained whitespace
    pub skipped: usize,
}

/// An [`EdgeStore`] loaded from the cache file.
#[derive(Debug)]
pub struct LoadedCache {
    /// The category graph
    pub store: EdgeStore,
    /// Lines of the cache that could not be read
    pub warnings: Vec<Warning>,
    /// Set when the cache was (re)built from the source during this load
    pub built: Option<CacheBuild>,
}

/// Fetches every subcategory link from `source` and atomically replaces the
/// cache at `path`.
///
/// A link whose title cannot be represented in the cache format is logged
/// and skipped. If the fetch fails, any previous cache is left in place.
///
/// # Errors
///
/// Returns an error if the source fails or the cache cannot be written.
pub fn build_cache<S: LinkSource + ?Sized>(source: &S, path: &Path) -> Result<CacheBuild> {
    let start = Instant::now();
    info!(path = %path.display(), "Fetching subcategory links");

    let mut file = AtomicEdgeListFile::create(path)?;
    let mut skipped = 0;
    let visited = source.for_each_subcategory_link(&mut |parent, child| {
        match file.write_edge(parent, child) {
            Err(wikidepth_edgelist::Error::InvalidField(reason)) => {
                warn!(parent, child, reason = %reason, "Skipping unrepresentable link");
                skipped += 1;
                Ok(())
            }
            other => other.map_err(Into::into),
        }
    })?;
    let links = file.commit()?;

    info!(
        links,
        skipped,
        visited,
        elapsed = ?start.elapsed(),
        "Wrote subcategory link cache"
    );
    Ok(CacheBuild { links, skipped })
}

/// Loads the cache at `path` into an [`EdgeStore`].
///
/// Unreadable lines are skipped and returned as warnings.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn load_cache(path: &Path) -> Result<LoadedCache> {
    let start = Instant::now();
    let mut reader = EdgeListReader::open(path)?;

    let mut store = EdgeStore::new();
    for edge in reader.by_ref() {
        let edge = edge?;
        store.add_edge(&edge.parent, &edge.child);
    }

    let warnings = reader.warnings().warnings();
    if !warnings.is_empty() {
        warn!(
            path = %path.display(),
            count = warnings.len(),
            "Skipped unreadable cache lines"
        );
        for warning in &warnings {
            debug!(kind = warning.kind(), "{warning}");
        }
    }

    info!(
        path = %path.display(),
        edges = store.edge_count(),
        categories = store.category_count(),
        elapsed = ?start.elapsed(),
        "Loaded subcategory link cache"
    );
    Ok(LoadedCache {
        store,
        warnings,
        built: None,
    })
}

/// Loads the cache, building it from `source` first when it is missing or
/// `refresh` is set.
///
/// A freshly built cache is read back from disk, so both paths produce the
/// same store for the same links.
///
/// # Errors
///
/// Returns an error if building or loading fails.
pub fn load_or_build<S: LinkSource + ?Sized>(
    source: &S,
    path: &Path,
    refresh: bool,
) -> Result<LoadedCache> {
    let built = if refresh || !path.exists() {
        debug!(refresh, path = %path.display(), "Building subcategory link cache");
        Some(build_cache(source, path)?)
    } else {
        None
    };

    let mut loaded = load_cache(path)?;
    loaded.built = built;
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct FakeLinks {
        links: Vec<(&'static str, &'static str)>,
        fail_after: Option<usize>,
        calls: Cell<usize>,
    }

    impl FakeLinks {
        fn new(links: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                links,
                fail_after: None,
                calls: Cell::new(0),
            }
        }
    }

    impl LinkSource for FakeLinks {
        fn for_each_subcategory_link(
            &self,
            visit: &mut dyn FnMut(&str, &str) -> Result<()>,
        ) -> Result<usize> {
            self.calls.set(self.calls.get() + 1);
            for (i, &(parent, child)) in self.links.iter().enumerate() {
                if self.fail_after == Some(i) {
                    return Err(Error::Internal("connection lost".to_string()));
                }
                visit(parent, child)?;
            }
            Ok(self.links.len())
        }
    }

    #[test]
    fn missing_cache_is_built_then_loaded() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("data").join("subcategory_links_cache");
        let source = FakeLinks::new(vec![("A", "B"), ("B", "C"), ("A", "B")]);

        let loaded = load_or_build(&source, &path, false).expect("load");

        assert_eq!(source.calls.get(), 1);
        assert_eq!(
            loaded.built,
            Some(CacheBuild {
                links: 3,
                skipped: 0
            })
        );
        assert_eq!(loaded.store.edge_count(), 3);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn existing_cache_is_not_refetched() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cache");
        std::fs::write(&path, "X Y\n").expect("seed cache");
        let source = FakeLinks::new(vec![("A", "B")]);

        let loaded = load_or_build(&source, &path, false).expect("load");

        assert_eq!(source.calls.get(), 0);
        assert!(loaded.built.is_none());
        assert!(loaded.store.contains("X"));
        assert!(!loaded.store.contains("A"));
    }

    #[test]
    fn refresh_replaces_existing_cache() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cache");
        std::fs::write(&path, "X Y\n").expect("seed cache");
        let source = FakeLinks::new(vec![("A", "B")]);

        let loaded = load_or_build(&source, &path, true).expect("load");

        assert_eq!(source.calls.get(), 1);
        assert!(loaded.store.contains("A"));
        assert!(!loaded.store.contains("X"));
    }

    #[test]
    fn failed_fetch_keeps_previous_cache() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cache");
        std::fs::write(&path, "X Y\n").expect("seed cache");
        let mut source = FakeLinks::new(vec![("A", "B"), ("B", "C")]);
        source.fail_after = Some(1);

        assert!(build_cache(&source, &path).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).expect("read cache"),
            "X Y\n"
        );
    }

    #[test]
    fn unrepresentable_titles_are_skipped() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cache");
        let source = FakeLinks::new(vec![("A", "B"), ("A", "Bad title"), ("", "C")]);

        let build = build_cache(&source, &path).expect("build");

        assert_eq!(
            build,
            CacheBuild {
                links: 1,
                skipped: 2
            }
        );
    }

    #[test]
    fn damaged_lines_become_warnings() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cache");
        std::fs::write(&path, "A B\nbroken\nB C\n").expect("seed cache");

        let loaded = load_cache(&path).expect("load");

        assert_eq!(loaded.store.edge_count(), 2);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].line_number(), 2);
    }
}
