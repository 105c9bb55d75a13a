//! Flat-text result files.
//!
//! Two line-oriented formats, one record per line, fields separated by a
//! single space:
//!
//! ```text
//! subcategories:  <category> <depth> <child_1> ... <child_n>
//! pages:          <page_title> <page_id> <depth> <category_1> ... <category_m>
//! ```
//!
//! Lines are ordered by depth, then by category title (subcategories) or
//! page id (pages), so identical inputs always produce identical files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Error, ItemError, ItemErrorKind, Result};
use crate::graph::{sorted_by_depth, EdgeStore};
use crate::parallel::worker_pool;
use crate::source::PageResolver;
use crate::types::{DepthMap, PageDepthMap, PageId};

/// Progress is logged every this many pages.
const PROGRESS_INTERVAL: usize = 10_000;

/// Pages resolved per parallel batch before the batch is written out.
const RESOLVE_CHUNK: usize = 2_048;

/// Outcome of [`write_pages`].
#[derive(Debug, Default)]
pub struct PageWriteReport {
    /// Lines written
    pub written: usize,
    /// Pages skipped because a lookup failed, in output order
    pub failures: Vec<ItemError>,
}

/// Writes one line per discovered category with its depth and every direct
/// child in `store`, sorted.
///
/// Children are listed whether or not they were discovered themselves.
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing to `out` fails.
pub fn write_subcategories<W: Write>(
    depths: &DepthMap,
    store: &EdgeStore,
    out: W,
) -> Result<usize> {
    let mut out = BufWriter::new(out);
    let mut lines = 0;

    for (category, depth) in sorted_by_depth(depths) {
        let mut children: Vec<&str> = store.children_of(category).collect();
        children.sort_unstable();

        write!(out, "{category} {depth}")?;
        for child in children {
            write!(out, " {child}")?;
        }
        out.write_all(b"\n")?;
        lines += 1;
    }

    out.flush()?;
    debug!(lines, "Wrote subcategories");
    Ok(lines)
}

/// A resolved page line, or the lookup that failed.
type Resolved = std::result::Result<(String, Vec<String>), ItemError>;

fn resolve<R: PageResolver + ?Sized>(resolver: &R, page: PageId) -> Resolved {
    let key = page.to_string();
    let title = resolver
        .title_of(page)
        .map_err(|e| ItemError::new(key.clone(), ItemErrorKind::TitleLookup, &e))?;
    let categories = resolver
        .categories_of(page)
        .map_err(|e| ItemError::new(key, ItemErrorKind::CategoryLookup, &e))?;
    Ok((title, categories))
}

/// Writes one line per page with its title, id, depth and every category it
/// belongs to.
///
/// A page whose title or categories cannot be resolved is skipped; the
/// failure is logged and returned in [`PageWriteReport::failures`]. Lookups
/// run on a pool of `jobs` threads in ordered batches; lines are written
/// in order on the calling thread.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing to `out` fails, or an error if the
/// worker pool cannot be started.
pub fn write_pages<R: PageResolver + ?Sized, W: Write>(
    pages: &PageDepthMap,
    resolver: &R,
    out: W,
    jobs: usize,
) -> Result<PageWriteReport> {
    let start = Instant::now();
    let mut entries: Vec<(PageId, u32)> = pages.iter().map(|(&p, &d)| (p, d)).collect();
    entries.sort_unstable_by_key(|&(page, depth)| (depth, page));

    let pool = if jobs > 1 {
        Some(worker_pool(jobs)?)
    } else {
        None
    };

    let mut out = BufWriter::new(out);
    let mut report = PageWriteReport::default();
    let mut processed = 0;

    for chunk in entries.chunks(RESOLVE_CHUNK) {
        let resolved: Vec<Resolved> = match &pool {
            Some(pool) => pool.install(|| {
                chunk
                    .par_iter()
                    .map(|&(page, _)| resolve(resolver, page))
                    .collect()
            }),
            None => chunk
                .iter()
                .map(|&(page, _)| resolve(resolver, page))
                .collect(),
        };

        for (&(page, depth), line) in chunk.iter().zip(resolved) {
            match line {
                Ok((title, categories)) => {
                    write!(out, "{title} {page} {depth}")?;
                    for category in &categories {
                        write!(out, " {category}")?;
                    }
                    out.write_all(b"\n")?;
                    report.written += 1;
                }
                Err(failure) => {
                    warn!(page = %page, error = %failure.message, kind = %failure.kind, "Skipping page");
                    report.failures.push(failure);
                }
            }

            processed += 1;
            if processed % PROGRESS_INTERVAL == 0 {
                info!(processed, total = entries.len(), "Wrote pages");
            }
        }
    }

    out.flush()?;
    info!(
        written = report.written,
        skipped = report.failures.len(),
        elapsed = ?start.elapsed(),
        "Wrote pages file"
    );
    Ok(report)
}

/// Creates `path` (and its parent directory) for writing.
///
/// # Errors
///
/// Returns [`Error::Io`] naming the path if it cannot be created.
fn create_output(path: &Path) -> Result<File> {
    let annotate = |e: io::Error| {
        Error::Io(io::Error::new(
            e.kind(),
            format!("cannot open {}: {e}", path.display()),
        ))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(annotate)?;
    }
    File::create(path).map_err(annotate)
}

/// [`write_subcategories`] into a newly created file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn write_subcategories_file(
    depths: &DepthMap,
    store: &EdgeStore,
    path: &Path,
) -> Result<usize> {
    let file = create_output(path)?;
    let lines = write_subcategories(depths, store, file)?;
    info!(path = %path.display(), lines, "Wrote subcategories file");
    Ok(lines)
}

/// [`write_pages`] into a newly created file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn write_pages_file<R: PageResolver + ?Sized>(
    pages: &PageDepthMap,
    resolver: &R,
    path: &Path,
    jobs: usize,
) -> Result<PageWriteReport> {
    let file = create_output(path)?;
    write_pages(pages, resolver, file, jobs)
}

fn seeded_name(prefix: &str, seeds: &[String]) -> String {
    let mut name = prefix.to_string();
    for seed in seeds {
        name.push_str("__");
        name.push_str(seed);
    }
    name
}

/// `<dir>/subcategories__<seed1>__<seed2>...`
#[must_use]
pub fn subcategories_path(dir: &Path, seeds: &[String]) -> PathBuf {
    dir.join(seeded_name("subcategories", seeds))
}

/// `<dir>/pages__<seed1>__<seed2>...`
#[must_use]
pub fn pages_path(dir: &Path, seeds: &[String]) -> PathBuf {
    dir.join(seeded_name("pages", seeds))
}
