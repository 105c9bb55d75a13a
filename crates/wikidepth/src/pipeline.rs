//! End-to-end crawl orchestration.
//!
//! A crawl runs four strictly ordered phases:
//!
//! 1. Load the [`EdgeStore`] from the edge-list cache (building the cache
//!    from the database first if needed)
//! 2. Assign depths from the seeds and write the subcategories file
//! 3. Aggregate the pages of every discovered subcategory
//! 4. Resolve and write the pages file
//!
//! Nothing produced by one phase is modified by a later one.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::info;
use wikidepth_edgelist::validate_title;

use crate::aggregate::aggregate_pages;
use crate::cache::{load_cache, load_or_build, CacheBuild};
use crate::config::Config;
use crate::db::WikiDb;
use crate::error::{Error, ItemError, Result};
use crate::graph::{assign_depths_with, DepthOptions, EdgeStore};
use crate::output::{pages_path, subcategories_path, write_pages_file, write_subcategories_file};
use crate::source::{LinkSource, PageResolver, PageSource};
use crate::types::DepthMap;

/// Per-run options that are not part of [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Seed categories, in command-line order
    pub seeds: Vec<String>,
    /// Rebuild the edge-list cache even if it exists
    pub refresh_cache: bool,
    /// Stop after writing the subcategories file
    pub skip_pages: bool,
    /// Depth assignment strategy and cap
    pub depth: DepthOptions,
}

/// Wall-clock time spent in each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Loading (and possibly building) the cache
    pub load: Duration,
    /// Depth assignment and the subcategories file
    pub depths: Duration,
    /// Page aggregation
    pub aggregate: Duration,
    /// Page resolution and the pages file
    pub pages: Duration,
}

/// Statistics from a completed crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Edges in the loaded cache
    pub edges: usize,
    /// Distinct categories in the loaded cache
    pub categories: usize,
    /// Set when the cache was built during this run
    pub cache_built: Option<CacheBuild>,
    /// Cache lines that could not be read
    pub cache_warnings: usize,
    /// Categories discovered, seeds included
    pub subcategories: usize,
    /// Distinct pages found in discovered categories
    pub pages_discovered: usize,
    /// Lines written to the pages file
    pub pages_written: usize,
    /// Per-category and per-page failures that were skipped
    pub failures: Vec<ItemError>,
    /// Path of the subcategories file
    pub subcategories_path: PathBuf,
    /// Path of the pages file, unless pages were skipped
    pub pages_path: Option<PathBuf>,
    /// Time spent per phase
    pub durations: PhaseDurations,
}

/// Result of the discovery phases, without any files written.
#[derive(Debug)]
pub struct Discovery {
    /// The loaded category graph
    pub store: EdgeStore,
    /// Depth of every discovered category
    pub depths: DepthMap,
    /// Cache lines that could not be read
    pub cache_warnings: usize,
    /// Set when the cache was built during this run
    pub cache_built: Option<CacheBuild>,
}

/// Check that seeds can be crawled and written.
///
/// # Errors
///
/// Returns [`Error::Usage`] if there are no seeds, or a seed is empty or
/// contains whitespace.
pub fn validate_seeds(seeds: &[String]) -> Result<()> {
    if seeds.is_empty() {
        return Err(Error::Usage(
            "at least one seed category is required".to_string(),
        ));
    }
    for seed in seeds {
        validate_title(seed).map_err(|e| Error::Usage(format!("invalid seed category: {e}")))?;
    }
    Ok(())
}

/// Run a full crawl against the database named in `config`.
///
/// # Errors
///
/// Returns an error on invalid seeds or configuration, if the database
/// cannot be opened, or on any fatal error from [`crawl_with`].
pub fn crawl(config: &Config, options: &CrawlOptions) -> Result<CrawlSummary> {
    validate_seeds(&options.seeds)?;
    config.validate()?;

    let db = WikiDb::open(&config.database, config.jobs)?;
    crawl_with(&db, config, options)
}

/// Run a full crawl against any source.
///
/// Only `config.cache`, `config.output_dir` and `config.jobs` are used;
/// the source replaces `config.database`.
///
/// # Errors
///
/// Returns an error on invalid seeds, if the cache cannot be built or
/// read, or if an output file cannot be written. Per-item lookup failures
/// are reported in [`CrawlSummary::failures`] instead.
pub fn crawl_with<S>(source: &S, config: &Config, options: &CrawlOptions) -> Result<CrawlSummary>
where
    S: LinkSource + PageSource + PageResolver,
{
    validate_seeds(&options.seeds)?;
    info!(seeds = ?options.seeds, "Starting crawl");

    let phase = Instant::now();
    let loaded = load_or_build(source, &config.cache, options.refresh_cache)?;
    let mut summary = CrawlSummary {
        edges: loaded.store.edge_count(),
        categories: loaded.store.category_count(),
        cache_built: loaded.built,
        cache_warnings: loaded.warnings.len(),
        ..CrawlSummary::default()
    };
    summary.durations.load = phase.elapsed();

    let phase = Instant::now();
    let depths = assign_depths_with(&options.seeds, &loaded.store, &options.depth);
    summary.subcategories = depths.len();
    info!(subcategories = depths.len(), "Assigned depths");

    let subcats_path = subcategories_path(&config.output_dir, &options.seeds);
    write_subcategories_file(&depths, &loaded.store, &subcats_path)?;
    summary.subcategories_path = subcats_path;
    summary.durations.depths = phase.elapsed();

    // The graph is no longer needed once the subcategories file is written.
    drop(loaded);

    if options.skip_pages {
        info!("Skipping page aggregation");
        return Ok(summary);
    }

    let phase = Instant::now();
    let aggregation = aggregate_pages(&depths, source, config.jobs)?;
    drop(depths);
    summary.pages_discovered = aggregation.pages.len();
    summary.failures = aggregation.failures;
    summary.durations.aggregate = phase.elapsed();

    let phase = Instant::now();
    let pages_file = pages_path(&config.output_dir, &options.seeds);
    let report = write_pages_file(&aggregation.pages, source, &pages_file, config.jobs)?;
    summary.pages_written = report.written;
    summary.failures.extend(report.failures);
    summary.pages_path = Some(pages_file);
    summary.durations.pages = phase.elapsed();

    info!(
        subcategories = summary.subcategories,
        pages = summary.pages_written,
        failures = summary.failures.len(),
        "Crawl finished"
    );
    Ok(summary)
}

/// Load the category graph and assign depths without writing any results.
///
/// The database is only opened if the cache has to be built.
///
/// # Errors
///
/// Returns an error on invalid seeds or configuration, or if the cache
/// cannot be built or read.
pub fn discover(
    config: &Config,
    seeds: &[String],
    depth: &DepthOptions,
    refresh_cache: bool,
) -> Result<Discovery> {
    validate_seeds(seeds)?;
    config.validate()?;

    let loaded = if refresh_cache || !config.cache.exists() {
        let db = WikiDb::open(&config.database, 1)?;
        load_or_build(&db, &config.cache, refresh_cache)?
    } else {
        load_cache(&config.cache)?
    };

    let depths = assign_depths_with(seeds, &loaded.store, depth);
    Ok(Discovery {
        store: loaded.store,
        depths,
        cache_warnings: loaded.warnings.len(),
        cache_built: loaded.built,
    })
}
