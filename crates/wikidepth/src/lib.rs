//! # wikidepth: category depth crawler
//!
//! Given seed categories of a wiki category graph, wikidepth finds every
//! subcategory reachable through "subcategory-of" links, records the
//! shortest hop count ("depth") from any seed to each one, and then lists
//! the pages directly inside those subcategories, each tagged with the
//! smallest depth of any subcategory containing it.
//!
//! ## Design
//!
//! - **Cache first** - subcategory links are fetched from the database once
//!   and kept in a flat edge-list file ([`cache`])
//! - **In-memory graph** - [`graph::EdgeStore`] holds the links; depth
//!   assignment is a multi-source worklist relaxation
//! - **Best effort** - a failed lookup skips one category or page, never the
//!   run ([`ItemError`])
//! - **Deterministic output** - result files are sorted by depth, then key
//!
//! ## Quick Start
//!
//! ```no_run
//! use wikidepth::{crawl, Config, CrawlOptions};
//!
//! let config = Config::default();
//! let options = CrawlOptions {
//!     seeds: vec!["Physics".to_string()],
//!     ..CrawlOptions::default()
//! };
//!
//! let summary = crawl(&config, &options)?;
//! println!(
//!     "{} subcategories, {} pages",
//!     summary.subcategories, summary.pages_written
//! );
//! # Ok::<(), wikidepth::Error>(())
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod db;
mod error;
pub mod graph;
pub mod output;
pub mod parallel;
pub mod pipeline;
pub mod source;
mod types;

pub use aggregate::{aggregate_pages, PageAggregation};
pub use config::{Config, Overrides};
pub use db::{DatabaseStats, LinkKind, WikiDb};
pub use error::{Error, ItemError, ItemErrorKind, Result};
pub use graph::{assign_depths, assign_depths_with, DepthOptions, EdgeStore, Strategy};
pub use output::{write_pages, write_subcategories, PageWriteReport};
pub use pipeline::{crawl, crawl_with, discover, CrawlOptions, CrawlSummary, Discovery};
pub use source::{LinkSource, PageResolver, PageSource};
pub use types::{DepthMap, PageDepthMap, PageId};
