//! Bounded worker pools for database-bound phases.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          crawl                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Phase 1 (Sequential):  Load edge list into EdgeStore        │
//! │  Phase 2 (Sequential):  Depth assignment                     │
//! │  Phase 3 (Parallel):    Page queries, fold + min-merge       │
//! │  Phase 4 (Parallel):    Page resolution in ordered chunks,   │
//! │                         sequential writes                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each pool is sized to the configured job count and matches the number of
//! connections held by [`WikiDb`](crate::db::WikiDb), so every worker has a
//! connection of its own.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};

/// Build a pool of `jobs` worker threads (at least one).
///
/// # Errors
///
/// Returns [`Error::Internal`] if the threads cannot be spawned.
pub fn worker_pool(jobs: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .thread_name(|i| format!("wikidepth-worker-{i}"))
        .build()
        .map_err(|e| Error::Internal(format!("failed to start worker pool: {e}")))
}
