//! Page aggregation: fold the pages of every discovered subcategory into a
//! single page → minimum depth map.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{ItemError, ItemErrorKind, Result};
use crate::graph::sorted_by_depth;
use crate::parallel::worker_pool;
use crate::source::PageSource;
use crate::types::{DepthMap, PageDepthMap, PageId};

/// Progress is logged every this many subcategories.
const PROGRESS_INTERVAL: usize = 10_000;

/// Outcome of [`aggregate_pages`].
#[derive(Debug, Default)]
pub struct PageAggregation {
    /// Minimum depth per page over all discovered owning subcategories
    pub pages: PageDepthMap,
    /// Subcategories whose page query failed, ordered by category
    pub failures: Vec<ItemError>,
    /// Number of subcategories queried
    pub subcategories_queried: usize,
}

/// Per-worker partial result.
#[derive(Default)]
struct Partial {
    pages: PageDepthMap,
    failures: Vec<ItemError>,
}

impl Partial {
    fn record(&mut self, page: PageId, depth: u32) {
        self.pages
            .entry(page)
            .and_modify(|d| *d = (*d).min(depth))
            .or_insert(depth);
    }

    fn merge(mut self, other: Self) -> Self {
        let (mut big, small) = if self.pages.len() >= other.pages.len() {
            (self.pages, other.pages)
        } else {
            (other.pages, self.pages)
        };
        for (page, depth) in small {
            big.entry(page)
                .and_modify(|d| *d = (*d).min(depth))
                .or_insert(depth);
        }
        self.pages = big;
        self.failures.extend(other.failures);
        self
    }
}

/// Progress counters shared by all workers.
struct Progress {
    total: usize,
    accessed: AtomicUsize,
    page_links: AtomicUsize,
}

impl Progress {
    fn tick(&self, pages: usize) {
        let page_links = self.page_links.fetch_add(pages, Ordering::Relaxed) + pages;
        let accessed = self.accessed.fetch_add(1, Ordering::Relaxed) + 1;
        if accessed % PROGRESS_INTERVAL == 0 {
            info!(
                accessed,
                total = self.total,
                page_links,
                "Accessed subcategories"
            );
        }
    }
}

fn visit<S: PageSource + ?Sized>(
    mut acc: Partial,
    category: &str,
    depth: u32,
    source: &S,
    progress: &Progress,
) -> Partial {
    match source.pages_of(category) {
        Ok(pages) => {
            progress.tick(pages.len());
            for page in pages {
                acc.record(page, depth);
            }
        }
        Err(e) => {
            progress.tick(0);
            warn!(category = %category, error = %e, "Failed to list pages of subcategory");
            acc.failures
                .push(ItemError::new(category, ItemErrorKind::PageQuery, &e));
        }
    }
    acc
}

/// Collects every page directly in a discovered subcategory, tagged with the
/// minimum depth of any subcategory containing it.
///
/// A subcategory whose query fails contributes no pages; the failure is
/// logged and returned in [`PageAggregation::failures`]. Queries run on a
/// pool of `jobs` threads; `jobs <= 1` runs them in order on the calling
/// thread. The result does not depend on `jobs`.
///
/// # Errors
///
/// Returns an error only if the worker pool cannot be started.
pub fn aggregate_pages<S: PageSource + ?Sized>(
    subcat_depths: &DepthMap,
    source: &S,
    jobs: usize,
) -> Result<PageAggregation> {
    let start = Instant::now();
    let entries = sorted_by_depth(subcat_depths);
    let progress = Progress {
        total: entries.len(),
        accessed: AtomicUsize::new(0),
        page_links: AtomicUsize::new(0),
    };

    let partial = if jobs <= 1 {
        entries
            .iter()
            .fold(Partial::default(), |acc, &(category, depth)| {
                visit(acc, category, depth, source, &progress)
            })
    } else {
        let pool = worker_pool(jobs)?;
        pool.install(|| {
            entries
                .par_iter()
                .fold(Partial::default, |acc, &(category, depth)| {
                    visit(acc, category, depth, source, &progress)
                })
                .reduce(Partial::default, Partial::merge)
        })
    };

    let Partial {
        pages,
        mut failures,
    } = partial;
    failures.sort_by(|a, b| a.key.cmp(&b.key));

    info!(
        subcategories = entries.len(),
        pages = pages.len(),
        failures = failures.len(),
        elapsed = ?start.elapsed(),
        "Aggregated pages"
    );

    Ok(PageAggregation {
        pages,
        failures,
        subcategories_queried: entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;
    use std::collections::HashMap;

    struct FakePages {
        pages: HashMap<String, Vec<i64>>,
        broken: Vec<String>,
    }

    impl PageSource for FakePages {
        fn pages_of(&self, category: &str) -> Result<Vec<PageId>> {
            if self.broken.iter().any(|b| b == category) {
                return Err(Error::Internal(format!("query for {category} failed")));
            }
            Ok(self
                .pages
                .get(category)
                .map(|ids| ids.iter().copied().map(PageId).collect())
                .unwrap_or_default())
        }
    }

    fn depths(entries: &[(&str, u32)]) -> DepthMap {
        entries.iter().map(|&(k, d)| (k.to_string(), d)).collect()
    }

    fn source() -> FakePages {
        FakePages {
            pages: HashMap::from([
                ("A".to_string(), vec![100, 101]),
                ("B".to_string(), vec![101, 102]),
            ]),
            broken: Vec::new(),
        }
    }

    #[rstest]
    fn keeps_minimum_depth_per_page(#[values(1, 2, 4)] jobs: usize) {
        let result =
            aggregate_pages(&depths(&[("A", 0), ("B", 1)]), &source(), jobs).expect("aggregate");

        assert_eq!(
            result.pages,
            HashMap::from([(PageId(100), 0), (PageId(101), 0), (PageId(102), 1)])
        );
        assert_eq!(result.subcategories_queried, 2);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn min_is_independent_of_which_owner_is_deeper() {
        let result = aggregate_pages(&depths(&[("A", 5), ("B", 2)]), &source(), 1)
            .expect("aggregate");

        assert_eq!(result.pages[&PageId(101)], 2);
        assert_eq!(result.pages[&PageId(100)], 5);
    }

    #[test]
    fn empty_depth_map_yields_no_pages() {
        let result = aggregate_pages(&DepthMap::new(), &source(), 2).expect("aggregate");
        assert!(result.pages.is_empty());
        assert_eq!(result.subcategories_queried, 0);
    }

    #[test]
    fn categories_without_pages_contribute_nothing() {
        let result = aggregate_pages(&depths(&[("Empty", 0)]), &source(), 1).expect("aggregate");
        assert!(result.pages.is_empty());
    }

    #[rstest]
    fn failed_query_skips_only_that_category(#[values(1, 3)] jobs: usize) {
        let mut source = source();
        source.broken.push("B".to_string());

        let result =
            aggregate_pages(&depths(&[("A", 0), ("B", 1)]), &source, jobs).expect("aggregate");

        assert_eq!(
            result.pages,
            HashMap::from([(PageId(100), 0), (PageId(101), 0)])
        );
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].key, "B");
        assert_eq!(result.failures[0].kind, ItemErrorKind::PageQuery);
    }

    #[test]
    fn parallel_and_sequential_agree_on_many_categories() {
        let mut pages = HashMap::new();
        let mut map = DepthMap::new();
        for i in 0..200_i64 {
            let name = format!("C{i}");
            pages.insert(name.clone(), vec![i % 37, i % 11, 1000 + i]);
            map.insert(name, u32::try_from(i % 7).expect("small depth"));
        }
        let source = FakePages {
            pages,
            broken: vec!["C13".to_string()],
        };

        let sequential = aggregate_pages(&map, &source, 1).expect("sequential");
        let parallel = aggregate_pages(&map, &source, 4).expect("parallel");
        assert_eq!(sequential.pages, parallel.pages);
        assert_eq!(sequential.failures, parallel.failures);
    }
}
