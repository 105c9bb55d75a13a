//! Multi-source shortest-depth assignment.
//!
//! Depths are found by worklist relaxation: every seed starts at depth 0,
//! and popping a category offers `depth + 1` to each child. A child whose
//! recorded depth improves is queued again, so the result is the true
//! minimum regardless of the order in which categories are visited. This
//! makes the FIFO and LIFO strategies interchangeable.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use petgraph::graph::NodeIndex;
use tracing::debug;

use super::EdgeStore;
use crate::error::Error;
use crate::types::DepthMap;

/// Order in which the worklist is drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// First in, first out. Each category is usually settled on first visit.
    #[default]
    Worklist,
    /// Last in, first out. Categories are revisited whenever a shorter path
    /// turns up.
    DepthFirst,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worklist => write!(f, "worklist"),
            Self::DepthFirst => write!(f, "depth-first"),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "worklist" | "bfs" => Ok(Self::Worklist),
            "depth-first" | "dfs" => Ok(Self::DepthFirst),
            _ => Err(Error::Usage(format!(
                "invalid strategy '{s}'. Use 'worklist' or 'depth-first'."
            ))),
        }
    }
}

/// Options for [`assign_depths_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthOptions {
    /// Worklist drain order.
    pub strategy: Strategy,
    /// Categories deeper than this are left undiscovered. `None` explores
    /// everything reachable.
    pub max_depth: Option<u32>,
}

/// Assigns the minimum depth from any seed to every reachable category.
///
/// Seeds are at depth 0 even when they do not appear in `store`. Duplicate
/// seeds are harmless. Unreachable categories are absent from the result.
///
/// # Examples
///
/// ```
/// use wikidepth::graph::{assign_depths, EdgeStore};
/// use wikidepth_edgelist::Edge;
///
/// let store = EdgeStore::from_edges([
///     Edge::new("A", "B"),
///     Edge::new("B", "C"),
///     Edge::new("A", "C"),
/// ]);
/// let depths = assign_depths(&["A"], &store);
///
/// assert_eq!(depths["A"], 0);
/// assert_eq!(depths["B"], 1);
/// assert_eq!(depths["C"], 1);
/// ```
pub fn assign_depths<S: AsRef<str>>(seeds: &[S], store: &EdgeStore) -> DepthMap {
    assign_depths_with(seeds, store, &DepthOptions::default())
}

/// Like [`assign_depths`], with an explicit strategy and optional depth cap.
///
/// With `max_depth = Some(k)` the result holds exactly the entries of the
/// uncapped result whose depth is at most `k`.
pub fn assign_depths_with<S: AsRef<str>>(
    seeds: &[S],
    store: &EdgeStore,
    options: &DepthOptions,
) -> DepthMap {
    let graph = store.graph();
    let mut depth: Vec<Option<u32>> = vec![None; graph.node_count()];
    let mut queued = vec![false; graph.node_count()];
    let mut worklist: VecDeque<NodeIndex> = VecDeque::new();
    let mut detached: Vec<&str> = Vec::new();

    for seed in seeds {
        let seed = seed.as_ref();
        match store.node_of(seed) {
            Some(node) if depth[node.index()].is_none() => {
                depth[node.index()] = Some(0);
                queued[node.index()] = true;
                worklist.push_back(node);
            }
            Some(_) => {}
            None => detached.push(seed),
        }
    }

    let mut pops: u64 = 0;
    let mut improvements: u64 = 0;

    loop {
        let next = match options.strategy {
            Strategy::Worklist => worklist.pop_front(),
            Strategy::DepthFirst => worklist.pop_back(),
        };
        let Some(node) = next else { break };
        queued[node.index()] = false;
        pops += 1;

        let Some(current) = depth[node.index()] else {
            continue;
        };
        if options.max_depth.is_some_and(|cap| current >= cap) {
            continue;
        }
        let offered = current.saturating_add(1);

        for child in graph.neighbors(node) {
            let slot = &mut depth[child.index()];
            if slot.is_none_or(|recorded| recorded > offered) {
                *slot = Some(offered);
                improvements += 1;
                if !queued[child.index()] {
                    queued[child.index()] = true;
                    worklist.push_back(child);
                }
            }
        }
    }

    let mut result: DepthMap = graph
        .node_indices()
        .filter_map(|node| depth[node.index()].map(|d| (graph[node].to_string(), d)))
        .collect();
    for seed in detached {
        result.entry(seed.to_string()).or_insert(0);
    }

    debug!(
        strategy = %options.strategy,
        pops,
        improvements,
        discovered = result.len(),
        "Depth assignment finished"
    );
    result
}

/// Returns the entries of `depths` ordered by depth, then by title.
#[must_use]
pub fn sorted_by_depth(depths: &DepthMap) -> Vec<(&str, u32)> {
    let mut entries: Vec<(&str, u32)> = depths.iter().map(|(k, &d)| (k.as_str(), d)).collect();
    entries.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    entries
}
