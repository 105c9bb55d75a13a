//! In-memory category graph and depth assignment.
//!
//! [`EdgeStore`] holds the "subcategory-of" links loaded from the edge-list
//! cache. [`assign_depths`] walks it from a set of seed categories and
//! records the shortest hop count to every reachable category.

mod depth;

pub use depth::{assign_depths, assign_depths_with, sorted_by_depth, DepthOptions, Strategy};

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use wikidepth_edgelist::Edge;

/// Parent to children adjacency for the category graph.
///
/// Each title is interned once and shared between the graph node and the
/// lookup index. Duplicate edges are kept, so a child listed twice under the
/// same parent is yielded twice by [`children_of`](Self::children_of).
/// Cycles and self-loops are allowed.
#[derive(Debug, Default)]
pub struct EdgeStore {
    graph: DiGraph<Arc<str>, ()>,
    index: HashMap<Arc<str>, NodeIndex>,
}

impl EdgeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a sequence of edges.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut store = Self::new();
        for edge in edges {
            store.add_edge(&edge.parent, &edge.child);
        }
        store
    }

    /// Records that `child` is a direct subcategory of `parent`.
    pub fn add_edge(&mut self, parent: &str, child: &str) {
        let from = self.intern(parent);
        let to = self.intern(child);
        self.graph.add_edge(from, to, ());
    }

    fn intern(&mut self, title: &str) -> NodeIndex {
        if let Some(&node) = self.index.get(title) {
            return node;
        }
        let title: Arc<str> = Arc::from(title);
        let node = self.graph.add_node(Arc::clone(&title));
        self.index.insert(title, node);
        node
    }

    /// Iterates the direct children of `key`.
    ///
    /// Unknown keys and keys without children yield nothing. No order is
    /// guaranteed.
    pub fn children_of<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.index
            .get(key)
            .into_iter()
            .flat_map(move |&node| self.graph.neighbors(node))
            .map(move |child| self.graph[child].as_ref())
    }

    /// Returns `true` if `key` appears in any edge.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct categories appearing in any edge.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn node_of(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub(crate) fn graph(&self) -> &DiGraph<Arc<str>, ()> {
        &self.graph
    }
}

impl FromIterator<Edge> for EdgeStore {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::from_edges(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_children<'a>(store: &'a EdgeStore, key: &str) -> Vec<&'a str> {
        let mut children: Vec<_> = store.children_of(key).collect();
        children.sort_unstable();
        children
    }

    #[test]
    fn children_of_lists_direct_children() {
        let store = EdgeStore::from_edges([
            Edge::new("A", "B"),
            Edge::new("A", "C"),
            Edge::new("B", "D"),
        ]);

        assert_eq!(sorted_children(&store, "A"), vec!["B", "C"]);
        assert_eq!(sorted_children(&store, "B"), vec!["D"]);
    }

    #[test]
    fn unknown_or_leaf_keys_have_no_children() {
        let store = EdgeStore::from_edges([Edge::new("A", "B")]);

        assert_eq!(store.children_of("B").count(), 0);
        assert_eq!(store.children_of("Missing").count(), 0);
    }

    #[test]
    fn duplicate_edges_yield_duplicate_children() {
        let store = EdgeStore::from_edges([Edge::new("A", "B"), Edge::new("A", "B")]);

        assert_eq!(sorted_children(&store, "A"), vec!["B", "B"]);
        assert_eq!(store.edge_count(), 2);
        assert_eq!(store.category_count(), 2);
    }

    #[test]
    fn self_loops_are_stored() {
        let mut store = EdgeStore::new();
        store.add_edge("A", "A");

        assert_eq!(sorted_children(&store, "A"), vec!["A"]);
        assert_eq!(store.category_count(), 1);
    }

    #[test]
    fn contains_covers_parents_and_children() {
        let store: EdgeStore = [Edge::new("Science", "Physics")].into_iter().collect();

        assert!(store.contains("Science"));
        assert!(store.contains("Physics"));
        assert!(!store.contains("Biology"));
    }

    #[test]
    fn children_outlive_the_lookup_key() {
        let store = EdgeStore::from_edges([Edge::new("A", "B")]);
        let children: Vec<&str> = {
            let key = String::from("A");
            store.children_of(&key).collect()
        };
        assert_eq!(children, vec!["B"]);
    }
}
