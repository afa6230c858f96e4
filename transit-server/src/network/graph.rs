//! Undirected stop adjacency graph.
//!
//! Built once from line definitions and transfer pairs. Every line hop and
//! every transfer is stored in both directions. Parallel edges are kept:
//! two lines sharing consecutive stops produce two adjacency entries, and
//! the search sees whichever was inserted first.

use std::collections::HashMap;

use tracing::info;

use super::data::{LineDef, TransferPair};
use super::stop::StopKey;

/// Pseudo route identifier for walking transfers.
pub const WALK_ROUTE: &str = "walk";

/// One directed adjacency entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Display name of the neighbouring stop.
    pub neighbor: String,
    /// Route used to reach the neighbour, or [`WALK_ROUTE`].
    pub route_id: String,
}

/// Stop adjacency graph, immutable after [`StopGraph::build`].
#[derive(Debug, Clone, Default)]
pub struct StopGraph {
    adjacency: HashMap<StopKey, Vec<Edge>>,
    /// First display name seen for each key.
    names: HashMap<StopKey, String>,
}

impl StopGraph {
    /// Build the graph.
    ///
    /// Lines are inserted first, in slice order and then stop order,
    /// followed by transfers. This insertion order is the search tie-break
    /// when several shortest paths exist.
    pub fn build(lines: &[LineDef], transfers: &[TransferPair]) -> Self {
        let mut graph = Self::default();

        for line in lines {
            for pair in line.stops.windows(2) {
                graph.add_undirected(&pair[0], &pair[1], &line.route_id);
            }
        }

        for TransferPair(a, b) in transfers {
            graph.add_undirected(a, b, WALK_ROUTE);
        }

        info!(
            stops = graph.stop_count(),
            edges = graph.edge_count(),
            lines = lines.len(),
            transfers = transfers.len(),
            "Built stop graph"
        );

        graph
    }

    fn add_undirected(&mut self, a: &str, b: &str, route_id: &str) {
        self.add_directed(a, b, route_id);
        self.add_directed(b, a, route_id);
    }

    fn add_directed(&mut self, from: &str, to: &str, route_id: &str) {
        let from = from.trim();
        let key = StopKey::new(from);
        self.names
            .entry(key.clone())
            .or_insert_with(|| from.to_string());
        self.adjacency.entry(key).or_default().push(Edge {
            neighbor: to.trim().to_string(),
            route_id: route_id.to_string(),
        });
    }

    /// Returns true if the stop is in the graph.
    pub fn contains(&self, key: &StopKey) -> bool {
        self.adjacency.contains_key(key)
    }

    /// Adjacency list of a stop, in insertion order. Empty for unknown stops.
    pub fn neighbors(&self, key: &StopKey) -> &[Edge] {
        self.adjacency.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Display name for a stop key.
    pub fn display_name(&self, key: &StopKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Number of distinct stops.
    pub fn stop_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed adjacency entries (each undirected edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Returns true if the graph has no stops.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
