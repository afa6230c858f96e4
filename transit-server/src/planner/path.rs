//! Shortest-hop path search over the stop graph.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::trace;

use crate::network::{StopGraph, StopKey};

/// A path found by [`find_path`].
///
/// `names` runs from origin to destination inclusive; `routes[i]` is the
/// route used for the hop `names[i] -> names[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    pub names: Vec<String>,
    pub routes: Vec<String>,
}

impl PathResult {
    /// Number of hops (edges traversed).
    pub fn hops(&self) -> usize {
        self.routes.len()
    }
}

/// How the search reached a stop.
struct Parent<'g> {
    prev: StopKey,
    route_id: &'g str,
}

/// Breadth-first search from `origin` to `destination`.
///
/// Returns `None` if either stop is unknown or they are not connected.
/// Stops are matched by [`StopKey`], so case and padding are ignored.
///
/// The result has the minimum hop count. When several shortest paths exist
/// the first edge discovered wins, which follows the graph's insertion
/// order (lines before transfers, each line in stop order). That choice is
/// reproducible but carries no meaning: there is no distance or time
/// weighting.
pub fn find_path(graph: &StopGraph, origin: &str, destination: &str) -> Option<PathResult> {
    let origin = StopKey::new(origin);
    let destination = StopKey::new(destination);

    if !graph.contains(&origin) || !graph.contains(&destination) {
        return None;
    }

    let mut parents: HashMap<StopKey, Option<Parent<'_>>> = HashMap::new();
    parents.insert(origin.clone(), None);

    let mut queue = VecDeque::from([origin]);
    while let Some(node) = queue.pop_front() {
        // Stop on dequeue, not enqueue
        if node == destination {
            break;
        }

        for edge in graph.neighbors(&node) {
            let next = StopKey::new(&edge.neighbor);
            if parents.contains_key(&next) {
                continue;
            }
            parents.insert(
                next.clone(),
                Some(Parent {
                    prev: node.clone(),
                    route_id: &edge.route_id,
                }),
            );
            queue.push_back(next);
        }
    }

    let mut names = Vec::new();
    let mut routes = Vec::new();
    let mut current = &destination;
    loop {
        let parent = parents.get(current)?;
        let name = graph.display_name(current).unwrap_or(current.as_str());
        names.push(name.to_string());
        match parent {
            Some(parent) => {
                routes.push(parent.route_id.to_string());
                current = &parent.prev;
            }
            None => break,
        }
    }

    names.reverse();
    routes.reverse();

    trace!(hops = routes.len(), visited = parents.len(), "Path found");

    Some(PathResult { names, routes })
}
