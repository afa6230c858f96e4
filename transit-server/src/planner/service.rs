//! Route planning service.

use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::network::{LoadError, NetworkData, StopGraph};

use super::legs::{Leg, compress_legs};
use super::path::{PathResult, find_path};
use super::render::render_legs;

/// Outcome of planning a trip between two named stops.
///
/// `ok` is false, with no legs, when either stop is unknown or no path
/// connects them. That is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripPlan {
    pub ok: bool,
    pub origin: String,
    pub destination: String,
    pub legs: Vec<Leg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Route planner over a static network.
///
/// Construct once at startup and share (e.g. behind an `Arc`). The stop
/// graph is built on first use behind a one-time gate: concurrent first
/// callers block until the single build finishes, and every later call
/// reuses it.
#[derive(Debug)]
pub struct RoutePlanner {
    data: NetworkData,
    graph: OnceLock<StopGraph>,
}

impl RoutePlanner {
    /// Create a planner from loaded network data.
    pub fn new(data: NetworkData) -> Self {
        Self {
            data,
            graph: OnceLock::new(),
        }
    }

    /// Load network data from a directory and create a planner.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        NetworkData::load(dir).map(Self::new)
    }

    /// The stop graph, built on first call.
    pub fn graph(&self) -> &StopGraph {
        self.graph
            .get_or_init(|| StopGraph::build(&self.data.lines, &self.data.transfers.pairs))
    }

    /// The loaded reference data.
    pub fn data(&self) -> &NetworkData {
        &self.data
    }

    /// Resolve a free-text stop name to its canonical name.
    pub fn normalize(&self, raw: &str) -> String {
        self.data.aliases.normalize(raw)
    }

    /// Shortest-hop path between two stop names.
    ///
    /// Names are matched case-insensitively but are not alias-resolved;
    /// call [`RoutePlanner::normalize`] first for free text.
    pub fn find_path(&self, origin: &str, destination: &str) -> Option<PathResult> {
        find_path(self.graph(), origin, destination)
    }

    /// Normalise both names, search, and compress the result into legs.
    pub fn plan(&self, origin: &str, destination: &str) -> TripPlan {
        let origin = self.normalize(origin);
        let destination = self.normalize(destination);

        let Some(path) = self.find_path(&origin, &destination) else {
            debug!(%origin, %destination, "No route");
            return TripPlan {
                ok: false,
                origin,
                destination,
                legs: Vec::new(),
                text: None,
            };
        };

        let legs = compress_legs(&path);
        let text = render_legs(&legs, self.data.transfers.default_walk_minutes);

        debug!(
            %origin,
            %destination,
            hops = path.hops(),
            legs = legs.len(),
            "Planned route"
        );

        TripPlan {
            ok: true,
            origin,
            destination,
            legs,
            text: Some(text),
        }
    }
}
