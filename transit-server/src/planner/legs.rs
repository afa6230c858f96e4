//! Compression of hop sequences into rider-facing legs.

use serde::{Deserialize, Serialize};

use super::path::PathResult;

/// A maximal run of consecutive hops on the same route.
///
/// `stops_list` includes both ends. Consecutive legs share their boundary
/// stop: one leg's `to` is the next leg's `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    route_id: String,
    from: String,
    to: String,
    stops_count: usize,
    stops_list: Vec<String>,
}

impl Leg {
    /// Build a leg from its stop list.
    ///
    /// Returns `None` for an empty stop list.
    pub fn new(route_id: impl Into<String>, stops_list: Vec<String>) -> Option<Self> {
        let from = stops_list.first()?.clone();
        let to = stops_list.last()?.clone();
        Some(Self {
            route_id: route_id.into(),
            from,
            to,
            stops_count: stops_list.len() - 1,
            stops_list,
        })
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Number of hops in this leg.
    pub fn stops_count(&self) -> usize {
        self.stops_count
    }

    pub fn stops_list(&self) -> &[String] {
        &self.stops_list
    }
}

/// Compress a path into legs.
pub fn compress_legs(path: &PathResult) -> Vec<Leg> {
    compress_hops(&path.names, &path.routes)
}

/// Compress parallel stop-name and route-id sequences into legs.
///
/// `names[i + 1]` is reached from `names[i]` on `routes[i]`. Either slice
/// being empty yields no legs, so a single-stop path has no legs.
pub fn compress_hops(names: &[String], routes: &[String]) -> Vec<Leg> {
    let (Some(first_stop), Some(first_route)) = (names.first(), routes.first()) else {
        return Vec::new();
    };

    let mut legs = Vec::new();
    let mut current_route = first_route.as_str();
    let mut current_stops = vec![first_stop.clone()];

    for (stop, route) in names[1..].iter().zip(routes) {
        if route != current_route {
            let boundary = current_stops.last().cloned().unwrap_or_default();
            let finished = std::mem::replace(&mut current_stops, vec![boundary]);
            legs.extend(Leg::new(current_route, finished));
            current_route = route.as_str();
        }
        current_stops.push(stop.clone());
    }

    legs.extend(Leg::new(current_route, current_stops));
    legs
}
