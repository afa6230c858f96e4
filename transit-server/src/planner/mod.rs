//! Route planning over the static stop graph.
//!
//! A request flows: free-text names → [`crate::network::AliasMap`] →
//! [`find_path`] (breadth-first, fewest hops) → [`compress_legs`] →
//! [`render_legs`].

mod legs;
mod path;
mod render;
mod service;

pub use legs::{Leg, compress_hops, compress_legs};
pub use path::{PathResult, find_path};
pub use render::render_legs;
pub use service::{RoutePlanner, TripPlan};
