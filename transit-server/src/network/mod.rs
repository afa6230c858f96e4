//! Static transit network: stops, lines, transfers and aliases.
//!
//! All types here are loaded or built once and are read-only afterwards.

mod aliases;
mod data;
mod error;
mod graph;
mod stop;

pub use aliases::AliasMap;
pub use data::{
    DEFAULT_WALK_MINUTES, LineDef, NetworkData, TransferData, TransferPair, load_aliases,
    load_lines, load_transfers,
};
pub use error::LoadError;
pub use graph::{Edge, StopGraph, WALK_ROUTE};
pub use stop::StopKey;
