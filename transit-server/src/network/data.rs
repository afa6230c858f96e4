//! Static reference data: aliases, transfers and line definitions.
//!
//! Layout of a data directory:
//!
//! ```text
//! data/
//!   aliases.json      { "park st": "Park Street", ... }
//!   transfers.json    { "default_walk_minutes": 3, "pairs": [["A", "B"], ...] }
//!   lines/*.json      { "route_id": "Red", "stops": ["Alewife", "Davis", ...] }
//! ```
//!
//! Missing files are tolerated (empty aliases, no transfers, no lines);
//! files that exist but cannot be parsed are fatal.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::aliases::AliasMap;
use super::error::LoadError;

/// Walk time assumed for a transfer when `transfers.json` is absent.
pub const DEFAULT_WALK_MINUTES: u32 = 3;

/// A line: an ordered run of stops served by one route identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDef {
    pub route_id: String,
    pub stops: Vec<String>,
}

impl LineDef {
    /// Create a line from a route id and stop names.
    pub fn new<S: Into<String>>(
        route_id: impl Into<String>,
        stops: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            stops: stops.into_iter().map(Into::into).collect(),
        }
    }
}

/// An unordered pair of stops connected by a walking transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPair(pub String, pub String);

impl TransferPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self(a.into(), b.into())
    }
}

/// Contents of `transfers.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferData {
    #[serde(default = "default_walk_minutes")]
    pub default_walk_minutes: u32,

    #[serde(default)]
    pub pairs: Vec<TransferPair>,
}

fn default_walk_minutes() -> u32 {
    DEFAULT_WALK_MINUTES
}

impl Default for TransferData {
    fn default() -> Self {
        Self {
            default_walk_minutes: DEFAULT_WALK_MINUTES,
            pairs: Vec::new(),
        }
    }
}

/// Everything needed to build the stop graph, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct NetworkData {
    pub aliases: AliasMap,
    pub transfers: TransferData,
    /// Lines ordered by route id.
    pub lines: Vec<LineDef>,
}

impl NetworkData {
    /// Load all reference data from a directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let aliases = load_aliases(&dir.join("aliases.json"))?;
        let transfers = load_transfers(&dir.join("transfers.json"))?;
        let lines = load_lines(&dir.join("lines"))?;

        debug!(
            dir = %dir.display(),
            aliases = aliases.len(),
            transfers = transfers.pairs.len(),
            lines = lines.len(),
            "Loaded network data"
        );

        Ok(Self {
            aliases,
            transfers,
            lines,
        })
    }
}

/// Load `aliases.json`. A missing file yields an empty map.
pub fn load_aliases(path: &Path) -> Result<AliasMap, LoadError> {
    if !path.exists() {
        warn!(path = %path.display(), "No alias file, names will pass through");
        return Ok(AliasMap::new());
    }
    let raw: HashMap<String, String> = read_json(path)?;
    Ok(AliasMap::from_pairs(raw))
}

/// Load `transfers.json`. A missing file yields the default walk time and no pairs.
pub fn load_transfers(path: &Path) -> Result<TransferData, LoadError> {
    if !path.exists() {
        warn!(path = %path.display(), "No transfer file, using defaults");
        return Ok(TransferData::default());
    }
    read_json(path)
}

/// Load every `*.json` line file in a directory.
///
/// Lines are returned in route-id order so the graph's adjacency order does
/// not depend on directory iteration order. A later file with the same
/// route id replaces an earlier one.
pub fn load_lines(dir: &Path) -> Result<Vec<LineDef>, LoadError> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "No lines directory");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut lines: BTreeMap<String, LineDef> = BTreeMap::new();
    for path in paths {
        let line: LineDef = read_json(&path)?;
        validate_line(&line, &path)?;
        if lines.contains_key(&line.route_id) {
            warn!(route = %line.route_id, path = %path.display(), "Duplicate route id, replacing");
        }
        lines.insert(line.route_id.clone(), line);
    }

    Ok(lines.into_values().collect())
}

fn validate_line(line: &LineDef, path: &Path) -> Result<(), LoadError> {
    let invalid = |reason| LoadError::InvalidLine {
        path: path.to_path_buf(),
        route_id: line.route_id.clone(),
        reason,
    };

    if line.route_id.trim().is_empty() {
        return Err(invalid("route id is empty"));
    }
    if line.stops.len() < 2 {
        return Err(invalid("needs at least two stops"));
    }
    if line.stops.iter().any(|s| s.trim().is_empty()) {
        return Err(invalid("contains a blank stop name"));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
