//! Reference data loading errors.

use std::path::PathBuf;

/// Errors raised while loading the static network description.
///
/// These indicate a broken deployment and are treated as fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A data file or directory could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file is not valid JSON for its format
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A line definition is unusable
    #[error("invalid line {route_id} in {}: {reason}", path.display())]
    InvalidLine {
        path: PathBuf,
        route_id: String,
        reason: &'static str,
    },
}
