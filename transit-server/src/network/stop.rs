//! Stop lookup keys.

use std::fmt;

/// Case-insensitive lookup key for a stop.
///
/// Built from a display name by trimming surrounding whitespace and
/// lower-casing, so `" Park Street"` and `"park street"` share a key.
/// Display names are kept separately by the graph.
///
/// # Examples
///
/// ```
/// use transit_server::network::StopKey;
///
/// let key = StopKey::new("  Park Street ");
/// assert_eq!(key.as_str(), "park street");
/// assert_eq!(key, StopKey::new("PARK STREET"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopKey(String);

impl StopKey {
    /// Build the key for a stop display name.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key was built from a blank name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for StopKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopKey({})", self.0)
    }
}

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
