//! Free-text stop name normalisation.

use std::collections::HashMap;

/// Read-only mapping from lower-cased alias to canonical stop name.
///
/// Riders type "park st", "dtx" or "Kendall"; the graph knows
/// "Park Street", "Downtown Crossing" and "Kendall/MIT".
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<String, String>,
}

impl AliasMap {
    /// Create an empty map. Every lookup passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from (alias, canonical name) pairs.
    ///
    /// Alias keys are trimmed and lower-cased so lookups are case-insensitive.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let aliases = pairs
            .into_iter()
            .map(|(alias, name)| (alias.as_ref().trim().to_lowercase(), name.into()))
            .collect();
        Self { aliases }
    }

    /// Resolve a raw stop name to its canonical form.
    ///
    /// Returns the mapped canonical name when the trimmed, lower-cased input
    /// is a known alias. Otherwise returns the trimmed input with its
    /// original casing. Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::network::AliasMap;
    ///
    /// let aliases = AliasMap::from_pairs([("park st", "Park Street")]);
    /// assert_eq!(aliases.normalize("Park St"), "Park Street");
    /// assert_eq!(aliases.normalize(" Unknown Place "), "Unknown Place");
    /// assert_eq!(aliases.normalize(""), "");
    /// ```
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        match self.aliases.get(&trimmed.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => trimmed.to_string(),
        }
    }

    /// Returns the number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if there are no aliases.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
