//! Resolved secret values.

use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

/// Returns the last `/`-separated segment of a parameter name.
///
/// ```
/// use visitor_log_secrets::short_key;
///
/// assert_eq!(short_key("/visitor-log/PGHOST"), "PGHOST");
/// assert_eq!(short_key("PGHOST"), "PGHOST");
/// ```
pub fn short_key(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Secret values keyed by short key.
///
/// `Debug` prints keys only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretMap {
    values: BTreeMap<String, String>,
}

impl SecretMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under the short key of `name`.
    ///
    /// Two names with the same last segment collide; the later one wins.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(short_key(name).to_string(), value.into());
    }

    /// Look up a value by short key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a value by short key, failing if absent.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::Missing {
            names: vec![key.to_string()],
        })
    }

    /// Number of resolved values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the resolved short keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for SecretMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for SecretMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SecretMap::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v);
        }
        map
    }
}
