//! Fixed in-memory secret provider.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::provider::resolve_all;
use crate::{Result, SecretMap, SecretProvider, short_key};

/// Serves values from a fixed table.
///
/// A requested name matches an entry stored under the full name or under
/// its short key.
#[derive(Clone, Default)]
pub struct StaticSecretProvider {
    values: BTreeMap<String, String>,
}

impl StaticSecretProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticSecretProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for StaticSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSecretProvider")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, names: &[String]) -> Result<SecretMap> {
        resolve_all(names, |name| {
            self.values
                .get(name)
                .or_else(|| self.values.get(short_key(name)))
                .cloned()
        })
    }
}
