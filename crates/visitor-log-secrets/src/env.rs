//! Environment-variable secret provider.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::provider::resolve_all;
use crate::{Result, SecretMap, SecretProvider, short_key};

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads each requested name's short key from the environment.
///
/// Blank values count as absent. Per-key defaults fill in whatever the
/// environment does not provide.
#[derive(Clone)]
pub struct EnvSecretProvider {
    lookup: Lookup,
    defaults: BTreeMap<String, String>,
}

impl EnvSecretProvider {
    /// Create a provider backed by the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Create a provider backed by an arbitrary lookup function.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
            defaults: BTreeMap::new(),
        }
    }

    /// Use `value` when `key` is not set.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let key = short_key(name);
        (self.lookup)(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.defaults.get(key).cloned())
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnvSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSecretProvider")
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn fetch(&self, names: &[String]) -> Result<SecretMap> {
        resolve_all(names, |name| self.lookup(name))
    }
}
