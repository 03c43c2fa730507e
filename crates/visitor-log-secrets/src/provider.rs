//! The provider trait and the shared all-or-nothing resolution rule.

use async_trait::async_trait;

use crate::{Error, Result, SecretMap};

/// A source of named configuration values.
///
/// Implement this for each backing store. `fetch` is called once per
/// process at startup, before anything else is built.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Short name for logs (e.g. `"env"`, `"aws-ssm"`).
    fn name(&self) -> &str;

    /// Resolve every name in `names`.
    ///
    /// The returned map is keyed by [`short_key`](crate::short_key). Fails
    /// with [`Error::Missing`] if any name is absent.
    async fn fetch(&self, names: &[String]) -> Result<SecretMap>;
}

/// Applies `lookup` to every name and fails if any comes back empty.
pub(crate) fn resolve_all<F>(names: &[String], mut lookup: F) -> Result<SecretMap>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut map = SecretMap::new();
    let mut missing = Vec::new();

    for name in names {
        match lookup(name) {
            Some(value) => map.insert(name, value),
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        tracing::error!(missing = ?missing, "Secret resolution incomplete");
        return Err(Error::Missing { names: missing });
    }

    tracing::debug!(count = map.len(), "Secrets resolved");
    Ok(map)
}
