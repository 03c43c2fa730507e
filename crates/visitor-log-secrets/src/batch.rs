//! Batched lookups against remote stores that cap names per request.

// Only the parameter-store backend calls into this module.
#![cfg_attr(not(feature = "aws-ssm"), allow(dead_code))]

use std::collections::HashMap;
use std::future::Future;

use crate::provider::resolve_all;
use crate::{Result, SecretMap};

/// What one backend request returned.
#[derive(Debug, Default)]
pub(crate) struct Batch {
    /// `(full name, value)` pairs the store resolved.
    pub(crate) found: Vec<(String, String)>,
    /// Names the store reported as unknown.
    pub(crate) invalid: Vec<String>,
}

/// Resolve `names` in chunks of at most `batch_size`, one `call` per chunk.
///
/// The first failing call aborts the whole fetch. Names absent from every
/// batch (including those reported invalid) end up in [`Error::Missing`].
///
/// [`Error::Missing`]: crate::Error::Missing
pub(crate) async fn fetch_batched<F, Fut>(
    names: &[String],
    batch_size: usize,
    mut call: F,
) -> Result<SecretMap>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Batch>>,
{
    let mut found: HashMap<String, String> = HashMap::with_capacity(names.len());

    for chunk in names.chunks(batch_size.max(1)) {
        tracing::debug!(count = chunk.len(), "Fetching secret batch");
        let batch = call(chunk.to_vec()).await?;
        if !batch.invalid.is_empty() {
            tracing::warn!(invalid = ?batch.invalid, "Store reported invalid names");
        }
        found.extend(batch.found);
    }

    resolve_all(names, |name| found.remove(name))
}
