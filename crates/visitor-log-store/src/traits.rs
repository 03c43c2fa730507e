//! The storage seam request handlers depend on.

use async_trait::async_trait;
use visitor_log_core::{Visitor, VisitorName};

use crate::Result;

/// Persistent visitor storage.
///
/// Implementations must be safe for concurrent use; handlers share one
/// instance behind an `Arc` without further locking.
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Prepare the backing store (create tables, probe liveness).
    async fn init(&self) -> Result<()>;

    /// Insert a visitor; the store assigns `id` and `created_at`.
    async fn add(&self, name: &VisitorName) -> Result<Visitor>;

    /// Every visitor, newest first (ties broken by `id`, highest first).
    async fn list(&self) -> Result<Vec<Visitor>>;
}
