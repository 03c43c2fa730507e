//! In-process visitor store.
//!
//! Same ordering contract as the PostgreSQL store. Can be switched into a
//! failing mode to exercise error paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use visitor_log_core::{Visitor, VisitorName};

use crate::{Error, Result, VisitorStore};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i32,
    rows: Vec<Visitor>,
}

/// Visitor store held in memory. Cheap to clone; clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemoryVisitorStore {
    state: Arc<Mutex<MemoryState>>,
    failing: Arc<AtomicBool>,
    initialized: Arc<AtomicBool>,
}

impl MemoryVisitorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Whether [`VisitorStore::init`] has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Number of stored visitors.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.rows.len()).unwrap_or(0)
    }

    /// Whether no visitor is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("memory store is in failing mode".to_string()));
        }
        Ok(())
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Unavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl VisitorStore for MemoryVisitorStore {
    async fn init(&self) -> Result<()> {
        self.check_available()?;
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn add(&self, name: &VisitorName) -> Result<Visitor> {
        self.check_available()?;
        let mut state = self.state.lock().map_err(poisoned)?;
        state.next_id += 1;
        let visitor = Visitor {
            id: state.next_id,
            name: name.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        };
        state.rows.push(visitor.clone());
        Ok(visitor)
    }

    async fn list(&self) -> Result<Vec<Visitor>> {
        self.check_available()?;
        let state = self.state.lock().map_err(poisoned)?;
        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }
}
