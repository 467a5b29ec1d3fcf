// src/db/invalidation.rs
//
// Table invalidation tracking for live queries.
//
// Every write that changed at least one row bumps a version counter.
// Live queries hold a receiver and re-run whenever the version moves.
// Several bumps between two reads collapse into a single re-run.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct InvalidationTracker {
    version: Arc<watch::Sender<u64>>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            version: Arc::new(tx),
        }
    }

    /// Mark the table as changed and wake every live query
    pub fn invalidate(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    /// Receiver that resolves `changed()` on the next invalidation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Current table version
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Number of live queries currently listening
    pub fn listener_count(&self) -> usize {
        self.version.receiver_count()
    }
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}
