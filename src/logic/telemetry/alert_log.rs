//! Bounded Alert Retention
//!
//! Newest-first alert history with a hard capacity. New alerts go in at
//! the head as a batch (batch order preserved); overflow falls off the
//! tail, so the oldest entries are always the ones dropped.

use crate::constants::DEFAULT_ALERT_LOG_CAPACITY;

use super::types::Alert;

// ============================================================================
// ALERT LOG
// ============================================================================

/// Bounded, newest-first alert history
///
/// Identical messages are kept as separate entries; there is no
/// deduplication and no collapsing of repeats.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: Vec<Alert>,
    capacity: usize,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Prepend a batch of alerts, keeping batch order, then enforce capacity
    pub fn push_batch(&mut self, alerts: Vec<Alert>) {
        if alerts.is_empty() {
            return;
        }
        let mut next = alerts;
        next.extend(self.entries.drain(..));
        next.truncate(self.capacity);
        self.entries = next;
    }

    /// Prepend a single alert
    pub fn push(&mut self, alert: Alert) {
        self.push_batch(vec![alert]);
    }

    /// Snapshot of the log, newest first
    pub fn snapshot(&self) -> Vec<Alert> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every retained alert
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_LOG_CAPACITY)
    }
}

// ============================================================================
// TESTS
// ============================================================================
