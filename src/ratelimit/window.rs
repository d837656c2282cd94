//! Fixed-window counter state, one record per identifier.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

/// A single identifier's counting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    /// Requests admitted in the current window
    pub count: u64,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
}

/// In-memory store of counting windows keyed by identifier.
///
/// Records are created lazily on the first admission check for an
/// identifier and reset in place once their window has passed; physical
/// removal is a housekeeping step, not required for correctness.
#[derive(Debug, Default)]
pub struct WindowStore {
    records: RwLock<HashMap<String, WindowRecord>>,
}

impl WindowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Run one fixed-window admission check for `identifier`.
    ///
    /// The record is created, reset, or incremented under a single write
    /// lock, so concurrent callers observe strictly ordered decisions per
    /// identifier. Every call that does not deny spends a slot. A denial
    /// leaves the record untouched: `count` never passes `max_requests`
    /// while the window is live.
    pub fn admit(&self, identifier: &str, window: Duration, max_requests: u64) -> bool {
        let now = Utc::now();
        let mut records = self.records.write();

        if let Some(record) = records.get_mut(identifier) {
            if now > record.reset_at {
                record.count = 1;
                record.reset_at = window_end(now, window);
                return true;
            }

            if record.count >= max_requests {
                return false;
            }

            record.count += 1;
            return true;
        }

        records.insert(
            identifier.to_string(),
            WindowRecord {
                count: 1,
                reset_at: window_end(now, window),
            },
        );
        true
    }

    /// Read-only snapshot of an identifier's record, if one exists.
    pub fn snapshot(&self, identifier: &str) -> Option<WindowRecord> {
        self.records.read().get(identifier).cloned()
    }

    /// Drop records whose window has passed.
    ///
    /// Scans every tracked identifier, so cost grows with identifier
    /// cardinality; hosts with large identifier spaces should run this from
    /// a periodic background task rather than per request.
    pub fn evict_expired(&self) {
        let now = Utc::now();
        self.records.write().retain(|_, record| now <= record.reset_at);
    }

    /// Number of identifiers currently tracked.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store tracks no identifiers.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Remove all records.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

fn window_end(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now + chrono::Duration::milliseconds(window.as_millis() as i64)
}
