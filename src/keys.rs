// Key-state registry shared by the input thread (writer) and the control loop (reader)
//
// A key counts as held while it keeps being refreshed. Terminals only report
// presses and auto-repeats, never releases, so an entry that has not been
// refreshed within the timeout is treated as released.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::messages::DriveKey;

/// Keys active in a single tick
pub type KeySet = BTreeSet<DriveKey>;

/// Last time a key was seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: DriveKey,
    pub last_seen: Instant,
}

/// Thread-safe map of key -> last press, with expiry on read
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    entries: Arc<Mutex<HashMap<DriveKey, KeyEvent>>>,
    timeout: Duration,
}

impl KeyRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// Insert or refresh a key
    pub fn record(&self, key: DriveKey, at: Instant) {
        self.entries.lock().insert(
            key,
            KeyEvent {
                key,
                last_seen: at,
            },
        );
    }

    /// Keys seen within the timeout. Expired entries are removed under the same lock.
    pub fn active_keys(&self, now: Instant) -> KeySet {
        let timeout = self.timeout;
        let mut entries = self.entries.lock();
        // saturating: an entry recorded slightly after `now` is still fresh
        entries.retain(|_, event| now.saturating_duration_since(event.last_seen) < timeout);
        entries.keys().copied().collect()
    }

    /// Copy of the raw entries, expired or not
    #[cfg(test)]
    fn snapshot(&self) -> Vec<KeyEvent> {
        self.entries.lock().values().copied().collect()
    }
}
