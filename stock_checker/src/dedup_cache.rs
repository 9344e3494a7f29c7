//! Time-windowed record of notifications already sent
//!
//! A key present and unexpired means "this store + product pair was already
//! notified within the window". Entries only disappear by expiring; the
//! optional sweeper reclaims expired entries to bound memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default suppression window (W)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(300);

/// Default sweep period (P)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(120);

/// Longest accepted window or sweep period (one year)
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Notification dedup cache, key -> expiry instant
#[derive(Debug)]
pub struct DedupCache {
    window: Duration,
    entries: Mutex<HashMap<String, Option<Instant>>>,
}

impl DedupCache {
    /// Windows longer than `MAX_PERIOD` are clamped to it.
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.min(MAX_PERIOD),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Composite key for a store + product pair
    pub fn key(store_code: &str, product_code: &str) -> String {
        format!("{}{}", store_code, product_code)
    }

    /// Check-and-set: returns true (and marks the key) when no unexpired
    /// marker exists, false when a notification was already sent in the window.
    pub fn should_notify(&self, key: &str) -> bool {
        self.should_notify_at(key, Instant::now())
    }

    /// `should_notify` against an explicit clock reading
    pub fn should_notify_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self.lock();
        if let Some(expires_at) = entries.get(key) {
            if is_live(*expires_at, now) {
                return false;
            }
        }
        // None: expiry not representable, marker never expires
        entries.insert(key.to_string(), now.checked_add(self.window));
        true
    }

    /// Drop expired entries, returning how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, expires_at| is_live(*expires_at, now));
        before - entries.len()
    }

    /// Number of entries held, expired or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Poisoning is ignored, entries are plain data
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Option<Instant>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_live(expires_at: Option<Instant>, now: Instant) -> bool {
    expires_at.map_or(true, |at| at > now)
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Spawn the periodic sweep task. Stops when `shutdown` flips to true or its
/// sender is dropped.
pub fn spawn_sweeper(
    cache: Arc<DedupCache>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period.min(MAX_PERIOD));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.sweep();
                    if removed > 0 {
                        log::debug!("Swept {} expired notification markers", removed);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        log::debug!("Dedup sweeper stopping");
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "dedup_cache_tests.rs"]
mod tests;
