// Fnmap Correlation Store
// Per-key record of recently observed device-origin presses

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::input::event::Timestamp;
use crate::key::LogicalKey;

/// Record of one device-origin press awaiting its system keystroke.
///
/// At most one entry exists per logical key; a repeated device press
/// refreshes the timestamp instead of duplicating. Only the device stream
/// creates entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEntry {
    /// When the device press was observed, on the host clock
    pub observed_at: Timestamp,
    /// Set once the matching system release has used this entry
    pub consumed: bool,
}

/// Mapping from logical key to at most one pending entry.
///
/// Plain single-threaded struct; both producer contexts go through
/// [`SharedCorrelationStore`], which serializes every operation under one
/// lock.
#[derive(Debug, Default)]
pub struct CorrelationStore {
    entries: HashMap<LogicalKey, PendingEntry>,
}

impl CorrelationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the pending entry for a key, if any
    pub fn get(&self, key: LogicalKey) -> Option<&PendingEntry> {
        self.entries.get(&key)
    }

    /// Insert or refresh the pending entry for `key`.
    ///
    /// Called once per device-origin press. An existing entry is
    /// refreshed in place, so a key never holds more than one entry.
    pub fn mark_live(&mut self, key: LogicalKey, now: Timestamp) {
        self.entries.insert(
            key,
            PendingEntry {
                observed_at: now,
                consumed: false,
            },
        );
    }

    /// Time-window liveness: an entry exists, has not been consumed, and
    /// is no older than `window` (inclusive at the boundary).
    pub fn is_live(&self, key: LogicalKey, now: Timestamp, window: u64) -> bool {
        match self.entries.get(&key) {
            Some(entry) => !entry.consumed && now.saturating_sub(entry.observed_at) <= window,
            None => false,
        }
    }

    /// Flag liveness: an entry exists and has not been consumed,
    /// regardless of age. Used by the device-tracked policy, where the
    /// device's own release removes the entry.
    pub fn is_armed(&self, key: LogicalKey) -> bool {
        matches!(self.entries.get(&key), Some(entry) if !entry.consumed)
    }

    /// Mark the entry for `key` consumed and report whether a live entry
    /// existed. Idempotent: consuming an already-consumed or absent key
    /// returns false.
    pub fn consume(&mut self, key: LogicalKey) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) if !entry.consumed => {
                entry.consumed = true;
                true
            }
            _ => false,
        }
    }

    /// Remove the entry for `key`, reporting whether one existed.
    ///
    /// Driven by device releases under the device-tracked policy. Safe to
    /// call for keys with no entry (redundant zero-value reports).
    pub fn clear_live(&mut self, key: LogicalKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    /// Drop consumed entries and entries older than `window`.
    ///
    /// Invoked opportunistically on the query path; there is no
    /// background timer.
    pub fn expire(&mut self, now: Timestamp, window: u64) {
        self.entries
            .retain(|_, entry| !entry.consumed && now.saturating_sub(entry.observed_at) <= window);
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Shared handle to the correlation store.
///
/// Both producer contexts (device-stream callback and system keystroke
/// interception) clone this handle; every operation takes the single lock
/// for one O(1) map operation and returns, so neither producer ever
/// observes a torn entry or blocks for long on the other.
#[derive(Debug, Clone, Default)]
pub struct SharedCorrelationStore {
    inner: Arc<Mutex<CorrelationStore>>,
}

impl SharedCorrelationStore {
    /// Create a new empty shared store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CorrelationStore::new())),
        }
    }

    /// Insert or refresh the pending entry for `key`
    pub fn mark_live(&self, key: LogicalKey, now: Timestamp) {
        self.inner.lock().mark_live(key, now);
    }

    /// Time-window liveness check, with opportunistic expiry of stale
    /// entries under the same lock acquisition.
    pub fn is_live(&self, key: LogicalKey, now: Timestamp, window: u64) -> bool {
        let mut store = self.inner.lock();
        store.expire(now, window);
        store.is_live(key, now, window)
    }

    /// Flag liveness check (device-tracked policy)
    pub fn is_armed(&self, key: LogicalKey) -> bool {
        self.inner.lock().is_armed(key)
    }

    /// Mark the entry for `key` consumed; see [`CorrelationStore::consume`]
    pub fn consume(&self, key: LogicalKey) -> bool {
        self.inner.lock().consume(key)
    }

    /// Remove the entry for `key`; see [`CorrelationStore::clear_live`]
    pub fn clear_live(&self, key: LogicalKey) -> bool {
        self.inner.lock().clear_live(key)
    }

    /// Drop stale entries
    pub fn expire(&self, now: Timestamp, window: u64) {
        self.inner.lock().expire(now, window);
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: LogicalKey = LogicalKey::Digit1;
    const WINDOW: u64 = 50;

    #[test]
    fn test_store_new() {
        let store = CorrelationStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_mark_live_creates_entry() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 100);
        assert_eq!(store.len(), 1);

        let entry = store.get(KEY).unwrap();
        assert_eq!(entry.observed_at, 100);
        assert!(!entry.consumed);
    }

    #[test]
    fn test_mark_live_refreshes_instead_of_duplicating() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 100);
        store.mark_live(KEY, 200);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(KEY).unwrap().observed_at, 200);
    }

    #[test]
    fn test_mark_live_resets_consumed() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 100);
        assert!(store.consume(KEY));

        // A fresh device press re-arms the key
        store.mark_live(KEY, 200);
        assert!(store.is_live(KEY, 210, WINDOW));
    }

    #[test]
    fn test_is_live_window_boundary() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 0);

        // Inclusive at exactly the window
        assert!(store.is_live(KEY, 50, WINDOW));
        // One past the window is dead
        assert!(!store.is_live(KEY, 51, WINDOW));
    }

    #[test]
    fn test_is_live_absent_key() {
        let store = CorrelationStore::new();
        assert!(!store.is_live(KEY, 0, WINDOW));
    }

    #[test]
    fn test_is_live_consumed_entry() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 0);
        store.consume(KEY);
        assert!(!store.is_live(KEY, 10, WINDOW));
    }

    #[test]
    fn test_is_armed_ignores_window() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 0);

        // Far past any window, still armed until the device releases
        assert!(store.is_armed(KEY));
        store.clear_live(KEY);
        assert!(!store.is_armed(KEY));
    }

    #[test]
    fn test_consume_idempotent() {
        let mut store = CorrelationStore::new();
        store.mark_live(KEY, 0);

        assert!(store.consume(KEY));
        assert!(!store.consume(KEY));
    }

    #[test]
    fn test_consume_absent_key() {
        let mut store = CorrelationStore::new();
        assert!(!store.consume(KEY));
    }

    #[test]
    fn test_clear_live_absent_key() {
        let mut store = CorrelationStore::new();
        assert!(!store.clear_live(KEY));
    }

    #[test]
    fn test_expire_drops_stale_and_consumed() {
        let mut store = CorrelationStore::new();
        store.mark_live(LogicalKey::Digit1, 0);
        store.mark_live(LogicalKey::Digit2, 40);
        store.mark_live(LogicalKey::Digit3, 60);
        store.consume(LogicalKey::Digit2);

        store.expire(80, WINDOW);

        // Digit1 aged out, Digit2 was consumed, Digit3 survives
        assert_eq!(store.len(), 1);
        assert!(store.get(LogicalKey::Digit3).is_some());
    }

    #[test]
    fn test_shared_store_expires_on_query() {
        let store = SharedCorrelationStore::new();
        store.mark_live(KEY, 0);

        assert!(!store.is_live(KEY, 100, WINDOW));
        // The stale entry was dropped by the query itself
        assert!(store.is_empty());
    }

    #[test]
    fn test_shared_store_concurrent_stress() {
        use std::thread;

        let store = SharedCorrelationStore::new();
        let device_side = store.clone();
        let system_side = store.clone();

        // Device-stream writer and system-stream reader/consumer hammer
        // the same key from independent threads.
        let writer = thread::spawn(move || {
            for t in 0..10_000u64 {
                device_side.mark_live(KEY, t);
                if t % 3 == 0 {
                    device_side.clear_live(KEY);
                }
            }
        });
        let reader = thread::spawn(move || {
            for t in 0..10_000u64 {
                system_side.is_live(KEY, t, WINDOW);
                if t % 5 == 0 {
                    system_side.consume(KEY);
                }
            }
        });

        writer.join().unwrap();
        reader.join().unwrap();

        // Never more than one entry per key
        assert!(store.len() <= 1);
    }
}
