//! Keyed, expiring ACK status registry.
//!
//! The source's module-global `_ack_buffer` dict becomes an explicitly
//! constructed value the router and FTP sender both hold a reference to.
//! Entries never expire on their own; expiry is judged at read time against
//! a caller-supplied timeout, same as the source's `get_ack_status`.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckLookup {
    /// No entry was ever registered for this key.
    None,
    /// An entry exists but is older than the caller's timeout.
    Expired,
    /// A fresh status value.
    Value(u32),
}

struct Entry {
    status: u32,
    timestamp: Instant,
}

#[derive(Default)]
struct Table {
    entries: HashMap<(String, u8), Entry>,
}

pub struct AckTracker {
    table: Mutex<Table>,
    condvar: Condvar,
}

impl Default for AckTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AckTracker {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table::default()),
            condvar: Condvar::new(),
        }
    }

    fn normalize(key: &str) -> String {
        key.to_uppercase()
    }

    /// Records (or overwrites) the current status for `key`/`dst` and wakes
    /// any thread blocked in [`Self::wait`].
    pub fn register(&self, key: &str, dst: u8, status: u32) {
        let key = Self::normalize(key);
        {
            let mut table = self.table.lock().expect("ack tracker mutex poisoned");
            table.entries.insert(
                (key, dst),
                Entry {
                    status,
                    timestamp: Instant::now(),
                },
            );
        }
        self.condvar.notify_all();
    }

    /// Non-blocking lookup, judging expiry against `timeout` at the moment
    /// of the call.
    pub fn get(&self, key: &str, dst: u8, timeout: Duration) -> AckLookup {
        let key = Self::normalize(key);
        let table = self.table.lock().expect("ack tracker mutex poisoned");
        Self::lookup(&table, &key, dst, timeout)
    }

    fn lookup(table: &Table, key: &str, dst: u8, timeout: Duration) -> AckLookup {
        match table.entries.get(&(key.to_owned(), dst)) {
            None => AckLookup::None,
            Some(entry) => {
                if entry.timestamp.elapsed() > timeout {
                    AckLookup::Expired
                } else {
                    AckLookup::Value(entry.status)
                }
            }
        }
    }

    /// Blocks (bounded by `timeout`) until an entry appears for `key`/`dst`,
    /// or until `timeout` elapses with none appearing. If an entry is
    /// already present but stale relative to `timeout`, returns `Expired`
    /// immediately rather than waiting.
    pub fn wait(&self, key: &str, dst: u8, timeout: Duration) -> AckLookup {
        let key = Self::normalize(key);
        let deadline = Instant::now() + timeout;
        let mut table = self.table.lock().expect("ack tracker mutex poisoned");

        loop {
            match Self::lookup(&table, &key, dst, timeout) {
                AckLookup::None => {}
                other => return other,
            }

            let now = Instant::now();
            if now >= deadline {
                return AckLookup::None;
            }
            let (guard, timeout_result) = self
                .condvar
                .wait_timeout(table, deadline - now)
                .expect("ack tracker mutex poisoned");
            table = guard;
            if timeout_result.timed_out() && Self::lookup(&table, &key, dst, timeout) == AckLookup::None
            {
                return AckLookup::None;
            }
        }
    }

    pub fn clear(&self, key: &str, dst: u8) {
        let key = Self::normalize(key);
        let mut table = self.table.lock().expect("ack tracker mutex poisoned");
        table.entries.remove(&(key, dst));
    }

    pub fn clear_all(&self) {
        let mut table = self.table.lock().expect("ack tracker mutex poisoned");
        table.entries.clear();
    }

    /// A deep-copy snapshot of all entries, keyed by `(name, dst)`, with the
    /// raw status and age since registration.
    pub fn snapshot(&self) -> HashMap<(String, u8), (u32, Duration)> {
        let table = self.table.lock().expect("ack tracker mutex poisoned");
        table
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), (entry.status, entry.timestamp.elapsed())))
            .collect()
    }

    #[cfg(test)]
    fn register_aged(&self, key: &str, dst: u8, status: u32, age: Duration) {
        let key = Self::normalize(key);
        let mut table = self.table.lock().unwrap();
        table.entries.insert(
            (key, dst),
            Entry {
                status,
                timestamp: Instant::now() - age,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_get_returns_value() {
        let tracker = AckTracker::new();
        tracker.register("takeoff", 1, 0);
        assert_eq!(tracker.get("TAKEOFF", 1, Duration::from_secs(5)), AckLookup::Value(0));
    }

    #[test]
    fn missing_key_is_none() {
        let tracker = AckTracker::new();
        assert_eq!(tracker.get("TAKEOFF", 1, Duration::from_secs(5)), AckLookup::None);
    }

    #[test]
    fn stale_entry_is_expired() {
        let tracker = AckTracker::new();
        tracker.register_aged("TAKEOFF", 1, 0, Duration::from_secs(6));
        assert_eq!(tracker.get("TAKEOFF", 1, Duration::from_secs(5)), AckLookup::Expired);
    }

    #[test]
    fn clear_resets_to_none() {
        let tracker = AckTracker::new();
        tracker.register("TAKEOFF", 1, 0);
        tracker.clear("TAKEOFF", 1);
        assert_eq!(tracker.get("TAKEOFF", 1, Duration::from_secs(5)), AckLookup::None);
    }

    #[test]
    fn clear_all_wipes_every_entry() {
        let tracker = AckTracker::new();
        tracker.register("TAKEOFF", 1, 0);
        tracker.register("LANDING", 2, 0);
        tracker.clear_all();
        assert_eq!(tracker.snapshot().len(), 0);
    }

    #[test]
    fn wait_is_woken_by_a_concurrent_register() {
        use std::sync::Arc;
        use std::thread;

        let tracker = Arc::new(AckTracker::new());
        let writer = tracker.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.register("GOTO", 3, 0);
        });

        let result = tracker.wait("GOTO", 3, Duration::from_secs(1));
        handle.join().unwrap();
        assert_eq!(result, AckLookup::Value(0));
    }

    #[test]
    fn wait_times_out_when_nothing_registers() {
        let tracker = AckTracker::new();
        let result = tracker.wait("GOTO", 3, Duration::from_millis(30));
        assert_eq!(result, AckLookup::None);
    }
}
