//! Telemetry cache (C10): the last-seen telemetry record per `(src, kind)`.
//! Out of scope as an external collaborator, but a runtime needs a concrete
//! instance to demonstrate the telemetry handler end to end. Shaped after
//! the ACK tracker's own map+mutex idiom (C5) for consistency.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use crate::payload::telemetry::{TelemetryKind, TelemetryPayload};

#[derive(Debug, Clone)]
pub struct TelemetryRecord {
    pub kind: TelemetryKind,
    pub data: TelemetryPayload,
    pub received_at: Instant,
}

#[derive(Default)]
pub struct TelemetryCache {
    records: Mutex<HashMap<(u8, u8), TelemetryRecord>>,
}

impl TelemetryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, src: u8, data: TelemetryPayload) {
        let kind = data.kind();
        let mut records = self.records.lock().expect("telemetry cache mutex poisoned");
        records.insert(
            (src, kind.tag()),
            TelemetryRecord {
                kind,
                data,
                received_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, src: u8, kind: TelemetryKind) -> Option<TelemetryRecord> {
        let records = self.records.lock().expect("telemetry cache mutex poisoned");
        records.get(&(src, kind.tag())).cloned()
    }

    /// A deep-copy-equivalent of every record, for UI/test consumption
    /// without holding the lock.
    pub fn snapshot(&self) -> Vec<TelemetryRecord> {
        let records = self.records.lock().expect("telemetry cache mutex poisoned");
        records.values().cloned().collect()
    }

    pub fn reset(&self) {
        let mut records = self.records.lock().expect("telemetry cache mutex poisoned");
        records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_round_trips_the_latest_record() {
        let cache = TelemetryCache::new();
        cache.insert(
            3,
            TelemetryPayload::Gps {
                lat: 1.0,
                lon: 2.0,
                alt: 3.0,
            },
        );
        let record = cache.get(3, TelemetryKind::Gps).expect("record present");
        assert_eq!(
            record.data,
            TelemetryPayload::Gps {
                lat: 1.0,
                lon: 2.0,
                alt: 3.0
            }
        );
    }

    #[test]
    fn newer_insert_overwrites_the_same_key() {
        let cache = TelemetryCache::new();
        cache.insert(
            1,
            TelemetryPayload::Battery {
                voltage: 11.0,
                current: 1.0,
                percent: 90.0,
            },
        );
        cache.insert(
            1,
            TelemetryPayload::Battery {
                voltage: 10.5,
                current: 1.2,
                percent: 85.0,
            },
        );
        let record = cache.get(1, TelemetryKind::Battery).unwrap();
        assert_eq!(
            record.data,
            TelemetryPayload::Battery {
                voltage: 10.5,
                current: 1.2,
                percent: 85.0
            }
        );
    }

    #[test]
    fn reset_clears_every_entry() {
        let cache = TelemetryCache::new();
        cache.insert(
            1,
            TelemetryPayload::Imu {
                roll: 0.0,
                pitch: 0.0,
                yaw: 0.0,
            },
        );
        cache.reset();
        assert!(cache.snapshot().is_empty());
    }
}
