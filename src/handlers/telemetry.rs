//! Telemetry handler (C4-consumer): dispatches on the kind tag, writes the
//! decoded record into the telemetry cache. Unknown tags warn and drop.

use log::warn;

use crate::payload::telemetry::TelemetryPayload;
use crate::router::Router;

pub fn handle(router: &Router, src: u8, payload: &[u8]) {
    match TelemetryPayload::decode(payload) {
        Ok(data) => router.telemetry.insert(src, data),
        Err(e) => warn!("telemetry handler: dropping unparseable payload from {src}: {e}"),
    }
}
