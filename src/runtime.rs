//! Runtime loop (C9): the reader thread, the periodic telemetry emitter
//! thread, and the shared cancellation flag that lets both shut down
//! cooperatively before the transport is stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info};

use crate::config::ProtocolConfig;
use crate::frame::{FrameCodec, FrameType};
use crate::framer::Framer;
use crate::payload::telemetry::TelemetryPayload;
use crate::router::Router;
use crate::transport::{GenericTransport, Transport};

const READER_IDLE_SLEEP: Duration = Duration::from_millis(5);

/// Supplies the values broadcast by the telemetry emitter. Out of scope as
/// an external sensor feed (spec.md's §1 non-goals); the default
/// implementation below broadcasts a static heartbeat so the emitter is
/// demonstrable without a real flight controller behind it.
pub trait TelemetrySource: Send + Sync {
    fn sample(&self) -> Vec<TelemetryPayload>;
}

pub struct StaticTelemetrySource;

impl TelemetrySource for StaticTelemetrySource {
    fn sample(&self) -> Vec<TelemetryPayload> {
        vec![TelemetryPayload::Heartbeat {
            mode: "GUIDED".to_string(),
            health: "OK".to_string(),
            armed: true,
            gps_fix: true,
            sat_count: 0,
        }]
    }
}

/// Shared stop flag checked at the top of each worker's loop iteration.
#[derive(Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Reads bytes off the transport, frames them (when framing applies, i.e.
/// the serial/stream transports), and routes every decoded frame. Datagram
/// transports hand one complete frame per read, which the framer also
/// handles correctly since a whole frame is just the smallest thing it can
/// extract.
pub fn spawn_reader(
    router: Arc<Router>,
    transport: Arc<Mutex<GenericTransport>>,
    codec: FrameCodec,
    protocol: ProtocolConfig,
    stop: Cancellation,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut framer = Framer::new(protocol.start_byte, protocol.start_byte_2);
        while !stop.is_cancelled() {
            let bytes = {
                let mut transport = transport.lock().expect("transport mutex poisoned");
                transport.read()
            };
            match bytes {
                Ok(bytes) if !bytes.is_empty() => {
                    framer.push(&bytes);
                    while let Some(result) = framer.next_frame(&codec) {
                        match result {
                            Ok(frame) => router.route(frame),
                            Err(e) => error!("reader: dropping unframeable bytes: {e}"),
                        }
                    }
                }
                Ok(_) => thread::sleep(READER_IDLE_SLEEP),
                Err(e) => {
                    error!("reader: transport error: {e}");
                    thread::sleep(READER_IDLE_SLEEP);
                }
            }
        }
        info!("reader thread stopping");
    })
}

/// Broadcasts `source`'s telemetry sample on `interval` until cancelled.
pub fn spawn_telemetry_emitter(
    transport: Arc<Mutex<GenericTransport>>,
    codec: FrameCodec,
    local_id: u8,
    source: Arc<dyn TelemetrySource>,
    interval: Duration,
    stop: Cancellation,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.is_cancelled() {
            for reading in source.sample() {
                let payload = reading.encode();
                match codec.encode(FrameType::Telemetry, local_id, crate::frame::BROADCAST, &payload) {
                    Ok(bytes) => {
                        if let Err(e) = transport
                            .lock()
                            .expect("transport mutex poisoned")
                            .send(&bytes)
                        {
                            error!("telemetry emitter: send failed: {e}");
                        }
                    }
                    Err(e) => error!("telemetry emitter: encode failed: {e}"),
                }
            }
            thread::sleep(interval);
        }
        info!("telemetry emitter thread stopping");
    })
}

/// Signals cancellation and joins both workers before the caller stops the
/// transport, matching spec.md's ordered-shutdown requirement.
pub fn shutdown(stop: &Cancellation, workers: Vec<JoinHandle<()>>) {
    stop.cancel();
    for worker in workers {
        let _ = worker.join();
    }
}
