//! Frame router (C3): address filter, frame-type dispatch, and a boundary
//! that keeps one handler's failure from ever taking the reader thread down.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use log::{debug, error, warn};

use crate::ack::AckTracker;
use crate::frame::{Frame, FrameCodec, FrameType};
use crate::ftp::FtpReceiver;
use crate::handlers;
use crate::telemetry_cache::TelemetryCache;
use crate::transport::{GenericTransport, Transport};
use crate::vehicle::{JobScheduler, VehicleBridge};

pub struct Router {
    pub(crate) local_id: u8,
    pub(crate) codec: FrameCodec,
    pub(crate) transport: Arc<Mutex<GenericTransport>>,
    pub(crate) telemetry: Arc<TelemetryCache>,
    pub(crate) ack_tracker: Arc<AckTracker>,
    pub(crate) ftp_receiver: Arc<FtpReceiver>,
    pub(crate) vehicle: Arc<dyn VehicleBridge>,
    pub(crate) scheduler: Arc<dyn JobScheduler>,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        local_id: u8,
        codec: FrameCodec,
        transport: Arc<Mutex<GenericTransport>>,
        telemetry: Arc<TelemetryCache>,
        ack_tracker: Arc<AckTracker>,
        ftp_receiver: Arc<FtpReceiver>,
        vehicle: Arc<dyn VehicleBridge>,
        scheduler: Arc<dyn JobScheduler>,
    ) -> Self {
        Self {
            local_id,
            codec,
            transport,
            telemetry,
            ack_tracker,
            ftp_receiver,
            vehicle,
            scheduler,
        }
    }

    /// Filters by destination, then dispatches by frame type. Any panic
    /// inside a handler is caught and logged so a single bad frame never
    /// tears down the reader thread that called this.
    pub fn route(&self, frame: Frame) {
        if !frame.is_for(self.local_id) {
            debug!(
                "router: dropping frame for {} (local id {})",
                frame.dst, self.local_id
            );
            return;
        }

        let result = catch_unwind(AssertUnwindSafe(|| match frame.frame_type {
            FrameType::Telemetry => handlers::telemetry::handle(self, frame.src, &frame.payload),
            FrameType::Command => handlers::command::handle(self, frame.src, &frame.payload),
            FrameType::Ack => handlers::ack::handle(self, frame.src, &frame.payload),
            FrameType::File => handlers::ftp::handle(self, frame.src, &frame.payload),
            FrameType::Swarm => handlers::swarm::handle(self, frame.src, &frame.payload),
            FrameType::Unknown(byte) => {
                warn!("router: dropping frame of unknown type {byte:#04x} from {}", frame.src);
            }
        }));

        if result.is_err() {
            error!("router: handler panicked on a frame from {}; dropping and continuing", frame.src);
        }
    }

    pub(crate) fn send_frame(&self, frame_type: FrameType, dst: u8, payload: &[u8]) {
        match self.codec.encode(frame_type, self.local_id, dst, payload) {
            Ok(bytes) => {
                if let Err(e) = self
                    .transport
                    .lock()
                    .expect("transport mutex poisoned")
                    .send(&bytes)
                {
                    error!("router: failed to send reply to {dst}: {e}");
                }
            }
            Err(e) => error!("router: failed to encode reply to {dst}: {e}"),
        }
    }
}
