//! FTP handler (C8, receive side): decodes the phase, drives the buffering
//! receiver, and emits whatever ACK/NACK frames it produces.

use log::warn;

use crate::frame::FrameType;
use crate::payload::ack::AckPayload;
use crate::payload::ftp::FtpPhase;
use crate::router::Router;

pub fn handle(router: &Router, src: u8, payload: &[u8]) {
    let phase = match FtpPhase::decode(payload) {
        Ok(phase) => phase,
        Err(e) => {
            warn!("ftp handler: dropping unparseable FTP frame from {src}: {e}");
            return;
        }
    };

    let outcomes = match router.ftp_receiver.handle(src, router.local_id, phase) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            warn!("ftp handler: failed to process transfer from {src}: {e}");
            return;
        }
    };

    for outcome in outcomes {
        let ack_payload = AckPayload::encode_ftp(outcome.phase, outcome.success, outcome.status);
        router.send_frame(FrameType::Ack, src, &ack_payload);
    }
}
