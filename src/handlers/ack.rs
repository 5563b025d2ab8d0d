//! ACK handler (C6, receive): feeds a decoded `A`-frame into the ACK tracker.

use log::warn;

use crate::ack::dispatch::handle_ack_frame;
use crate::router::Router;

pub fn handle(router: &Router, src: u8, payload: &[u8]) {
    if let Err(e) = handle_ack_frame(&router.ack_tracker, src, payload) {
        warn!("ack handler: dropping unparseable ACK from {src}: {e}");
    }
}
