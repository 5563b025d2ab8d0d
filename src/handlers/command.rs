//! Command handler (C4-consumer): validates parameter shape, invokes the
//! (out-of-scope) vehicle bridge, and emits exactly one ACK or NACK per
//! command frame received.

use log::warn;

use crate::frame::FrameType;
use crate::payload::ack::{AckPayload, Status};
use crate::payload::command::Command;
use crate::router::Router;

pub fn handle(router: &Router, src: u8, payload: &[u8]) {
    let (cmd_id, params) = match Command::split_cmd_id(payload) {
        Ok(v) => v,
        Err(_) => {
            warn!("command handler: empty command frame from {src}");
            reply(router, src, 0, false, Status::InvalidParams);
            return;
        }
    };

    match Command::decode(cmd_id, params) {
        Ok(Command::Unknown(id)) => {
            warn!("command handler: unsupported CMD_ID {id:#04x} from {src}");
            reply(router, src, id, false, Status::Unsupported);
        }
        Ok(command) => {
            router.vehicle.execute(&command);
            reply(router, src, cmd_id, true, Status::Success);
        }
        Err(e) => {
            warn!("command handler: invalid params for CMD_ID {cmd_id:#04x} from {src}: {e}");
            reply(router, src, cmd_id, false, Status::InvalidParams);
        }
    }
}

fn reply(router: &Router, dst: u8, cmd_id: u8, success: bool, status: Status) {
    let payload = AckPayload::encode_generic(cmd_id, success, status.into());
    router.send_frame(FrameType::Ack, dst, &payload);
}
