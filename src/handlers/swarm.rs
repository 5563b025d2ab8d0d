//! Swarm task handler: decodes a GOTO task and hands it to the vehicle
//! bridge, or NACKs unsupported task types. Grounded in the original
//! source's `swarm_handler.py`, minus its blocking `time.sleep(delay)` —
//! that delay is delegated to the job scheduler so it never stalls the
//! reader thread.

use log::{info, warn};

use crate::frame::FrameType;
use crate::payload::ack::{AckPayload, Status};
use crate::payload::command::Command;
use crate::payload::swarm::SwarmTask;
use crate::router::Router;

pub fn handle(router: &Router, src: u8, payload: &[u8]) {
    let task = match SwarmTask::decode(payload) {
        Ok(task) => task,
        Err(e) => {
            warn!("swarm handler: dropping unparseable task from {src}: {e}");
            return;
        }
    };

    match task {
        SwarmTask::Goto {
            task_id,
            start_time,
            lat,
            lon,
            alt,
        } => {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(start_time);
            let delay_ms = start_time.saturating_sub(now).saturating_mul(1000);
            router.scheduler.schedule(task_id as u32, delay_ms);

            info!("swarm handler: GOTO task {task_id} from {src} -> lat={lat} lon={lon} alt={alt}");
            router.vehicle.execute(&Command::Goto { lat, lon, alt });
            reply(router, src, task_id, true, Status::Success);
        }
        SwarmTask::Unknown { task_type, task_id } => {
            warn!("swarm handler: unsupported task type {task_type} (task {task_id}) from {src}");
            reply(router, src, task_id, false, Status::Unsupported);
        }
    }
}

fn reply(router: &Router, dst: u8, task_id: u8, success: bool, status: Status) {
    let payload = AckPayload::encode_generic(task_id, success, status.into());
    router.send_frame(FrameType::Ack, dst, &payload);
}
