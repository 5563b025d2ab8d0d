//! Builders for outgoing `A`/`C` frames and the receive-side registrar that
//! turns a decoded ACK payload into an [`AckTracker`] entry.

use crate::frame::{FrameCodec, FrameError, FrameType};
use crate::payload::ack::{AckPayload, FtpAckPhase};
use crate::payload::command::Command;
use crate::payload::PayloadError;

use super::AckTracker;

/// Builds a generic ACK/NACK frame for a non-FTP command reply.
pub fn send_ack(
    codec: &FrameCodec,
    src: u8,
    dst: u8,
    cmd_id: u8,
    success: bool,
    status: u8,
) -> Result<Vec<u8>, FrameError> {
    let payload = AckPayload::encode_generic(cmd_id, success, status);
    codec.encode(FrameType::Ack, src, dst, &payload)
}

/// Builds an FTP-phase ACK/NACK frame. `status` is the sequence number for
/// [`FtpAckPhase::Chunk`] and is otherwise unused on the wire (sent as 0).
pub fn send_ftp_ack(
    codec: &FrameCodec,
    src: u8,
    dst: u8,
    phase: FtpAckPhase,
    success: bool,
    status: u32,
) -> Result<Vec<u8>, FrameError> {
    let payload = AckPayload::encode_ftp(phase, success, status);
    codec.encode(FrameType::Ack, src, dst, &payload)
}

/// Builds a `C`-type command frame.
pub fn build_command_frame(
    codec: &FrameCodec,
    src: u8,
    dst: u8,
    command: &Command,
) -> Result<Vec<u8>, FrameError> {
    codec.encode(FrameType::Command, src, dst, &command.encode())
}

/// Tracker key an FTP-phase ACK/NACK is registered under. `CHUNK` keys embed
/// the sequence number so the sender can wait on a specific chunk; `START`
/// and `END` are single, protocol-wide keys.
fn ftp_tracker_key(phase: FtpAckPhase, status: u32) -> String {
    match phase {
        FtpAckPhase::Start => "FTP_START".to_string(),
        FtpAckPhase::End => "FTP_END".to_string(),
        FtpAckPhase::Chunk => format!("FTP_CHUNK_{status}"),
    }
}

/// Decodes an `A`-frame payload and registers its outcome into `tracker`,
/// keyed by the command name (or FTP phase) and the frame's source address.
///
/// `START`/`END` always carry a status field of 0 on the wire regardless of
/// ack/nack, so a literal "register the received status" would make a
/// NACK indistinguishable from success. Instead a NACK registers the
/// sentinel `1`, preserving the `0 == success` convention the FTP sender
/// relies on; `CHUNK` already disambiguates by sequence number in the key,
/// so it registers 0 on ack and the real status otherwise.
pub fn handle_ack_frame(tracker: &AckTracker, src: u8, payload: &[u8]) -> Result<(), PayloadError> {
    match AckPayload::decode(payload)? {
        AckPayload::Generic {
            cmd_id,
            ack: _,
            status,
        } => {
            let name = Command::name_for_id(cmd_id);
            tracker.register(name, src, status as u32);
        }
        AckPayload::Ftp { phase, ack, status } => {
            let key = ftp_tracker_key(phase, status);
            let registered = match (phase, ack) {
                (_, true) => 0,
                (FtpAckPhase::Chunk, false) => status,
                (_, false) => 1,
            };
            tracker.register(&key, src, registered);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ack::Status;
    use crate::payload::command::{Command, Takeoff};
    use std::time::Duration;

    fn codec() -> FrameCodec {
        FrameCodec::new(0xFE, 0xFD, 1)
    }

    #[test]
    fn send_ack_builds_a_decodable_frame() {
        let codec = codec();
        let frame_bytes = send_ack(&codec, 1, 2, 0x03, true, Status::Success.into()).unwrap();
        let frame = codec.decode(&frame_bytes).unwrap();
        assert_eq!(frame.frame_type, FrameType::Ack);
        assert_eq!(
            AckPayload::decode(&frame.payload).unwrap(),
            AckPayload::Generic {
                cmd_id: 0x03,
                ack: true,
                status: 0
            }
        );
    }

    #[test]
    fn build_command_frame_round_trips_through_command_decode() {
        let codec = codec();
        let command = Command::Takeoff(Takeoff::Simple { alt: 12.5 });
        let frame_bytes = build_command_frame(&codec, 1, 9, &command).unwrap();
        let frame = codec.decode(&frame_bytes).unwrap();
        let (id, params) = Command::split_cmd_id(&frame.payload).unwrap();
        assert_eq!(Command::decode(id, params).unwrap(), command);
    }

    #[test]
    fn generic_ack_registers_under_command_name() {
        let tracker = AckTracker::new();
        let payload = AckPayload::encode_generic(0x03, true, 0);
        handle_ack_frame(&tracker, 7, &payload).unwrap();
        assert_eq!(
            tracker.get("TAKEOFF", 7, Duration::from_secs(5)),
            crate::ack::AckLookup::Value(0)
        );
    }

    #[test]
    fn generic_nack_registers_the_raw_status() {
        let tracker = AckTracker::new();
        let payload = AckPayload::encode_generic(0x03, false, Status::InvalidParams.into());
        handle_ack_frame(&tracker, 7, &payload).unwrap();
        assert_eq!(
            tracker.get("TAKEOFF", 7, Duration::from_secs(5)),
            crate::ack::AckLookup::Value(1)
        );
    }

    #[test]
    fn ftp_start_nack_is_distinguishable_from_ack() {
        let tracker = AckTracker::new();
        handle_ack_frame(&tracker, 2, &AckPayload::encode_ftp(FtpAckPhase::Start, true, 0)).unwrap();
        assert_eq!(
            tracker.get("FTP_START", 2, Duration::from_secs(5)),
            crate::ack::AckLookup::Value(0)
        );

        handle_ack_frame(&tracker, 3, &AckPayload::encode_ftp(FtpAckPhase::Start, false, 0)).unwrap();
        assert_eq!(
            tracker.get("FTP_START", 3, Duration::from_secs(5)),
            crate::ack::AckLookup::Value(1)
        );
    }

    #[test]
    fn ftp_chunk_ack_and_nack_key_on_sequence_number() {
        let tracker = AckTracker::new();
        handle_ack_frame(&tracker, 4, &AckPayload::encode_ftp(FtpAckPhase::Chunk, true, 5)).unwrap();
        assert_eq!(
            tracker.get("FTP_CHUNK_5", 4, Duration::from_secs(5)),
            crate::ack::AckLookup::Value(0)
        );

        handle_ack_frame(&tracker, 4, &AckPayload::encode_ftp(FtpAckPhase::Chunk, false, 6)).unwrap();
        assert_eq!(
            tracker.get("FTP_CHUNK_6", 4, Duration::from_secs(5)),
            crate::ack::AckLookup::Value(6)
        );
    }
}
