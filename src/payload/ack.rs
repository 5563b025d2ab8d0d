//! ACK/NACK payload.
//!
//! Two shapes share the `A` frame type, distinguished by `CMD_ID`:
//! generic (1-byte status) and FTP-phase (4-byte status, `CMD_ID` in
//! `{0x10, 0x11, 0x12}`). The source mixes both widths under both kinds of
//! command depending on which copy of `ack_handler.py` wrote it; this fixes
//! the shape by `CMD_ID` range as spec.md's resolution of that ambiguity.

use super::{read_u32_be, read_u8, PayloadError};

/// Emitted for a positive acknowledgement.
pub const ACK_CODE_ACK: u8 = 0xAA;
/// The single NACK code this node emits.
pub const ACK_CODE_NACK: u8 = 0xFF;
/// A second NACK code seen in the wild that must still be accepted on receive.
pub const ACK_CODE_NACK_ALT: u8 = 0x55;

pub fn is_nack_code(code: u8) -> bool {
    code == ACK_CODE_NACK || code == ACK_CODE_NACK_ALT
}

pub const FTP_ACK_START: u8 = 0x10;
pub const FTP_ACK_CHUNK: u8 = 0x11;
pub const FTP_ACK_END: u8 = 0x12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpAckPhase {
    Start,
    Chunk,
    End,
}

impl FtpAckPhase {
    pub const fn cmd_id(self) -> u8 {
        match self {
            Self::Start => FTP_ACK_START,
            Self::Chunk => FTP_ACK_CHUNK,
            Self::End => FTP_ACK_END,
        }
    }

    fn from_cmd_id(cmd_id: u8) -> Option<Self> {
        match cmd_id {
            FTP_ACK_START => Some(Self::Start),
            FTP_ACK_CHUNK => Some(Self::Chunk),
            FTP_ACK_END => Some(Self::End),
            _ => None,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success = 0,
    InvalidParams = 1,
    Unsupported = 2,
    ExecutionFailed = 3,
    NotMaster = 10,
    MissingTelemetry = 11,
    Exception = 99,
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckPayload {
    Generic { cmd_id: u8, ack: bool, status: u8 },
    Ftp {
        phase: FtpAckPhase,
        ack: bool,
        status: u32,
    },
}

impl AckPayload {
    pub fn encode_generic(cmd_id: u8, success: bool, status: u8) -> Vec<u8> {
        let ack_code = if success { ACK_CODE_ACK } else { ACK_CODE_NACK };
        vec![ack_code, cmd_id, status]
    }

    pub fn encode_ftp(phase: FtpAckPhase, success: bool, status: u32) -> Vec<u8> {
        let ack_code = if success { ACK_CODE_ACK } else { ACK_CODE_NACK };
        let mut out = vec![ack_code, phase.cmd_id()];
        out.extend_from_slice(&status.to_be_bytes());
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        let ack_code = read_u8(data, 0)?;
        let cmd_id = read_u8(data, 1)?;
        let ack = !is_nack_code(ack_code);

        Ok(match FtpAckPhase::from_cmd_id(cmd_id) {
            Some(phase) => AckPayload::Ftp {
                phase,
                ack,
                status: read_u32_be(data, 2)?,
            },
            None => AckPayload::Generic {
                cmd_id,
                ack,
                status: read_u8(data, 2)?,
            },
        })
    }
}
