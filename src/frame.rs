//! Wire envelope: construction and validation of binary mesh frames.
//!
//! ```text
//! START(1) | VERSION(1) | TYPE(1) | SRC(1) | DST(1) | PLEN(2) | PAYLOAD(PLEN) | CRC(2) | TERMINAL(1)
//! ```

use thiserror::Error;

use crate::crc::FRAME_CRC16;

/// DST value meaning "every node accepts this frame".
pub const BROADCAST: u8 = 0xFF;

/// Fixed size of everything except the payload: start, version, type, src,
/// dst, 2-byte length, 2-byte crc, terminal.
pub const ENVELOPE_OVERHEAD: usize = 10;

/// Offset of the length field within the header.
const HEADER_LEN: usize = 7;

/// The single-byte `TYPE` field of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Command,
    Telemetry,
    Ack,
    Swarm,
    File,
    /// A type byte this node does not recognize. Carried through so the
    /// router can log and drop it rather than failing to decode entirely.
    Unknown(u8),
}

impl From<u8> for FrameType {
    fn from(byte: u8) -> Self {
        match byte {
            b'C' => Self::Command,
            b'T' => Self::Telemetry,
            b'A' => Self::Ack,
            b'S' => Self::Swarm,
            b'F' => Self::File,
            other => Self::Unknown(other),
        }
    }
}

impl From<FrameType> for u8 {
    fn from(value: FrameType) -> Self {
        match value {
            FrameType::Command => b'C',
            FrameType::Telemetry => b'T',
            FrameType::Ack => b'A',
            FrameType::Swarm => b'S',
            FrameType::File => b'F',
            FrameType::Unknown(byte) => byte,
        }
    }
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub version: u8,
    pub frame_type: FrameType,
    pub src: u8,
    pub dst: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    /// `true` if this node should accept the frame: broadcast, or addressed
    /// directly to `local_id`.
    pub fn is_for(&self, local_id: u8) -> bool {
        self.dst == BROADCAST || self.dst == local_id
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame too short: {len} bytes, need at least {ENVELOPE_OVERHEAD}")]
    TooShort { len: usize },
    #[error("bad start byte: found {found:#04x}, expected {expected:#04x}")]
    BadStart { found: u8, expected: u8 },
    #[error("bad terminal byte: found {found:#04x}, expected {expected:#04x}")]
    BadTerminal { found: u8, expected: u8 },
    #[error("protocol version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u8, expected: u8 },
    #[error("frame length mismatch: header declares {declared} total bytes, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("CRC mismatch: received {received:#06x}, computed {computed:#06x}")]
    CrcMismatch { received: u16, computed: u16 },
    #[error("payload of {0} bytes exceeds the 16-bit length field")]
    PayloadTooLarge(usize),
}

/// Encodes and decodes frames against a node's configured protocol constants.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    start_byte: u8,
    terminal_byte: u8,
    version: u8,
}

impl FrameCodec {
    pub fn new(start_byte: u8, terminal_byte: u8, version: u8) -> Self {
        Self {
            start_byte,
            terminal_byte,
            version,
        }
    }

    /// Assembles a frame envelope. Fails if `payload` does not fit in the
    /// 16-bit `PLEN` field; callers that exceed it must fragment at a higher
    /// layer (none is defined by this protocol).
    pub fn encode(
        &self,
        frame_type: FrameType,
        src: u8,
        dst: u8,
        payload: &[u8],
    ) -> Result<Vec<u8>, FrameError> {
        if payload.len() > u16::MAX as usize {
            return Err(FrameError::PayloadTooLarge(payload.len()));
        }

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + 3);
        frame.push(self.start_byte);
        frame.push(self.version);
        frame.push(frame_type.into());
        frame.push(src);
        frame.push(dst);
        frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        frame.extend_from_slice(payload);

        let crc = FRAME_CRC16.checksum(&frame);
        frame.extend_from_slice(&crc.to_be_bytes());
        frame.push(self.terminal_byte);

        Ok(frame)
    }

    /// Validates and parses a single complete frame.
    pub fn decode(&self, data: &[u8]) -> Result<Frame, FrameError> {
        if data.len() < ENVELOPE_OVERHEAD {
            return Err(FrameError::TooShort { len: data.len() });
        }
        if data[0] != self.start_byte {
            return Err(FrameError::BadStart {
                found: data[0],
                expected: self.start_byte,
            });
        }
        if data[data.len() - 1] != self.terminal_byte {
            return Err(FrameError::BadTerminal {
                found: data[data.len() - 1],
                expected: self.terminal_byte,
            });
        }
        let version = data[1];
        if version != self.version {
            return Err(FrameError::VersionMismatch {
                found: version,
                expected: self.version,
            });
        }

        let frame_type = FrameType::from(data[2]);
        let src = data[3];
        let dst = data[4];
        let plen = u16::from_be_bytes([data[5], data[6]]) as usize;
        let declared_total = ENVELOPE_OVERHEAD + plen;
        if data.len() != declared_total {
            return Err(FrameError::LengthMismatch {
                declared: declared_total,
                actual: data.len(),
            });
        }

        let payload_end = HEADER_LEN + plen;
        let payload = data[HEADER_LEN..payload_end].to_vec();

        let received_crc = u16::from_be_bytes([data[payload_end], data[payload_end + 1]]);
        let computed_crc = FRAME_CRC16.checksum(&data[..payload_end]);
        if received_crc != computed_crc {
            return Err(FrameError::CrcMismatch {
                received: received_crc,
                computed: computed_crc,
            });
        }

        Ok(Frame {
            version,
            frame_type,
            src,
            dst,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> FrameCodec {
        FrameCodec::new(0xFE, 0xFD, 1)
    }

    #[test]
    fn round_trips_valid_frames() {
        let codec = codec();
        let encoded = codec
            .encode(FrameType::Telemetry, 1, 2, b"ABC")
            .expect("encode");
        let decoded = codec.decode(&encoded).expect("decode");
        assert_eq!(decoded.frame_type, FrameType::Telemetry);
        assert_eq!(decoded.src, 1);
        assert_eq!(decoded.dst, 2);
        assert_eq!(decoded.payload, b"ABC");
        assert_eq!(decoded.version, 1);
    }

    #[test]
    fn round_trips_empty_payload() {
        let codec = codec();
        let encoded = codec.encode(FrameType::Ack, 5, 6, &[]).expect("encode");
        let decoded = codec.decode(&encoded).expect("decode");
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn rejects_short_frames() {
        let codec = codec();
        assert_eq!(
            codec.decode(&[0xFE, 1, b'T', 1, 2, 0, 0]),
            Err(FrameError::TooShort { len: 7 })
        );
    }

    #[test]
    fn single_byte_flip_anywhere_except_terminal_breaks_decode() {
        let codec = codec();
        let encoded = codec
            .encode(FrameType::Command, 3, 4, b"hello")
            .expect("encode");

        for i in 0..encoded.len() - 1 {
            let mut mutated = encoded.clone();
            mutated[i] ^= 0xFF;
            assert!(
                codec.decode(&mutated).is_err(),
                "byte flip at index {i} should have been rejected"
            );
        }
    }

    #[test]
    fn rejects_version_mismatch() {
        let codec = codec();
        let mut encoded = codec.encode(FrameType::Command, 1, 2, b"x").unwrap();
        encoded[1] = 9;
        // Re-point the CRC check error vs. version check: version is
        // checked before CRC, so this always surfaces as a version mismatch.
        assert_eq!(
            codec.decode(&encoded),
            Err(FrameError::VersionMismatch {
                found: 9,
                expected: 1
            })
        );
    }

    #[test]
    fn unknown_frame_type_still_decodes() {
        let codec = codec();
        let mut encoded = codec.encode(FrameType::Command, 1, 2, b"x").unwrap();
        // Overwrite the type byte with something outside {C,T,A,S,F}; the
        // crc was computed including the original byte so recompute it.
        encoded[2] = b'Z';
        let crc = FRAME_CRC16.checksum(&encoded[..encoded.len() - 3]);
        let crc_bytes = crc.to_be_bytes();
        let len = encoded.len();
        encoded[len - 3] = crc_bytes[0];
        encoded[len - 2] = crc_bytes[1];

        let decoded = codec.decode(&encoded).expect("decode");
        assert_eq!(decoded.frame_type, FrameType::Unknown(b'Z'));
    }

    #[test]
    fn payload_too_large_is_rejected_at_encode() {
        let codec = codec();
        let huge = vec![0u8; u16::MAX as usize + 1];
        assert_eq!(
            codec.encode(FrameType::File, 1, 2, &huge),
            Err(FrameError::PayloadTooLarge(huge.len()))
        );
    }

    #[test]
    fn broadcast_and_direct_addressing() {
        let frame = Frame {
            version: 1,
            frame_type: FrameType::Telemetry,
            src: 1,
            dst: BROADCAST,
            payload: vec![],
        };
        assert!(frame.is_for(1));
        assert!(frame.is_for(200));

        let direct = Frame { dst: 7, ..frame };
        assert!(direct.is_for(7));
        assert!(!direct.is_for(8));
    }
}
