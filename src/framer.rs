//! Resyncing byte-stream framer layered between an unbounded transport (serial)
//! and [`FrameCodec`](crate::frame::FrameCodec).
//!
//! Scans for the START byte, reads the header to learn `PLEN`, then waits for
//! exactly `10 + PLEN` bytes before handing the candidate to the codec. On a
//! decode failure the framer advances one byte past the START it tried and
//! resyncs from there. Datagram transports (UDP) don't need this: one
//! datagram is one frame.

use crate::frame::{Frame, FrameCodec, FrameError, ENVELOPE_OVERHEAD};

/// Buffers raw bytes from a stream transport and extracts complete frames.
pub struct Framer {
    start_byte: u8,
    /// Optional second sync byte. When set, it must match the frame's
    /// VERSION byte (the byte immediately following START) for a candidate
    /// start position to be attempted; this costs no extra wire bytes and
    /// just raises confidence before a full decode attempt.
    start_byte_2: Option<u8>,
    buf: Vec<u8>,
}

impl Framer {
    pub fn new(start_byte: u8, start_byte_2: Option<u8>) -> Self {
        Self {
            start_byte,
            start_byte_2,
            buf: Vec::new(),
        }
    }

    /// Appends freshly read bytes to the internal buffer.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Attempts to extract and decode the next complete frame. Returns
    /// `None` when there isn't enough buffered data yet to know. Decode
    /// errors on a candidate are returned once (so the caller can log them)
    /// and the framer resyncs internally before the next call.
    pub fn next_frame(&mut self, codec: &FrameCodec) -> Option<Result<Frame, FrameError>> {
        loop {
            let start_index = self.buf.iter().position(|&b| b == self.start_byte)?;
            if start_index > 0 {
                self.buf.drain(0..start_index);
            }

            if let Some(sync2) = self.start_byte_2 {
                if self.buf.len() < 2 {
                    return None;
                }
                if self.buf[1] != sync2 {
                    // False positive START; drop it and keep scanning.
                    self.buf.remove(0);
                    continue;
                }
            }

            if self.buf.len() < 7 {
                return None;
            }
            let plen = u16::from_be_bytes([self.buf[5], self.buf[6]]) as usize;
            let total = ENVELOPE_OVERHEAD + plen;
            if self.buf.len() < total {
                return None;
            }

            let candidate: Vec<u8> = self.buf[..total].to_vec();
            match codec.decode(&candidate) {
                Ok(frame) => {
                    self.buf.drain(0..total);
                    return Some(Ok(frame));
                }
                Err(err) => {
                    // Resync: advance one byte past the START we tried.
                    self.buf.remove(0);
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameType;

    #[test]
    fn extracts_frame_split_across_pushes() {
        let codec = FrameCodec::new(0xFE, 0xFD, 1);
        let encoded = codec.encode(FrameType::Telemetry, 1, 2, b"hi").unwrap();

        let mut framer = Framer::new(0xFE, None);
        framer.push(&encoded[..3]);
        assert!(framer.next_frame(&codec).is_none());
        framer.push(&encoded[3..]);
        let frame = framer.next_frame(&codec).unwrap().unwrap();
        assert_eq!(frame.payload, b"hi");
    }

    #[test]
    fn resyncs_past_garbage_and_crc_failures() {
        let codec = FrameCodec::new(0xFE, 0xFD, 1);
        let good = codec.encode(FrameType::Command, 1, 2, b"ok").unwrap();

        let mut corrupt = codec.encode(FrameType::Command, 1, 2, b"bad").unwrap();
        let last = corrupt.len() - 2;
        corrupt[last] ^= 0xFF; // flip a CRC byte

        let mut stream = vec![0x00, 0x11, 0xFE]; // leading noise that happens to contain a stray START
        stream.extend_from_slice(&corrupt);
        stream.extend_from_slice(&good);

        let mut framer = Framer::new(0xFE, None);
        framer.push(&stream);

        // First pop resyncs past the corrupted frame, returning its error.
        assert!(framer.next_frame(&codec).unwrap().is_err());
        // Second pop finds the valid trailing frame.
        let frame = framer.next_frame(&codec).unwrap().unwrap();
        assert_eq!(frame.payload, b"ok");
    }

    #[test]
    fn two_byte_sync_rejects_stray_start_bytes() {
        let codec = FrameCodec::new(0xFE, 0xFD, 1);
        let encoded = codec.encode(FrameType::Telemetry, 1, 2, b"z").unwrap();

        let mut stream = vec![0xFE, 0x00]; // stray START not followed by version==sync2
        stream.extend_from_slice(&encoded);

        let mut framer = Framer::new(0xFE, Some(1));
        framer.push(&stream);
        let frame = framer.next_frame(&codec).unwrap().unwrap();
        assert_eq!(frame.payload, b"z");
    }
}
