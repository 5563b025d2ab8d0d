//! Stop-and-wait FTP sender (C7): `IDLE -> SENDING_START ->
//! SENDING_CHUNKS(0..N-1) -> SENDING_END -> DONE/FAILED`.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{info, warn};

use crate::ack::{AckLookup, AckTracker};
use crate::frame::{FrameCodec, FrameType};
use crate::payload::ack::FtpAckPhase;
use crate::payload::ftp::FtpPhase;
use crate::transport::{GenericTransport, Transport};

pub struct FtpSender {
    codec: FrameCodec,
    transport: Arc<Mutex<GenericTransport>>,
    tracker: Arc<AckTracker>,
    src: u8,
    packet_size: usize,
    timeout: Duration,
    max_retries: u32,
}

impl FtpSender {
    pub fn new(
        codec: FrameCodec,
        transport: Arc<Mutex<GenericTransport>>,
        tracker: Arc<AckTracker>,
        src: u8,
        packet_size: usize,
        timeout: Duration,
        max_retries: u32,
    ) -> Self {
        Self {
            codec,
            transport,
            tracker,
            src,
            packet_size: packet_size.max(1),
            timeout,
            max_retries,
        }
    }

    /// Drives the whole transfer to completion or failure. Relies on a
    /// concurrently running reader thread to pump inbound ACKs into the
    /// tracker (see `crate::runtime`); the wait below is a bounded
    /// `Condvar` block, not a busy poll, and not a second independent
    /// reader of the transport.
    pub fn send_file(&self, path: &Path, dst: u8) -> bool {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("ftp send: could not read {}: {e}", path.display());
                return false;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        if !self.run_phase("FTP_START", dst, FtpPhase::Start { name }) {
            warn!(
                "ftp send: START not acknowledged by {dst} after {} retries, proceeding anyway",
                self.max_retries
            );
        }

        let chunks: Vec<&[u8]> = if data.is_empty() {
            Vec::new()
        } else {
            data.chunks(self.packet_size).collect()
        };
        let total = chunks.len() as u32;

        for (seq, chunk) in chunks.into_iter().enumerate() {
            let key = format!("FTP_CHUNK_{seq}");
            let ok = self.run_phase(
                &key,
                dst,
                FtpPhase::Chunk {
                    seq: seq as u32,
                    data: chunk.to_vec(),
                },
            );
            if !ok {
                warn!("ftp send: chunk {seq} to {dst} failed after {} retries", self.max_retries);
                return false;
            }
        }

        if !self.run_phase("FTP_END", dst, FtpPhase::End { total_chunks: total }) {
            warn!("ftp send: END not acknowledged by {dst}");
            return false;
        }

        info!(
            "ftp send: {} delivered to {dst} in {total} chunk(s)",
            path.display()
        );
        true
    }

    /// Runs one phase of the state machine with retries: clear the tracker
    /// entry, send, wait for it to be refilled, repeat on NACK/timeout.
    fn run_phase(&self, key: &str, dst: u8, body: FtpPhase) -> bool {
        let phase = match &body {
            FtpPhase::Start { .. } => FtpAckPhase::Start,
            FtpPhase::Chunk { .. } => FtpAckPhase::Chunk,
            FtpPhase::End { .. } => FtpAckPhase::End,
        };
        let payload = body.encode();

        for attempt in 0..=self.max_retries {
            self.tracker.clear(key, dst);
            if let Err(e) = self.send_frame(dst, &payload) {
                warn!("ftp send: transport error sending {phase:?} (attempt {attempt}): {e}");
                continue;
            }
            match self.tracker.wait(key, dst, self.timeout) {
                AckLookup::Value(0) => return true,
                AckLookup::Value(status) => {
                    warn!("ftp send: {key} to {dst} NACKed with status {status} (attempt {attempt})");
                }
                AckLookup::Expired | AckLookup::None => {
                    warn!("ftp send: {key} to {dst} timed out (attempt {attempt})");
                }
            }
        }
        false
    }

    fn send_frame(&self, dst: u8, payload: &[u8]) -> Result<(), crate::transport::TransportError> {
        let frame = self
            .codec
            .encode(FrameType::File, self.src, dst, payload)
            .expect("ftp payload always fits the 16-bit frame length field");
        self.transport
            .lock()
            .expect("transport mutex poisoned")
            .send(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ack::dispatch::send_ftp_ack;
    use crate::transport::mock::MockTransport;
    use std::thread;

    /// A minimal stand-in for the reader thread: decodes and acks every
    /// `File` frame addressed to `responder_id` as a success, so the sender
    /// under test makes progress without a full router.
    fn spawn_auto_responder(
        codec: FrameCodec,
        mut channel: MockTransport,
        responder_id: u8,
        stop: Arc<std::sync::atomic::AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let mut framer = crate::framer::Framer::new(0xFE, None);
            while !stop.load(std::sync::atomic::Ordering::Relaxed) {
                let bytes = channel.read().unwrap_or_default();
                if !bytes.is_empty() {
                    framer.push(&bytes);
                }
                while let Some(Ok(frame)) = framer.next_frame(&codec) {
                    if frame.frame_type != FrameType::File {
                        continue;
                    }
                    let phase = FtpPhase::decode(&frame.payload).unwrap();
                    let ack_phase = match phase {
                        FtpPhase::Start { .. } => FtpAckPhase::Start,
                        FtpPhase::Chunk { .. } => FtpAckPhase::Chunk,
                        FtpPhase::End { .. } => FtpAckPhase::End,
                    };
                    let seq = match phase {
                        FtpPhase::Chunk { seq, .. } => seq,
                        _ => 0,
                    };
                    let reply =
                        send_ftp_ack(&codec, responder_id, frame.src, ack_phase, true, seq).unwrap();
                    channel.send(&reply).unwrap();
                }
                thread::sleep(Duration::from_millis(1));
            }
        })
    }

    #[test]
    fn send_file_completes_against_an_auto_acking_peer() {
        let codec = FrameCodec::new(0xFE, 0xFD, 1);
        let (sender_channel, responder_channel) = MockTransport::new_pair();
        let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let handle = spawn_auto_responder(codec, responder_channel, 9, stop.clone());

        let transport = Arc::new(Mutex::new(GenericTransport::Mock(sender_channel)));
        let tracker = Arc::new(AckTracker::new());
        let sender = FtpSender::new(codec, transport, tracker, 1, 8, Duration::from_millis(200), 3);

        let mut path = std::env::temp_dir();
        path.push(format!(
            "mesh-node-ftp-sender-test-{:x}.bin",
            std::ptr::addr_of!(sender) as usize
        ));
        fs::write(&path, b"hello world, this spans more than one packet").unwrap();

        let ok = sender.send_file(&path, 9);

        stop.store(true, std::sync::atomic::Ordering::Relaxed);
        handle.join().unwrap();
        fs::remove_file(&path).ok();

        assert!(ok);
    }
}
