//! Buffering FTP receiver (C8): state keyed by `(src, dst)`. Chunks are held
//! in memory until `END` reports the transfer complete; nothing is flushed
//! to disk before then.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{info, warn};

use super::storage::resolve_download_path;
use super::FtpError;
use crate::payload::ack::FtpAckPhase;
use crate::payload::ftp::FtpPhase;

struct Transfer {
    filename: String,
    chunks: HashMap<u32, Vec<u8>>,
}

/// What the caller should acknowledge back to the sender as a result of
/// handling one inbound FTP frame. A `Vec` because `END` with missing chunks
/// yields one NACK per missing sequence number.
pub struct FtpOutcome {
    pub phase: FtpAckPhase,
    pub success: bool,
    pub status: u32,
}

#[derive(Default)]
pub struct FtpReceiver {
    transfers: Mutex<HashMap<(u8, u8), Transfer>>,
    download_dir: PathBuf,
}

impl FtpReceiver {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            transfers: Mutex::new(HashMap::new()),
            download_dir: download_dir.into(),
        }
    }

    pub fn handle(
        &self,
        src: u8,
        dst: u8,
        phase: FtpPhase,
    ) -> Result<Vec<FtpOutcome>, FtpError> {
        let mut transfers = self.transfers.lock().expect("ftp receiver mutex poisoned");
        match phase {
            FtpPhase::Start { name } => {
                if transfers.contains_key(&(src, dst)) {
                    warn!("ftp receiver: duplicate START from {src} for {dst}, dropping");
                    return Ok(Vec::new());
                }
                transfers.insert(
                    (src, dst),
                    Transfer {
                        filename: name,
                        chunks: HashMap::new(),
                    },
                );
                Ok(vec![FtpOutcome {
                    phase: FtpAckPhase::Start,
                    success: true,
                    status: 0,
                }])
            }
            FtpPhase::Chunk { seq, data } => match transfers.get_mut(&(src, dst)) {
                Some(transfer) => {
                    transfer.chunks.insert(seq, data);
                    Ok(vec![FtpOutcome {
                        phase: FtpAckPhase::Chunk,
                        success: true,
                        status: seq,
                    }])
                }
                None => {
                    warn!("ftp receiver: CHUNK {seq} from {src} with no open transfer, dropping");
                    Ok(Vec::new())
                }
            },
            FtpPhase::End { total_chunks } => {
                let Some(transfer) = transfers.get(&(src, dst)) else {
                    info!("ftp receiver: stale/duplicate END from {src}, ack-and-ignore");
                    return Ok(vec![FtpOutcome {
                        phase: FtpAckPhase::End,
                        success: true,
                        status: 0,
                    }]);
                };

                let missing: Vec<u32> = (0..total_chunks)
                    .filter(|seq| !transfer.chunks.contains_key(seq))
                    .collect();

                if !missing.is_empty() {
                    warn!(
                        "ftp receiver: END from {src} missing {} of {total_chunks} chunks",
                        missing.len()
                    );
                    return Ok(missing
                        .into_iter()
                        .map(|seq| FtpOutcome {
                            phase: FtpAckPhase::Chunk,
                            success: false,
                            status: seq,
                        })
                        .collect());
                }

                let transfer = transfers.remove(&(src, dst)).expect("checked present above");
                let path = resolve_download_path(&self.download_dir, &transfer.filename);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut bytes = Vec::new();
                for seq in 0..total_chunks {
                    bytes.extend_from_slice(&transfer.chunks[&seq]);
                }
                fs::write(&path, &bytes)?;
                info!(
                    "ftp receiver: wrote {} bytes from {src} to {}",
                    bytes.len(),
                    path.display()
                );
                Ok(vec![FtpOutcome {
                    phase: FtpAckPhase::End,
                    success: true,
                    status: 0,
                }])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tempdir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("mesh-node-ftp-test-{:x}", std::ptr::addr_of!(dir) as usize));
        dir
    }

    #[test]
    fn start_then_complete_transfer_writes_the_file() {
        let dir = tempdir();
        let receiver = FtpReceiver::new(dir.clone());

        let start = receiver
            .handle(1, 9, FtpPhase::Start { name: "log.bin".into() })
            .unwrap();
        assert_eq!(start.len(), 1);
        assert!(start[0].success);

        for (seq, byte) in [0u8, 1, 2].into_iter().enumerate() {
            let outcome = receiver
                .handle(
                    1,
                    9,
                    FtpPhase::Chunk {
                        seq: seq as u32,
                        data: vec![byte; 4],
                    },
                )
                .unwrap();
            assert!(outcome[0].success);
        }

        let end = receiver.handle(1, 9, FtpPhase::End { total_chunks: 3 }).unwrap();
        assert_eq!(end.len(), 1);
        assert!(end[0].success);

        let written = fs::read(dir.join("log.bin")).unwrap();
        assert_eq!(written, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn end_with_missing_chunks_nacks_each_one_and_keeps_state() {
        let dir = tempdir();
        let receiver = FtpReceiver::new(dir.clone());

        receiver
            .handle(2, 9, FtpPhase::Start { name: "partial.bin".into() })
            .unwrap();
        receiver
            .handle(2, 9, FtpPhase::Chunk { seq: 0, data: vec![1] })
            .unwrap();
        receiver
            .handle(2, 9, FtpPhase::Chunk { seq: 2, data: vec![3] })
            .unwrap();

        let end = receiver.handle(2, 9, FtpPhase::End { total_chunks: 3 }).unwrap();
        assert_eq!(end.len(), 1);
        assert!(!end[0].success);
        assert_eq!(end[0].status, 1);

        // Still recoverable: resubmit the missing chunk and END again.
        receiver
            .handle(2, 9, FtpPhase::Chunk { seq: 1, data: vec![2] })
            .unwrap();
        let end = receiver.handle(2, 9, FtpPhase::End { total_chunks: 3 }).unwrap();
        assert!(end[0].success);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn duplicate_end_with_no_state_is_acked_and_ignored() {
        let receiver = FtpReceiver::new(tempdir());
        let end = receiver.handle(3, 9, FtpPhase::End { total_chunks: 0 }).unwrap();
        assert_eq!(end.len(), 1);
        assert!(end[0].success);
    }

    #[test]
    fn chunk_without_open_transfer_is_dropped_silently() {
        let receiver = FtpReceiver::new(tempdir());
        let outcome = receiver
            .handle(4, 9, FtpPhase::Chunk { seq: 0, data: vec![1] })
            .unwrap();
        assert!(outcome.is_empty());
    }
}
