//! Reliable chunked file transfer: a stop-and-wait sender (C7) and a
//! buffering, NACK-on-missing-at-END receiver (C8).

pub mod receiver;
pub mod sender;
pub mod storage;

pub use receiver::{FtpOutcome, FtpReceiver};
pub use sender::FtpSender;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
