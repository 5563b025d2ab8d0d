//! Sending acknowledgements and feeding received ones back into the tracker.

pub mod dispatch;
pub mod tracker;

pub use dispatch::{build_command_frame, handle_ack_frame, send_ack, send_ftp_ack};
pub use tracker::{AckLookup, AckTracker};
