//! CLI keyboard loop (C13): an operator-facing line editor mapping single
//! keys to command builders or an FTP send. Out of scope as a "tool-side"
//! concern per spec.md, but specified precisely enough (§6 CLI surface) to
//! build as a demonstrable binary. Uses `rustyline` for line input rather
//! than raw terminal mode, since that's the line-editing crate already in
//! this codebase's dependency tree.

use std::sync::Arc;

use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::ack::dispatch::build_command_frame;
use crate::config::Config;
use crate::frame::{FrameCodec, BROADCAST};
use crate::ftp::FtpSender;
use crate::payload::command::{Command, Landing, Takeoff, Waypoint};
use crate::router::Router;
use crate::transport::Transport;

const DEMO_GOTO: (f32, f32, f32) = (47.6062, -122.3321, 30.0);
const DEMO_TAKEOFF_ALT: f32 = 10.0;
const DEMO_WAYPOINTS: [(f32, f32, f32); 2] = [(47.60, -122.33, 20.0), (47.61, -122.34, 25.0)];

/// Runs until `Q` or end-of-input. Returns the process exit code.
pub fn run(router: Arc<Router>, codec: FrameCodec, local_id: u8, config: &Config, sender: &FtpSender) -> i32 {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            warn!("cli: could not start line editor: {e}");
            return 1;
        }
    };

    loop {
        let line = match editor.readline("mesh-node> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return 0,
            Err(e) => {
                warn!("cli: input error: {e}");
                return 1;
            }
        };

        let key = match line.trim().chars().next() {
            Some(c) => c.to_ascii_uppercase(),
            None => continue,
        };

        match key {
            'T' => send_command(&router, &codec, local_id, Command::Takeoff(Takeoff::Simple { alt: DEMO_TAKEOFF_ALT })),
            'L' => send_command(&router, &codec, local_id, Command::Landing(Landing::Immediate)),
            'G' => {
                let (lat, lon, alt) = DEMO_GOTO;
                send_command(&router, &codec, local_id, Command::Goto { lat, lon, alt });
            }
            'W' => {
                let points = DEMO_WAYPOINTS
                    .iter()
                    .map(|&(lat, lon, alt)| Waypoint { lat, lon, alt })
                    .collect();
                send_command(&router, &codec, local_id, Command::Waypoints(points));
            }
            'F' => send_demo_file(config, sender),
            'Q' => return 0,
            other => warn!("cli: unrecognized key {other:?}"),
        }
    }
}

fn send_command(router: &Router, codec: &FrameCodec, local_id: u8, command: Command) {
    match build_command_frame(codec, local_id, BROADCAST, &command) {
        Ok(bytes) => {
            if let Err(e) = router
                .transport
                .lock()
                .expect("transport mutex poisoned")
                .send(&bytes)
            {
                warn!("cli: failed to send {}: {e}", command.name());
            } else {
                info!("cli: sent {}", command.name());
            }
        }
        Err(e) => warn!("cli: failed to encode {}: {e}", command.name()),
    }
}

fn send_demo_file(config: &Config, sender: &FtpSender) {
    let Some(demo_file) = &config.file_transfer().demo_file else {
        warn!("cli: no file_transfer.demo_file configured, ignoring F");
        return;
    };
    info!("cli: sending {demo_file} to broadcast");
    if sender.send_file(std::path::Path::new(demo_file), BROADCAST) {
        info!("cli: file transfer complete");
    } else {
        warn!("cli: file transfer failed");
    }
}
