//! Logging (C12): installs the `log` facade's global logger, grounded in the
//! teacher's direct use of `log::{debug, info, warn, error}` throughout
//! `connection/serial.rs` and `connection/device.rs`. `env_logger` is the
//! common pairing for that facade in binaries across this corpus.

use std::fs::OpenOptions;
use std::io::Write;

use env_logger::Target;

use crate::config::LoggingConfig;

/// Installs the global logger per `logging.*`. A no-op, `env_logger` included
/// but at `LevelFilter::Off`, when `logging.enabled` is false.
pub fn install(config: &LoggingConfig) {
    let mut builder = env_logger::Builder::new();

    if !config.enabled {
        builder.filter_level(log::LevelFilter::Off);
        builder.init();
        return;
    }

    builder.filter_level(config.level.into());

    if config.write_to_file {
        let file_path = config
            .log_file
            .clone()
            .unwrap_or_else(|| "mesh-node.log".to_string());
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!config.clear_on_start)
            .truncate(config.clear_on_start)
            .open(&file_path)
            .unwrap_or_else(|e| panic!("cannot open log file {file_path}: {e}"));
        builder.target(Target::Pipe(Box::new(file) as Box<dyn Write + Send>));
    } else {
        builder.target(Target::Stderr);
    }

    builder.init();
}
