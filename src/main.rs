use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info};

use mesh_node::ack::AckTracker;
use mesh_node::cli;
use mesh_node::config::Config;
use mesh_node::frame::FrameCodec;
use mesh_node::ftp::{FtpReceiver, FtpSender};
use mesh_node::logging;
use mesh_node::router::Router;
use mesh_node::runtime::{self, Cancellation, StaticTelemetrySource};
use mesh_node::telemetry_cache::TelemetryCache;
use mesh_node::transport::{GenericTransport, Transport};
use mesh_node::vehicle::{LoggingJobScheduler, LoggingVehicleBridge};

fn main() {
    let config_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            // Logging isn't installed yet; a configuration error is fatal
            // at startup per spec.md's error taxonomy, so this goes straight
            // to stderr.
            eprintln!("fatal: {e}");
            std::process::exit(1);
        }
    };

    logging::install(config.logging());

    let local_id = config.vehicle_id();
    let protocol = config.protocol();
    let codec = FrameCodec::new(protocol.start_byte, protocol.terminal_byte, protocol.version);

    let transport = match GenericTransport::from_config(&config) {
        Ok(transport) => Arc::new(Mutex::new(transport)),
        Err(e) => {
            error!("fatal: could not construct transport: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = transport.lock().expect("transport mutex poisoned").start() {
        error!("fatal: could not start transport: {e}");
        std::process::exit(1);
    }

    let telemetry_cache = Arc::new(TelemetryCache::new());
    let ack_tracker = Arc::new(AckTracker::new());
    let ftp_receiver = Arc::new(FtpReceiver::new(Path::new(
        &config.file_transfer().download_dir,
    )));
    let vehicle = Arc::new(LoggingVehicleBridge);
    let scheduler = Arc::new(LoggingJobScheduler);

    let router = Arc::new(Router::new(
        local_id,
        codec,
        transport.clone(),
        telemetry_cache,
        ack_tracker.clone(),
        ftp_receiver,
        vehicle,
        scheduler,
    ));

    let stop = Cancellation::new();
    let reader = runtime::spawn_reader(router.clone(), transport.clone(), codec, protocol, stop.clone());
    let telemetry_emitter = runtime::spawn_telemetry_emitter(
        transport.clone(),
        codec,
        local_id,
        Arc::new(StaticTelemetrySource),
        Duration::from_secs(1),
        stop.clone(),
    );

    let ftp_limits = config.file_transfer().limits;
    let sender = FtpSender::new(
        codec,
        transport.clone(),
        ack_tracker,
        local_id,
        ftp_limits.packet_size,
        Duration::from_millis(ftp_limits.timeout_ms),
        ftp_limits.max_retries,
    );

    info!("mesh-node started as vehicle {local_id}");
    let exit_code = cli::run(router, codec, local_id, &config, &sender);

    runtime::shutdown(&stop, vec![reader, telemetry_emitter]);
    if let Err(e) = transport.lock().expect("transport mutex poisoned").stop() {
        error!("error stopping transport: {e}");
    }

    std::process::exit(exit_code);
}
