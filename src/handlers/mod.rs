//! Per-frame-type handlers invoked by [`crate::router::Router`].

pub mod ack;
pub mod command;
pub mod ftp;
pub mod swarm;
pub mod telemetry;
