//! Node-local runtime for a lightweight mesh protocol used by small
//! unmanned vehicles to exchange telemetry, commands, acknowledgments and
//! file transfers over a byte-oriented transport (serial line or UDP
//! datagram, unicast or multicast).
//!
//! The wire envelope, frame router, ACK tracker and chunked file transfer
//! engine are the four core subsystems; [`config`], [`logging`], [`cli`] and
//! [`runtime`] are the ambient stack that makes a concrete binary out of
//! them.

pub mod ack;
pub mod cli;
pub mod config;
pub mod crc;
pub mod frame;
pub mod framer;
pub mod ftp;
pub mod handlers;
pub mod logging;
pub mod payload;
pub mod router;
pub mod runtime;
pub mod telemetry_cache;
pub mod transport;
pub mod vehicle;
