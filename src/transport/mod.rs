//! Transport channel: the byte-frame send/read boundary. Concrete variants
//! share one capability-set trait (the teacher's `Connection` trait,
//! generalized from async packet exchange to a synchronous, non-blocking
//! byte channel) rather than a polymorphic base class.

pub mod mock;
pub mod serial;
pub mod udp;

use thiserror::Error;

use crate::config::{Config, InterfaceKind};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("no interface configured for comm_type {0:?}")]
    Unconfigured(InterfaceKind),
}

/// Byte-frame channel contract. `read` never blocks: it returns whatever
/// bytes are currently available (possibly none, possibly a partial or
/// multi-frame chunk) for the caller to push through a [`crate::framer::Framer`].
pub trait Transport: Send {
    fn start(&mut self) -> Result<(), TransportError>;
    fn stop(&mut self) -> Result<(), TransportError>;
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
    fn read(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// The concrete transport selected at runtime from configuration.
pub enum GenericTransport {
    Serial(serial::SerialTransport),
    Udp(udp::UdpTransport),
    Mock(mock::MockTransport),
}

impl GenericTransport {
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let comm_type = config.interface().comm_type;
        match comm_type {
            InterfaceKind::Uart => {
                let uart = config.uart().ok_or(TransportError::Unconfigured(comm_type))?;
                Ok(Self::Serial(serial::SerialTransport::new(uart)?))
            }
            InterfaceKind::Udp => {
                let udp = config.udp().ok_or(TransportError::Unconfigured(comm_type))?;
                Ok(Self::Udp(udp::UdpTransport::new_unicast(udp)?))
            }
            InterfaceKind::UdpMulticast => {
                let udp = config.udp().ok_or(TransportError::Unconfigured(comm_type))?;
                Ok(Self::Udp(udp::UdpTransport::new_multicast(udp)?))
            }
            InterfaceKind::Mock => Ok(Self::Mock(mock::MockTransport::loopback())),
        }
    }
}

impl Transport for GenericTransport {
    fn start(&mut self) -> Result<(), TransportError> {
        match self {
            Self::Serial(t) => t.start(),
            Self::Udp(t) => t.start(),
            Self::Mock(t) => t.start(),
        }
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        match self {
            Self::Serial(t) => t.stop(),
            Self::Udp(t) => t.stop(),
            Self::Mock(t) => t.stop(),
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match self {
            Self::Serial(t) => t.send(bytes),
            Self::Udp(t) => t.send(bytes),
            Self::Mock(t) => t.send(bytes),
        }
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        match self {
            Self::Serial(t) => t.read(),
            Self::Udp(t) => t.read(),
            Self::Mock(t) => t.read(),
        }
    }
}
