//! UDP unicast and multicast transport. A datagram carries exactly one
//! frame, so no stream resyncing is needed on this path (unlike the serial
//! transport, which layers a [`crate::framer::Framer`] on top).

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use super::{Transport, TransportError};
use crate::config::UdpConfig;

const MAX_DATAGRAM: usize = u16::MAX as usize;

pub struct UdpTransport {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpTransport {
    pub fn new_unicast(config: &UdpConfig) -> Result<Self, TransportError> {
        let local: SocketAddr = format!("{}:{}", config.local_ip, config.local_port)
            .parse()
            .map_err(|_| TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid local UDP address in configuration",
            )))?;
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;
        let remote = format!("{}:{}", config.remote_ip, config.remote_port)
            .parse()
            .map_err(|_| TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid remote UDP address in configuration",
            )))?;
        Ok(Self { socket, remote })
    }

    pub fn new_multicast(config: &UdpConfig) -> Result<Self, TransportError> {
        let transport = Self::new_unicast(config)?;
        if let Some(group) = &config.multicast_group {
            let group: Ipv4Addr = group
                .parse()
                .map_err(|_| TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "invalid multicast_group address in configuration",
                )))?;
            transport.socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
            transport.socket.set_multicast_loop_v4(true)?;
        }
        Ok(transport)
    }
}

impl Transport for UdpTransport {
    fn start(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.socket.send_to(bytes, self.remote)?;
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        match self.socket.recv_from(&mut buf) {
            Ok((n, _from)) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(Vec::new()),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}
