//! UART transport, built directly on the `serialport` crate the way the
//! teacher's own root binary opens its system port: fixed baud, no parity,
//! one stop bit, a read timeout taken from configuration so polling stays
//! non-blocking-ish.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use super::{Transport, TransportError};
use crate::config::UartConfig;

pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    pub fn new(config: &UartConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.port, config.baudrate)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()?;
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn start(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let available = self.port.bytes_to_read().unwrap_or(0) as usize;
        if available == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; available];
        match self.port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}
