//! In-memory loopback transport for tests. Either a single self-looped
//! instance (what you send comes straight back on the next `read`) or a
//! connected pair simulating two nodes sharing a wire.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{Transport, TransportError};

#[derive(Clone)]
pub struct MockTransport {
    inbox: Arc<Mutex<VecDeque<u8>>>,
    outbox: Arc<Mutex<VecDeque<u8>>>,
}

impl MockTransport {
    /// Everything sent is immediately available to read back on the same
    /// instance.
    pub fn loopback() -> Self {
        let buf = Arc::new(Mutex::new(VecDeque::new()));
        Self {
            inbox: buf.clone(),
            outbox: buf,
        }
    }

    /// Two transports wired to each other: bytes sent on one are read on
    /// the other.
    pub fn new_pair() -> (Self, Self) {
        let a_to_b = Arc::new(Mutex::new(VecDeque::new()));
        let b_to_a = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                inbox: b_to_a.clone(),
                outbox: a_to_b.clone(),
            },
            Self {
                inbox: a_to_b,
                outbox: b_to_a,
            },
        )
    }
}

impl Transport for MockTransport {
    fn start(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.outbox
            .lock()
            .expect("mock transport mutex poisoned")
            .extend(bytes.iter().copied());
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut inbox = self.inbox.lock().expect("mock transport mutex poisoned");
        Ok(inbox.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_reads_back_what_it_sends() {
        let mut t = MockTransport::loopback();
        t.send(b"hello").unwrap();
        assert_eq!(t.read().unwrap(), b"hello");
        assert!(t.read().unwrap().is_empty());
    }

    #[test]
    fn paired_transports_exchange_bytes_one_way_each() {
        let (mut a, mut b) = MockTransport::new_pair();
        a.send(b"ping").unwrap();
        assert!(a.read().unwrap().is_empty());
        assert_eq!(b.read().unwrap(), b"ping");

        b.send(b"pong").unwrap();
        assert_eq!(a.read().unwrap(), b"pong");
    }
}
