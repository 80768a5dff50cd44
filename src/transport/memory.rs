//! In-process channel implementation.
//!
//! [`MemoryChannel`] is the reference [`OneShotChannel`] transport:
//! two cross-wired bounded queues, useful for tests and for embeddings
//! where both endpoints live in one process. Frames cross the channel
//! whole; there is no partial delivery.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, bounded};

use crate::error::{Error, Result};
use crate::transport::channel::OneShotChannel;

// ============================================================================
// Constants
// ============================================================================

/// Frames buffered per direction before a send blocks the exchange.
///
/// A one-shot channel serves exactly one exchange, so a small buffer
/// suffices.
const CHANNEL_DEPTH: usize = 4;

// ============================================================================
// MemoryChannel
// ============================================================================

/// One endpoint of an in-process duplex channel.
///
/// Created in pairs by [`MemoryChannel::pair`]; dropping an endpoint
/// closes the channel, surfacing as a transport failure on the peer.
#[derive(Debug)]
pub struct MemoryChannel {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl MemoryChannel {
    /// Creates two cross-wired endpoints.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = bounded(CHANNEL_DEPTH);
        let (b_tx, b_rx) = bounded(CHANNEL_DEPTH);
        (
            Self { tx: a_tx, rx: b_rx },
            Self { tx: b_tx, rx: a_rx },
        )
    }
}

impl OneShotChannel for MemoryChannel {
    fn send_raw(&mut self, data: &[u8], timeout: Duration) -> Result<()> {
        match self.tx.send_timeout(data.to_vec(), timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                Err(Error::transport_timeout(timeout.as_millis() as u64))
            }
            Err(SendTimeoutError::Disconnected(_)) => {
                Err(Error::transport_failure("peer endpoint dropped"))
            }
        }
    }

    fn recv_raw(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        let frame = match self.rx.recv_timeout(timeout) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => {
                return Err(Error::transport_timeout(timeout.as_millis() as u64));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(Error::transport_failure("peer endpoint dropped"));
            }
        };

        if frame.len() > max_len {
            return Err(Error::transport_failure(format!(
                "frame of {} bytes exceeds limit of {max_len}",
                frame.len()
            )));
        }
        Ok(frame)
    }
}

// ============================================================================
// FailingChannel (test support)
// ============================================================================

/// A channel whose sends always fail; used to exercise failure paths.
#[cfg(test)]
pub(crate) struct FailingChannel;

#[cfg(test)]
impl OneShotChannel for FailingChannel {
    fn send_raw(&mut self, _data: &[u8], _timeout: Duration) -> Result<()> {
        Err(Error::transport_failure("wire cut"))
    }

    fn recv_raw(&mut self, _max_len: usize, _timeout: Duration) -> Result<Vec<u8>> {
        Err(Error::transport_failure("wire cut"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[test]
    fn test_send_and_receive_frame() {
        let (mut left, mut right) = MemoryChannel::pair();

        left.send_raw(b"hello", TIMEOUT).expect("send");
        let frame = right.recv_raw(1024, TIMEOUT).expect("recv");
        assert_eq!(frame, b"hello");
    }

    #[test]
    fn test_duplex_directions_are_independent() {
        let (mut left, mut right) = MemoryChannel::pair();

        left.send_raw(b"ping", TIMEOUT).expect("send");
        right.send_raw(b"pong", TIMEOUT).expect("send");

        assert_eq!(right.recv_raw(1024, TIMEOUT).expect("recv"), b"ping");
        assert_eq!(left.recv_raw(1024, TIMEOUT).expect("recv"), b"pong");
    }

    #[test]
    fn test_recv_times_out_when_idle() {
        let (_left, mut right) = MemoryChannel::pair();

        let err = right.recv_raw(1024, Duration::from_millis(10)).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_recv_fails_when_peer_dropped() {
        let (left, mut right) = MemoryChannel::pair();
        drop(left);

        let err = right.recv_raw(1024, TIMEOUT).unwrap_err();
        assert!(matches!(err, Error::TransportFailure { .. }));
    }

    #[test]
    fn test_oversized_frame_is_transport_failure() {
        let (mut left, mut right) = MemoryChannel::pair();

        left.send_raw(&[0u8; 64], TIMEOUT).expect("send");
        let err = right.recv_raw(16, TIMEOUT).unwrap_err();
        assert!(matches!(err, Error::TransportFailure { .. }));
        assert!(!err.is_timeout());
    }
}
