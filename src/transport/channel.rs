//! One-shot channel contract.
//!
//! A one-shot channel is a transient point-to-point connection valid
//! for exactly one send/receive exchange. Concrete transports (pipe,
//! socket, shared-memory ring) live outside this crate and are
//! injected through the [`OneShotChannel`] trait; this layer only
//! relies on the logical send/receive contract.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::Result;

// ============================================================================
// OneShotChannel
// ============================================================================

/// Raw byte transport for a single exchange.
///
/// Both calls block the caller up to the supplied timeout; there are no
/// other suspension points and no background threads in this layer.
/// Cancellation is timeout-only — abandoning a pending receive relies
/// on the transport closing the channel.
pub trait OneShotChannel: Send {
    /// Sends one frame of raw bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::TransportTimeout`](crate::Error::TransportTimeout) if
    ///   the frame could not be handed off within `timeout`
    /// - [`Error::TransportFailure`](crate::Error::TransportFailure)
    ///   for channel I/O errors outside this layer
    fn send_raw(&mut self, data: &[u8], timeout: Duration) -> Result<()>;

    /// Receives one frame of raw bytes, blocking up to `timeout`.
    ///
    /// Frames larger than `max_len` are a transport failure.
    ///
    /// # Errors
    ///
    /// - [`Error::TransportTimeout`](crate::Error::TransportTimeout) if
    ///   no frame arrived within `timeout`
    /// - [`Error::TransportFailure`](crate::Error::TransportFailure)
    ///   for channel I/O errors or an oversized frame
    fn recv_raw(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>>;
}
