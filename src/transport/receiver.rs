//! Native event receiver endpoint.
//!
//! Composes a [`OneShotChannel`] with [`NativeEventMessage`] decoding
//! to perform exactly one receive. Timeout and malformed payload both
//! surface as "no event"; callers needing to tell them apart inspect
//! [`NativeEventReceiver::status`].

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::protocol::message::NativeEventMessage;
use crate::transport::channel::OneShotChannel;

// ============================================================================
// Constants
// ============================================================================

/// Largest accepted event frame.
///
/// A structured-document body has no business being bigger than this;
/// anything larger is treated as a transport fault.
const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

// ============================================================================
// ReceiveStatus
// ============================================================================

/// Outcome of the receiver's single exchange.
///
/// Transitions: `Idle → Received | TimedOut | DecodeError → Closed`.
/// Any receive attempted after a terminal outcome reports `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiveStatus {
    /// No receive attempted yet.
    #[default]
    Idle,
    /// A well-formed message was received.
    Received,
    /// The transport call exceeded its timeout.
    TimedOut,
    /// Bytes arrived but did not decode (or the transport failed).
    DecodeError,
    /// The one-shot exchange is over; the channel is spent.
    Closed,
}

// ============================================================================
// NativeEventReceiver
// ============================================================================

/// Receiving half of a one-shot event exchange.
pub struct NativeEventReceiver<C: OneShotChannel> {
    channel: C,
    status: ReceiveStatus,
}

impl<C: OneShotChannel> NativeEventReceiver<C> {
    /// Creates a receiver over `channel`.
    #[inline]
    #[must_use]
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            status: ReceiveStatus::Idle,
        }
    }

    /// Returns the outcome of the exchange so far.
    ///
    /// This is the status out-param that distinguishes a timeout from
    /// a malformed payload after [`recv_event`](Self::recv_event)
    /// returns `None`.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ReceiveStatus {
        self.status
    }

    /// Blocks up to `timeout` for one event message.
    ///
    /// Returns an owned message on success. Timeout and decode failure
    /// both return `None`; inspect [`status`](Self::status) to tell
    /// them apart. No retries — a second call on the same receiver
    /// reports [`ReceiveStatus::Closed`] and returns `None`.
    pub fn recv_event(&mut self, timeout: Duration) -> Option<NativeEventMessage> {
        let mut message = NativeEventMessage::default();
        if self.recv_event_on(&mut message, timeout) {
            Some(message)
        } else {
            None
        }
    }

    /// Same receive, writing into caller-owned storage.
    ///
    /// Transfers no ownership to the caller; returns `true` when
    /// `message` was populated.
    pub fn recv_event_on(&mut self, message: &mut NativeEventMessage, timeout: Duration) -> bool {
        if self.status != ReceiveStatus::Idle {
            debug!(status = ?self.status, "receive refused: one-shot channel already used");
            self.status = ReceiveStatus::Closed;
            return false;
        }

        let frame = match self.channel.recv_raw(MAX_MESSAGE_SIZE, timeout) {
            Ok(frame) => frame,
            Err(e) if e.is_timeout() => {
                trace!(timeout_ms = timeout.as_millis() as u64, "receive timed out");
                self.status = ReceiveStatus::TimedOut;
                return false;
            }
            Err(e) => {
                warn!(error = %e, "receive failed");
                self.status = ReceiveStatus::DecodeError;
                return false;
            }
        };

        match NativeEventMessage::deserialize(&frame) {
            Ok(decoded) => {
                trace!(
                    event_type = decoded.type_name(),
                    bytes = frame.len(),
                    "event received"
                );
                *message = decoded;
                self.status = ReceiveStatus::Received;
                true
            }
            Err(e) => {
                warn!(error = %e, bytes = frame.len(), "received undecodable frame");
                self.status = ReceiveStatus::DecodeError;
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::SharedIdAllocator;
    use crate::protocol::detail::RpcResponseDetail;
    use crate::protocol::event::{NativeEvent, NativeEventType};
    use crate::transport::memory::MemoryChannel;
    use crate::transport::sender::NativeEventSender;

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[test]
    fn test_recv_returns_populated_message() {
        use crate::transport::channel::OneShotChannel;

        let (mut left, right) = MemoryChannel::pair();
        let bytes =
            NativeEventMessage::new(NativeEventType::Message, b"{\"a\":1}".to_vec()).serialize();
        left.send_raw(&bytes, TIMEOUT).expect("send");

        let mut receiver = NativeEventReceiver::new(right);
        let message = receiver.recv_event(TIMEOUT).expect("message");
        assert_eq!(message.event_type().expect("type"), NativeEventType::Message);
        assert_eq!(message.body(), b"{\"a\":1}");
        assert_eq!(receiver.status(), ReceiveStatus::Received);
    }

    #[test]
    fn test_recv_timeout_is_none_with_timed_out_status() {
        let (_left, right) = MemoryChannel::pair();
        let mut receiver = NativeEventReceiver::new(right);

        assert!(receiver.recv_event(Duration::from_millis(10)).is_none());
        assert_eq!(receiver.status(), ReceiveStatus::TimedOut);
    }

    #[test]
    fn test_recv_malformed_is_none_with_decode_error_status() {
        use crate::transport::channel::OneShotChannel;

        let (mut left, right) = MemoryChannel::pair();
        left.send_raw(&[1, 2, 3], TIMEOUT).expect("send");

        let mut receiver = NativeEventReceiver::new(right);
        assert!(receiver.recv_event(TIMEOUT).is_none());
        assert_eq!(receiver.status(), ReceiveStatus::DecodeError);
    }

    #[test]
    fn test_second_recv_reports_closed() {
        let (_left, right) = MemoryChannel::pair();
        let mut receiver = NativeEventReceiver::new(right);

        assert!(receiver.recv_event(Duration::from_millis(10)).is_none());
        assert_eq!(receiver.status(), ReceiveStatus::TimedOut);

        assert!(receiver.recv_event(Duration::from_millis(10)).is_none());
        assert_eq!(receiver.status(), ReceiveStatus::Closed);
    }

    #[test]
    fn test_recv_event_on_reuses_storage() {
        use crate::transport::channel::OneShotChannel;

        let (mut left, right) = MemoryChannel::pair();
        let bytes =
            NativeEventMessage::new(NativeEventType::OnClosed, Vec::new()).serialize();
        left.send_raw(&bytes, TIMEOUT).expect("send");

        let mut receiver = NativeEventReceiver::new(right);
        let mut message = NativeEventMessage::default();
        assert!(receiver.recv_event_on(&mut message, TIMEOUT));
        assert_eq!(
            message.event_type().expect("type"),
            NativeEventType::OnClosed
        );
    }

    #[test]
    fn test_end_to_end_exchange() {
        let ids = SharedIdAllocator::for_events();
        let (left, right) = MemoryChannel::pair();
        let mut sender = NativeEventSender::new(left);
        let mut receiver = NativeEventReceiver::new(right);

        let event = NativeEvent::make_event(
            &ids,
            NativeEventType::RpcResponse,
            &RpcResponseDetail::ok("rendered"),
        )
        .expect("make");

        assert!(sender.dispatch_event(&event, TIMEOUT));

        let message = receiver.recv_event(TIMEOUT).expect("message");
        let rebuilt = message.into_event(&ids).expect("into_event");
        let detail: RpcResponseDetail = rebuilt.detail().expect("detail");
        assert!(detail.success);
        assert_eq!(detail.message, "rendered");
    }
}
