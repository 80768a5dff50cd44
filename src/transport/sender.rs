//! Native event sender endpoint.
//!
//! Composes [`NativeEventMessage`] encoding with a [`OneShotChannel`]
//! to perform exactly one send.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{trace, warn};

use crate::protocol::event::NativeEvent;
use crate::protocol::message::NativeEventMessage;
use crate::transport::channel::OneShotChannel;

// ============================================================================
// NativeEventSender
// ============================================================================

/// Sending half of a one-shot event exchange.
///
/// The channel serves exactly one exchange: after a successful
/// dispatch the sender refuses further sends. A caller wanting retry
/// must obtain a new channel (and mint a new event id).
pub struct NativeEventSender<C: OneShotChannel> {
    channel: C,
    sent: bool,
}

impl<C: OneShotChannel> NativeEventSender<C> {
    /// Creates a sender over `channel`.
    #[inline]
    #[must_use]
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            sent: false,
        }
    }

    /// Returns `true` once an event has been dispatched.
    #[inline]
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Serializes `event` and sends it over the channel.
    ///
    /// The timeout bounds only the transport call. Returns `false` on
    /// encode failure, transport failure, or an already-used channel;
    /// the failure reason is logged, not retried.
    pub fn dispatch_event(&mut self, event: &NativeEvent, timeout: Duration) -> bool {
        if self.sent {
            warn!(
                event_id = event.id(),
                "dispatch refused: one-shot channel already used"
            );
            return false;
        }

        let message = NativeEventMessage::from_event(event);
        let bytes = message.serialize();

        match self.channel.send_raw(&bytes, timeout) {
            Ok(()) => {
                trace!(
                    event_id = event.id(),
                    event_type = event.event_type().name(),
                    bytes = bytes.len(),
                    "event dispatched"
                );
                self.sent = true;
                true
            }
            Err(e) => {
                warn!(
                    event_id = event.id(),
                    event_type = event.event_type().name(),
                    error = %e,
                    "event dispatch failed"
                );
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
    use crate::protocol::detail::RpcRequestDetail;
    use crate::protocol::event::NativeEventType;
    use crate::transport::memory::{FailingChannel, MemoryChannel};

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn sample_event() -> NativeEvent {
        let ids = SharedIdAllocator::for_events();
        NativeEvent::make_event(
            &ids,
            NativeEventType::RpcRequest,
            &RpcRequestDetail::new(1, "ping"),
        )
        .expect("make event")
    }

    #[test]
    fn test_dispatch_succeeds_over_memory_channel() {
        let (left, mut right) = MemoryChannel::pair();
        let mut sender = NativeEventSender::new(left);
        let event = sample_event();

        assert!(sender.dispatch_event(&event, TIMEOUT));
        assert!(sender.is_sent());

        let frame = right.recv_raw(64 * 1024, TIMEOUT).expect("recv");
        let message = NativeEventMessage::deserialize(&frame).expect("deserialize");
        assert_eq!(message.body(), event.detail_json().as_bytes());
    }

    #[test]
    fn test_dispatch_returns_false_on_transport_failure() {
        let mut sender = NativeEventSender::new(FailingChannel);
        assert!(!sender.dispatch_event(&sample_event(), TIMEOUT));
        assert!(!sender.is_sent());
    }

    #[test]
    fn test_second_dispatch_is_refused() {
        let (left, _right) = MemoryChannel::pair();
        let mut sender = NativeEventSender::new(left);
        let event = sample_event();

        assert!(sender.dispatch_event(&event, TIMEOUT));
        assert!(!sender.dispatch_event(&event, TIMEOUT));
    }
}
