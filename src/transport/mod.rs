//! One-shot transport endpoints.
//!
//! The transport layer moves serialized event envelopes between
//! processes over transient channels. Each channel serves exactly one
//! send/receive exchange; request/response correlation happens above
//! this layer via event ids.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | The [`OneShotChannel`] byte-transport contract |
//! | `memory` | In-process reference channel |
//! | `sender` | [`NativeEventSender`], encode-then-send endpoint |
//! | `receiver` | [`NativeEventReceiver`], receive-then-decode endpoint |
//!
//! # Blocking Model
//!
//! This layer is synchronous. The only blocking points are the
//! timeout-bounded `send_raw`/`recv_raw` transport calls; everything
//! else is pure computation.

// ============================================================================
// Submodules
// ============================================================================

/// Byte-transport contract for a single exchange.
pub mod channel;

/// In-process channel implementation.
pub mod memory;

/// Receiving endpoint.
pub mod receiver;

/// Sending endpoint.
pub mod sender;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::OneShotChannel;
pub use memory::MemoryChannel;
pub use receiver::{NativeEventReceiver, ReceiveStatus};
pub use sender::NativeEventSender;
