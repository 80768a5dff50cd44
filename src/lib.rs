//! Runtime messaging - Cross-process command and event transport.
//!
//! This library provides the messaging layer a runtime host and its
//! content processes use to talk to each other: binary command-buffer
//! envelopes for high-frequency low-level commands, and JSON-bodied
//! native events for RPC, lifecycle, and application traffic.
//!
//! # Architecture
//!
//! Two kinds of traffic cross the process boundary:
//!
//! - **Command buffers**: a typed base payload plus optional opaque
//!   segments, framed as length-prefixed little-endian binary
//! - **Native events**: an id-correlated event carrying a structured
//!   document (JSON) body, framed by [`NativeEventMessage`]
//!
//! Key design principles:
//!
//! - Decoding fails closed: declared lengths are validated against the
//!   actual input, trailing bytes are rejected
//! - Typed payload access goes through registries ([`CommandPayload`],
//!   [`EventDetail`]) instead of byte reinterpretation
//! - Event ids come from caller-owned [`RotatingIdAllocator`]s; there
//!   is no process-global id state
//! - Transports are injected through the [`OneShotChannel`] trait; each
//!   channel serves exactly one send/receive exchange
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use runtime_messaging::{
//!     MemoryChannel, NativeEvent, NativeEventReceiver, NativeEventSender, NativeEventType,
//!     Result, RpcRequestDetail, SharedIdAllocator,
//! };
//!
//! fn main() -> Result<()> {
//!     let ids = SharedIdAllocator::for_events();
//!     let (local, remote) = MemoryChannel::pair();
//!
//!     // Build an RPC request event and dispatch it
//!     let event = NativeEvent::make_event(
//!         &ids,
//!         NativeEventType::RpcRequest,
//!         &RpcRequestDetail::new(1, "document.load"),
//!     )?;
//!     let mut sender = NativeEventSender::new(local);
//!     sender.dispatch_event(&event, Duration::from_millis(500));
//!
//!     // The peer receives the envelope and recovers the detail
//!     let mut receiver = NativeEventReceiver::new(remote);
//!     if let Some(message) = receiver.recv_event(Duration::from_millis(500)) {
//!         let event = message.into_event(&ids)?;
//!         let detail: RpcRequestDetail = event.detail()?;
//!         println!("method: {}", detail.method);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Rotating id allocation |
//! | [`protocol`] | Command-buffer and event message types |
//! | [`transport`] | One-shot channel endpoints |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Rotating id allocation.
///
/// Bounded wrap-around counters for correlating requests with
/// responses across the process boundary.
pub mod identifiers;

/// Command-buffer and event message types.
///
/// Wire envelopes, the command type registry, and event details.
pub mod protocol;

/// One-shot channel endpoints.
///
/// The [`OneShotChannel`] contract plus sender/receiver halves.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{RotatingId, RotatingIdAllocator, SharedIdAllocator};

// Protocol types
pub use protocol::{
    BufferDataCommand, CommandBufferMessage, CommandBufferType, CommandPayload,
    ContextInitCommand, DocumentEventDetail, DocumentEventType, DocumentRequestDetail,
    DrawArraysCommand, EventDetail, NativeEvent, NativeEventMessage, NativeEventType,
    RpcRequestDetail, RpcResponseDetail, ScriptRunMode, ViewportCommand, command_type_to_str,
    native_event_type_to_str,
};

// Transport types
pub use transport::{
    MemoryChannel, NativeEventReceiver, NativeEventSender, OneShotChannel, ReceiveStatus,
};
