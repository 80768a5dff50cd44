//! Message and event types.
//!
//! This module defines the two kinds of traffic the messaging layer
//! moves between cooperating processes.
//!
//! # Message Kinds
//!
//! | Kind | Purpose |
//! |------|---------|
//! | [`CommandBufferMessage`] | High-frequency low-level commands (graphics/resource ops) |
//! | [`NativeEvent`] | RPC calls, lifecycle notifications, application events |
//! | [`NativeEventMessage`] | Wire envelope wrapping an event's tag and body |
//!
//! # Wire Formats
//!
//! Both envelopes are little-endian, length-prefixed binary layouts:
//!
//! - Command buffer: `[type][baseLen][baseBytes][segCount]{[segLen][segBytes]}*`
//! - Native event: `[type][bodyLen][bodyBytes]`
//!
//! Native event bodies are structured documents (JSON maps keyed by
//! field name); command-buffer base payloads are fixed-layout structs
//! decoded through the [`CommandPayload`] registry.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command_buffer` | Command envelope, type registry, typed payloads |
//! | `detail` | Event detail types and the document codec |
//! | `event` | Native event types and construction |
//! | `message` | Native event wire envelope |

// ============================================================================
// Submodules
// ============================================================================

/// Command-buffer messages and the command type registry.
pub mod command_buffer;

/// Native event detail types.
pub mod detail;

/// Native events and their type enumeration.
pub mod event;

/// Native event wire envelope.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use command_buffer::{
    BufferDataCommand, CommandBufferMessage, CommandBufferType, CommandPayload,
    ContextInitCommand, DrawArraysCommand, ViewportCommand, command_type_to_str,
};
pub use detail::{
    DocumentEventDetail, DocumentEventType, DocumentRequestDetail, EventDetail, RpcRequestDetail,
    RpcResponseDetail, ScriptRunMode,
};
pub use event::{NativeEvent, NativeEventType, native_event_type_to_str};
pub use message::NativeEventMessage;
