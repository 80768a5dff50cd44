//! Native events.
//!
//! Native events are typed, identified envelopes used to communicate
//! between the script process and the renderer process: RPC calls,
//! lifecycle notifications and application events. Each event carries
//! a structured-document body (its *detail*) and an id minted from a
//! shared [`SharedIdAllocator`] for request/response correlation.
//!
//! # Type Ranges
//!
//! | Range | Category | Types |
//! |-------|----------|-------|
//! | `0x10..0x20` | RPC | `RpcRequest`, `RpcResponse` |
//! | `0x20..0x30` | Lifecycle | `OnClosed`, `OnRequest` |
//! | `0x30..0x40` | Application | `Message`, `Error`, `OnXsmlEvent` |

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::SharedIdAllocator;
use crate::protocol::detail::EventDetail;

// ============================================================================
// NativeEventType
// ============================================================================

/// Closed enumeration of native event kinds.
///
/// Tags are stable wire values partitioned into numeric ranges by
/// category; renumbering is a protocol break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum NativeEventType {
    /// Reserved; the default for an unpopulated message.
    #[default]
    Unset = 0x00,
    /// RPC call to the peer process.
    RpcRequest = 0x10,
    /// RPC response from the peer process.
    RpcResponse = 0x11,
    /// The peer's document or channel was closed.
    OnClosed = 0x20,
    /// The peer requested a new document load.
    OnRequest = 0x21,
    /// Application-defined message.
    Message = 0x30,
    /// Application-level error report.
    Error = 0x31,
    /// Markup-document (XSML) application event.
    OnXsmlEvent = 0x32,
}

impl NativeEventType {
    /// Maps a raw wire tag to an event type.
    ///
    /// Returns `None` for tags outside the registered enumeration; the
    /// caller decides whether that is an error (see
    /// [`NativeEventMessage::event_type`](crate::NativeEventMessage::event_type)).
    #[must_use]
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0x00 => Some(Self::Unset),
            0x10 => Some(Self::RpcRequest),
            0x11 => Some(Self::RpcResponse),
            0x20 => Some(Self::OnClosed),
            0x21 => Some(Self::OnRequest),
            0x30 => Some(Self::Message),
            0x31 => Some(Self::Error),
            0x32 => Some(Self::OnXsmlEvent),
            _ => None,
        }
    }

    /// Returns the raw wire tag.
    #[inline]
    #[must_use]
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Returns the display name for this event type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unset => "Unset",
            Self::RpcRequest => "RpcRequest",
            Self::RpcResponse => "RpcResponse",
            Self::OnClosed => "OnClosed",
            Self::OnRequest => "OnRequest",
            Self::Message => "Message",
            Self::Error => "Error",
            Self::OnXsmlEvent => "OnXSMLEvent",
        }
    }

    /// Returns `true` for RPC-range types.
    #[inline]
    #[must_use]
    pub fn is_rpc(self) -> bool {
        (0x10..0x20).contains(&self.tag())
    }

    /// Returns `true` for lifecycle-range types.
    #[inline]
    #[must_use]
    pub fn is_lifecycle(self) -> bool {
        (0x20..0x30).contains(&self.tag())
    }

    /// Returns `true` for application-range types.
    #[inline]
    #[must_use]
    pub fn is_application(self) -> bool {
        (0x30..0x40).contains(&self.tag())
    }
}

/// Total mapping from a raw tag to a display name.
///
/// Unregistered tags yield `"Unknown"`. Never fails.
#[inline]
#[must_use]
pub fn native_event_type_to_str(tag: u32) -> &'static str {
    NativeEventType::from_tag(tag).map_or("Unknown", NativeEventType::name)
}

// ============================================================================
// NativeEvent
// ============================================================================

/// A typed, identified event with a structured-document body.
///
/// Built by [`make_event`](Self::make_event) or
/// [`make_event_with_string`](Self::make_event_with_string); the detail
/// is stored in its canonical serialized form and deserialized lazily
/// on [`detail`](Self::detail).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    /// Correlation id minted from the shared allocator.
    id: u32,
    /// Event kind.
    event_type: NativeEventType,
    /// Canonical serialized detail document; empty when the event
    /// carries no detail.
    detail_json: String,
}

impl NativeEvent {
    /// Creates an event from a live detail object.
    ///
    /// Mints a new id from `ids` and stores the detail's canonical
    /// serialized document as the event body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the detail cannot be serialized.
    pub fn make_event<D: EventDetail>(
        ids: &SharedIdAllocator,
        event_type: NativeEventType,
        detail: &D,
    ) -> Result<Self> {
        let document = detail.to_document()?;
        Ok(Self {
            id: ids.mint(),
            event_type,
            detail_json: serde_json::to_string(&document)?,
        })
    }

    /// Creates an event from a detail document in textual form.
    ///
    /// The text is parsed as a structured document and stored
    /// canonicalized, so [`detail_json`](Self::detail_json) returns the
    /// canonical form of the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `text` is not a well-formed document.
    pub fn make_event_with_string(
        ids: &SharedIdAllocator,
        event_type: NativeEventType,
        text: &str,
    ) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Ok(Self {
            id: ids.mint(),
            event_type,
            detail_json: serde_json::to_string(&document)?,
        })
    }

    /// Reconstructs an event received off the wire, keeping its
    /// original correlation id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `text` is not a well-formed document.
    pub fn with_id(id: u32, event_type: NativeEventType, text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Ok(Self {
            id,
            event_type,
            detail_json: serde_json::to_string(&document)?,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the event's correlation id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the event type.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> NativeEventType {
        self.event_type
    }

    /// Deserializes the stored document into a typed detail.
    ///
    /// Parsing happens on each call; the event keeps only the
    /// canonical text.
    ///
    /// # Errors
    ///
    /// - [`Error::SchemaMismatch`] if the event has no detail or the
    ///   document is missing required fields
    /// - [`Error::Json`] if the stored text is not a document (cannot
    ///   happen for events built through the constructors)
    pub fn detail<D: EventDetail>(&self) -> Result<D> {
        if self.detail_json.is_empty() {
            return Err(Error::schema_mismatch(D::NAME, "event carries no detail"));
        }
        let document: Value = serde_json::from_str(&self.detail_json)?;
        D::from_document(&document)
    }

    /// Returns the canonical textual form of the detail document.
    ///
    /// Used for diagnostics and as the body of a
    /// [`NativeEventMessage`](crate::NativeEventMessage).
    #[inline]
    #[must_use]
    pub fn detail_json(&self) -> &str {
        &self.detail_json
    }

    /// Returns the byte length of the serialized detail.
    #[inline]
    #[must_use]
    pub fn detail_byte_length(&self) -> usize {
        self.detail_json.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
