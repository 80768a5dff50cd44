//! Native event wire envelope.
//!
//! [`NativeEventMessage`] wraps a native event's type tag and its
//! serialized detail document for transmission over a one-shot channel.
//!
//! # Wire Format
//!
//! ```text
//! [type: u32][bodyLen: u32][bodyBytes]
//! ```
//!
//! The raw tag is kept as received: an unregistered tag never blocks
//! decoding the rest of the envelope, it only fails typed access with
//! [`Error::UnknownType`].

// ============================================================================
// Imports
// ============================================================================

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};
use crate::identifiers::SharedIdAllocator;
use crate::protocol::event::{NativeEvent, NativeEventType, native_event_type_to_str};

// ============================================================================
// NativeEventMessage
// ============================================================================

/// Binary wire envelope for a native event.
///
/// Default construction yields an [`NativeEventType::Unset`] tag and an
/// empty body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NativeEventMessage {
    /// Raw type tag as seen on the wire.
    tag: u32,
    /// Serialized detail document bytes.
    body: Vec<u8>,
}

impl NativeEventMessage {
    /// Creates a message from a registered type and body bytes.
    #[inline]
    #[must_use]
    pub fn new(event_type: NativeEventType, body: Vec<u8>) -> Self {
        Self {
            tag: event_type.tag(),
            body,
        }
    }

    /// Wraps an event for transmission.
    ///
    /// The body is the event's canonical detail document.
    #[inline]
    #[must_use]
    pub fn from_event(event: &NativeEvent) -> Self {
        Self {
            tag: event.event_type().tag(),
            body: event.detail_json().as_bytes().to_vec(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the parsed event type.
    ///
    /// Available without materializing the body, so consumers can route
    /// before the full payload parse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for a tag outside the registered
    /// enumeration.
    #[inline]
    pub fn event_type(&self) -> Result<NativeEventType> {
        NativeEventType::from_tag(self.tag).ok_or(Error::UnknownType { tag: self.tag })
    }

    /// Returns the raw wire tag.
    #[inline]
    #[must_use]
    pub fn raw_type(&self) -> u32 {
        self.tag
    }

    /// Returns the display name for the tag; `"Unknown"` for
    /// unregistered values. Never fails.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        native_event_type_to_str(self.tag)
    }

    /// Returns the raw body bytes.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    // ========================================================================
    // Wire Codec
    // ========================================================================

    /// Serializes the envelope: type tag, body length, body bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.body.len());
        buf.put_u32_le(self.tag);
        buf.put_u32_le(self.body.len() as u32);
        buf.put_slice(&self.body);
        buf
    }

    /// Parses an envelope from a wire buffer.
    ///
    /// The declared body length is validated against the supplied
    /// buffer; never reads past `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] on truncated, over-declared or
    /// trailing-garbage input.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut buf = data;

        if buf.remaining() < 8 {
            return Err(Error::decode(format!(
                "event message header needs 8 bytes, got {}",
                buf.remaining()
            )));
        }
        let tag = buf.get_u32_le();
        let body_len = buf.get_u32_le() as usize;

        if buf.remaining() < body_len {
            return Err(Error::decode(format!(
                "body declares {body_len} bytes but only {} remain",
                buf.remaining()
            )));
        }
        if buf.remaining() > body_len {
            return Err(Error::decode(format!(
                "{} trailing bytes after body",
                buf.remaining() - body_len
            )));
        }

        Ok(Self {
            tag,
            body: buf[..body_len].to_vec(),
        })
    }

    /// Reads the type tag from a serialized buffer without decoding
    /// the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the buffer is shorter than the tag.
    pub fn peek_type(data: &[u8]) -> Result<u32> {
        let mut buf = data;
        if buf.remaining() < 4 {
            return Err(Error::decode(format!(
                "event message needs 4 bytes to peek type, got {}",
                buf.remaining()
            )));
        }
        Ok(buf.get_u32_le())
    }

    // ========================================================================
    // Event Reconstruction
    // ========================================================================

    /// Rebuilds a typed event from the envelope, minting a fresh local
    /// id from `ids`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownType`] for an unregistered tag
    /// - [`Error::Decode`] if the body is not UTF-8
    /// - [`Error::Json`] if the body is not a well-formed document
    pub fn into_event(self, ids: &SharedIdAllocator) -> Result<NativeEvent> {
        let event_type = self.event_type()?;
        let text = std::str::from_utf8(&self.body)
            .map_err(|e| Error::decode(format!("event body is not UTF-8: {e}")))?;
        NativeEvent::make_event_with_string(ids, event_type, text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::protocol::detail::RpcRequestDetail;

    #[test]
    fn test_round_trip_empty_body() {
        let message = NativeEventMessage::new(NativeEventType::OnClosed, Vec::new());
        let bytes = message.serialize();
        assert_eq!(bytes.len(), 8);

        let decoded = NativeEventMessage::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded.event_type().expect("type"), NativeEventType::OnClosed);
        assert!(decoded.body().is_empty());
    }

    #[test]
    fn test_round_trip_multi_kilobyte_body() {
        let body: Vec<u8> = (0..8192u32).map(|i| (i % 251) as u8).collect();
        let message = NativeEventMessage::new(NativeEventType::Message, body.clone());

        let decoded = NativeEventMessage::deserialize(&message.serialize()).expect("deserialize");
        assert_eq!(decoded.event_type().expect("type"), NativeEventType::Message);
        assert_eq!(decoded.body(), body.as_slice());
    }

    #[test]
    fn test_default_is_unset_and_empty() {
        let message = NativeEventMessage::default();
        assert_eq!(message.event_type().expect("type"), NativeEventType::Unset);
        assert!(message.body().is_empty());
    }

    #[test]
    fn test_unknown_tag_decodes_but_fails_typed_access() {
        let mut bytes = Vec::new();
        bytes.put_u32_le(0x99);
        bytes.put_u32_le(2);
        bytes.put_slice(b"{}");

        let decoded = NativeEventMessage::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded.raw_type(), 0x99);
        assert_eq!(decoded.body(), b"{}");
        assert_eq!(decoded.type_name(), "Unknown");
        assert!(matches!(
            decoded.event_type().unwrap_err(),
            Error::UnknownType { tag: 0x99 }
        ));
    }

    #[test]
    fn test_deserialize_rejects_overdeclared_body() {
        let mut bytes = Vec::new();
        bytes.put_u32_le(NativeEventType::Message.tag());
        bytes.put_u32_le(100);
        bytes.put_slice(b"short");

        let err = NativeEventMessage::deserialize(&bytes).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_deserialize_rejects_short_header() {
        let err = NativeEventMessage::deserialize(&[1, 2, 3]).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_deserialize_rejects_trailing_bytes() {
        let mut bytes = NativeEventMessage::new(NativeEventType::Error, b"{}".to_vec()).serialize();
        bytes.push(0);

        let err = NativeEventMessage::deserialize(&bytes).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_peek_type_matches_full_decode() {
        let message = NativeEventMessage::new(NativeEventType::RpcResponse, b"{}".to_vec());
        let bytes = message.serialize();

        let peeked = NativeEventMessage::peek_type(&bytes).expect("peek");
        let decoded = NativeEventMessage::deserialize(&bytes).expect("deserialize");
        assert_eq!(peeked, decoded.raw_type());
    }

    #[test]
    fn test_from_event_and_into_event() {
        let ids = SharedIdAllocator::for_events();
        let detail = RpcRequestDetail::new(5, "render").with_arg("frame");
        let event =
            NativeEvent::make_event(&ids, NativeEventType::RpcRequest, &detail).expect("make");

        let message = NativeEventMessage::from_event(&event);
        assert_eq!(message.body(), event.detail_json().as_bytes());

        let rebuilt = message.into_event(&ids).expect("into_event");
        assert_eq!(rebuilt.event_type(), NativeEventType::RpcRequest);
        let restored: RpcRequestDetail = rebuilt.detail().expect("detail");
        assert_eq!(restored.document_id, 5);
        assert_eq!(restored.method, "render");
    }

    #[test]
    fn test_into_event_rejects_unknown_tag() {
        let ids = SharedIdAllocator::for_events();
        let mut bytes = Vec::new();
        bytes.put_u32_le(0x99);
        bytes.put_u32_le(2);
        bytes.put_slice(b"{}");

        let message = NativeEventMessage::deserialize(&bytes).expect("deserialize");
        let err = message.into_event(&ids).unwrap_err();
        assert!(matches!(err, Error::UnknownType { .. }));
    }
}
