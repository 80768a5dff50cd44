//! Command-buffer messages.
//!
//! Command buffers carry high-frequency low-level commands (graphics
//! and resource operations) across the process boundary: a fixed-layout
//! base payload plus an ordered list of opaque byte-string segments for
//! the variable-length parts (source strings, vertex data, URLs).
//!
//! # Wire Format
//!
//! One contiguous little-endian buffer:
//!
//! ```text
//! [type: u32][baseLen: u32][baseBytes][segCount: u32]{[segLen: u32][segBytes]}*
//! ```
//!
//! Every declared length is validated against the remaining input on
//! decode; a truncated or over-declared buffer fails with
//! [`Error::Decode`] instead of reading out of bounds.
//!
//! # Typed Payloads
//!
//! The base payload is opaque to the envelope. Producers and consumers
//! agree on its layout through the [`CommandPayload`] trait: each
//! command type registers its own checked `encode`/`decode` pair, and
//! [`CommandBufferMessage::decode_base`] refuses to parse a payload
//! whose registered type does not match the message's tag.

// ============================================================================
// Imports
// ============================================================================

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

// ============================================================================
// CommandBufferType
// ============================================================================

/// Closed enumeration of command kinds.
///
/// Tags are stable wire values; renumbering is a protocol break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CommandBufferType {
    /// Unrecognized or unset command.
    Unknown = 0,
    /// Initialize a rendering context.
    ContextInit = 1,
    /// Create a GPU program object.
    CreateProgram = 2,
    /// Link a GPU program.
    LinkProgram = 3,
    /// Create a shader object.
    CreateShader = 4,
    /// Compile a shader (source travels as a segment).
    CompileShader = 5,
    /// Create a buffer object.
    CreateBuffer = 6,
    /// Upload buffer data (bytes travel as a segment).
    BufferData = 7,
    /// Create a texture object.
    CreateTexture = 8,
    /// Upload a 2D texture image (pixels travel as a segment).
    TexImage2D = 9,
    /// Create a vertex array object.
    CreateVertexArray = 10,
    /// Configure a vertex attribute pointer.
    VertexAttribPointer = 11,
    /// Set a uniform value.
    SetUniform = 12,
    /// Issue a non-indexed draw call.
    DrawArrays = 13,
    /// Issue an indexed draw call.
    DrawElements = 14,
    /// Set the viewport rectangle.
    Viewport = 15,
}

/// Static table mapping command types to display names.
///
/// Indexed by tag value; used for diagnostics only.
const COMMAND_TYPE_NAMES: &[&str] = &[
    "Unknown",
    "ContextInit",
    "CreateProgram",
    "LinkProgram",
    "CreateShader",
    "CompileShader",
    "CreateBuffer",
    "BufferData",
    "CreateTexture",
    "TexImage2D",
    "CreateVertexArray",
    "VertexAttribPointer",
    "SetUniform",
    "DrawArrays",
    "DrawElements",
    "Viewport",
];

impl CommandBufferType {
    /// Maps a raw wire tag to a command type.
    ///
    /// Out-of-range tags map to [`CommandBufferType::Unknown`]; decoding
    /// is never blocked by an unrecognized tag.
    #[must_use]
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            1 => Self::ContextInit,
            2 => Self::CreateProgram,
            3 => Self::LinkProgram,
            4 => Self::CreateShader,
            5 => Self::CompileShader,
            6 => Self::CreateBuffer,
            7 => Self::BufferData,
            8 => Self::CreateTexture,
            9 => Self::TexImage2D,
            10 => Self::CreateVertexArray,
            11 => Self::VertexAttribPointer,
            12 => Self::SetUniform,
            13 => Self::DrawArrays,
            14 => Self::DrawElements,
            15 => Self::Viewport,
            _ => Self::Unknown,
        }
    }

    /// Returns the raw wire tag.
    #[inline]
    #[must_use]
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Returns the display name for this command type.
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        COMMAND_TYPE_NAMES[self.tag() as usize]
    }
}

/// Total mapping from a raw tag to a display name.
///
/// Every registered tag yields a non-empty name; out-of-range values
/// yield `"Unknown"`. Never fails.
#[inline]
#[must_use]
pub fn command_type_to_str(tag: u32) -> &'static str {
    CommandBufferType::from_tag(tag).name()
}

// ============================================================================
// CommandPayload
// ============================================================================

/// A fixed-layout base payload registered for one command type.
///
/// Implementors provide a checked, total parse of their own field
/// layout keyed by [`CommandBufferType`], replacing unchecked byte
/// reinterpretation: [`decode`](Self::decode) must validate the input
/// length and never read past it.
pub trait CommandPayload: Sized {
    /// The command type this payload is registered for.
    const TYPE: CommandBufferType;

    /// Encodes the payload into its fixed little-endian layout.
    fn encode(&self) -> Vec<u8>;

    /// Decodes the payload from its fixed little-endian layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when `bytes` does not match the
    /// payload's expected size.
    fn decode(bytes: &[u8]) -> Result<Self>;
}

/// Rejects a base payload whose size disagrees with the fixed layout.
fn expect_payload_len(name: &str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(Error::decode(format!(
            "{name} payload expects {expected} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

// ============================================================================
// Payloads
// ============================================================================

/// Base payload for [`CommandBufferType::ContextInit`].
///
/// The document URL associated with the context travels as segment 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextInitCommand {
    /// Drawing buffer width in pixels.
    pub width: u32,
    /// Drawing buffer height in pixels.
    pub height: u32,
}

impl CommandPayload for ContextInitCommand {
    const TYPE: CommandBufferType = CommandBufferType::ContextInit;

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8);
        buf.put_u32_le(self.width);
        buf.put_u32_le(self.height);
        buf
    }

    fn decode(mut bytes: &[u8]) -> Result<Self> {
        expect_payload_len("ContextInit", bytes, 8)?;
        Ok(Self {
            width: bytes.get_u32_le(),
            height: bytes.get_u32_le(),
        })
    }
}

/// Base payload for [`CommandBufferType::BufferData`].
///
/// The uploaded bytes travel as segment 0; `byte_length` declares how
/// many of them the consumer should bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferDataCommand {
    /// Binding target (e.g. array buffer, element array buffer).
    pub target: u32,
    /// Usage hint for the GPU allocator.
    pub usage: u32,
    /// Number of bytes in the data segment.
    pub byte_length: u32,
}

impl CommandPayload for BufferDataCommand {
    const TYPE: CommandBufferType = CommandBufferType::BufferData;

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(12);
        buf.put_u32_le(self.target);
        buf.put_u32_le(self.usage);
        buf.put_u32_le(self.byte_length);
        buf
    }

    fn decode(mut bytes: &[u8]) -> Result<Self> {
        expect_payload_len("BufferData", bytes, 12)?;
        Ok(Self {
            target: bytes.get_u32_le(),
            usage: bytes.get_u32_le(),
            byte_length: bytes.get_u32_le(),
        })
    }
}

/// Base payload for [`CommandBufferType::DrawArrays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawArraysCommand {
    /// Primitive mode (points, lines, triangles, …).
    pub mode: u32,
    /// First vertex index.
    pub first: i32,
    /// Number of vertices to draw.
    pub count: i32,
}

impl CommandPayload for DrawArraysCommand {
    const TYPE: CommandBufferType = CommandBufferType::DrawArrays;

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(12);
        buf.put_u32_le(self.mode);
        buf.put_i32_le(self.first);
        buf.put_i32_le(self.count);
        buf
    }

    fn decode(mut bytes: &[u8]) -> Result<Self> {
        expect_payload_len("DrawArrays", bytes, 12)?;
        Ok(Self {
            mode: bytes.get_u32_le(),
            first: bytes.get_i32_le(),
            count: bytes.get_i32_le(),
        })
    }
}

/// Base payload for [`CommandBufferType::Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportCommand {
    /// Left edge in pixels.
    pub x: i32,
    /// Bottom edge in pixels.
    pub y: i32,
    /// Viewport width in pixels.
    pub width: i32,
    /// Viewport height in pixels.
    pub height: i32,
}

impl CommandPayload for ViewportCommand {
    const TYPE: CommandBufferType = CommandBufferType::Viewport;

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        buf.put_i32_le(self.x);
        buf.put_i32_le(self.y);
        buf.put_i32_le(self.width);
        buf.put_i32_le(self.height);
        buf
    }

    fn decode(mut bytes: &[u8]) -> Result<Self> {
        expect_payload_len("Viewport", bytes, 16)?;
        Ok(Self {
            x: bytes.get_i32_le(),
            y: bytes.get_i32_le(),
            width: bytes.get_i32_le(),
            height: bytes.get_i32_le(),
        })
    }
}

// ============================================================================
// CommandBufferMessage
// ============================================================================

/// Binary envelope carrying a fixed-layout command plus segments.
///
/// Built by a producer holding a live command struct, serialized once,
/// transmitted, decoded once by the consumer, then discarded. Never
/// mutated after serialization. The message owns its decoded buffers
/// until dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBufferMessage {
    /// Command kind tag.
    command_type: CommandBufferType,
    /// Fixed-layout base payload (opaque to the envelope).
    base: Vec<u8>,
    /// Ordered variable-length segments.
    segments: Vec<Vec<u8>>,
}

impl CommandBufferMessage {
    /// Creates a message from a command type and raw base payload.
    ///
    /// The base payload's layout pairing with `command_type` is an
    /// unchecked precondition on the producer; the envelope treats the
    /// bytes as opaque.
    #[inline]
    #[must_use]
    pub fn new(command_type: CommandBufferType, base: Vec<u8>) -> Self {
        Self {
            command_type,
            base,
            segments: Vec::new(),
        }
    }

    /// Creates a message from a typed payload.
    ///
    /// Uses the payload's registered type and encoding, so the
    /// type/layout pairing cannot drift.
    #[inline]
    #[must_use]
    pub fn from_payload<P: CommandPayload>(payload: &P) -> Self {
        Self::new(P::TYPE, payload.encode())
    }

    /// Creates an empty command: zero segments, zero-length base.
    ///
    /// Legal on the wire; serializes to a header-only buffer.
    #[inline]
    #[must_use]
    pub fn empty(command_type: CommandBufferType) -> Self {
        Self::new(command_type, Vec::new())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the command type.
    #[inline]
    #[must_use]
    pub fn command_type(&self) -> CommandBufferType {
        self.command_type
    }

    /// Returns the raw base payload bytes.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &[u8] {
        &self.base
    }

    /// Returns the number of segments.
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the `index`-th segment's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SegmentOutOfRange`] if `index` is invalid.
    pub fn segment(&self, index: usize) -> Result<&[u8]> {
        self.segments
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::segment_out_of_range(index, self.segments.len()))
    }

    /// Returns the `index`-th segment as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SegmentOutOfRange`] if `index` is invalid, or
    /// [`Error::Decode`] if the segment is not valid UTF-8.
    pub fn segment_str(&self, index: usize) -> Result<&str> {
        let bytes = self.segment(index)?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::decode(format!("segment {index} is not UTF-8: {e}")))
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Appends a raw byte segment, preserving insertion order.
    #[inline]
    pub fn add_segment(&mut self, bytes: Vec<u8>) {
        self.segments.push(bytes);
    }

    /// Appends a string segment, preserving insertion order.
    #[inline]
    pub fn add_string_segment(&mut self, s: &str) {
        self.segments.push(s.as_bytes().to_vec());
    }

    // ========================================================================
    // Wire Codec
    // ========================================================================

    /// Serializes the message into one contiguous wire buffer.
    ///
    /// Layout: `[type][baseLen][baseBytes][segCount]{[segLen][segBytes]}*`,
    /// all integers little-endian `u32`. An empty command produces a
    /// header-only buffer.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let segments_len: usize = self.segments.iter().map(|s| 4 + s.len()).sum();
        let mut buf = Vec::with_capacity(4 + 4 + self.base.len() + 4 + segments_len);

        buf.put_u32_le(self.command_type.tag());
        buf.put_u32_le(self.base.len() as u32);
        buf.put_slice(&self.base);
        buf.put_u32_le(self.segments.len() as u32);
        for segment in &self.segments {
            buf.put_u32_le(segment.len() as u32);
            buf.put_slice(segment);
        }
        buf
    }

    /// Parses a message from a wire buffer.
    ///
    /// Fails closed: every declared length must fit within the
    /// remaining input, and trailing bytes are rejected. Never reads
    /// past `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] on any truncated, over-declared or
    /// trailing-garbage input.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut buf = data;

        let tag = read_u32(&mut buf, "command type")?;
        let base = read_block(&mut buf, "base payload")?;

        let segment_count = read_u32(&mut buf, "segment count")? as usize;
        // Capacity is clamped by the remaining input so a hostile
        // segment count cannot force a huge allocation.
        let mut segments = Vec::with_capacity(segment_count.min(buf.remaining()));
        for _ in 0..segment_count {
            segments.push(read_block(&mut buf, "segment")?.to_vec());
        }

        if buf.has_remaining() {
            return Err(Error::decode(format!(
                "{} trailing bytes after last segment",
                buf.remaining()
            )));
        }

        Ok(Self {
            command_type: CommandBufferType::from_tag(tag),
            base: base.to_vec(),
            segments,
        })
    }

    /// Decodes the base payload as a typed command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the message's type does not match
    /// `P`'s registered type, or if the payload bytes do not parse.
    pub fn decode_base<P: CommandPayload>(&self) -> Result<P> {
        if self.command_type != P::TYPE {
            return Err(Error::decode(format!(
                "payload type mismatch: message is {}, requested {}",
                self.command_type.name(),
                P::TYPE.name()
            )));
        }
        P::decode(&self.base)
    }
}

// ============================================================================
// Cursor Helpers
// ============================================================================

/// Reads a little-endian `u32`, failing closed on a short buffer.
fn read_u32(buf: &mut &[u8], what: &str) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(Error::decode(format!(
            "truncated buffer reading {what}: {} bytes remaining",
            buf.remaining()
        )));
    }
    Ok(buf.get_u32_le())
}

/// Reads a length-prefixed block, validating the declared length
/// against the remaining input.
fn read_block<'a>(buf: &mut &'a [u8], what: &str) -> Result<&'a [u8]> {
    let len = read_u32(buf, what)? as usize;
    if buf.remaining() < len {
        return Err(Error::decode(format!(
            "{what} declares {len} bytes but only {} remain",
            buf.remaining()
        )));
    }
    let (block, rest) = buf.split_at(len);
    *buf = rest;
    Ok(block)
}

// ============================================================================
// Tests
// ============================================================================
