//! Error types for the messaging layer.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use runtime_messaging::{Result, CommandBufferMessage};
//!
//! fn example(bytes: &[u8]) -> Result<()> {
//!     let message = CommandBufferMessage::deserialize(bytes)?;
//!     let segment = message.segment(0)?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Codec | [`Error::Encode`], [`Error::Decode`] |
//! | Transport | [`Error::TransportTimeout`], [`Error::TransportFailure`] |
//! | Documents | [`Error::SchemaMismatch`], [`Error::Json`] |
//! | Envelope | [`Error::UnknownType`], [`Error::SegmentOutOfRange`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging. Encode/decode
/// errors are returned to the immediate caller and never swallowed;
/// transport errors surface as boolean or empty results from the
/// sender/receiver endpoints. This layer performs no implicit retries.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// Message encoding failed.
    ///
    /// Returned when a message cannot be turned into wire bytes.
    #[error("Encode error: {message}")]
    Encode {
        /// Description of the encode failure.
        message: String,
    },

    /// Message decoding failed.
    ///
    /// Returned when a declared length exceeds the remaining buffer or
    /// the buffer is otherwise malformed. Decoding never reads past the
    /// supplied input.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Transport call exceeded the caller-supplied timeout.
    #[error("Transport timed out after {timeout_ms}ms")]
    TransportTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Channel I/O failure.
    ///
    /// Returned when the underlying one-shot channel fails for reasons
    /// outside this layer (peer closed, broken pipe, oversized frame).
    #[error("Transport failure: {message}")]
    TransportFailure {
        /// Description of the channel failure.
        message: String,
    },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Document is missing required fields for the requested detail type.
    #[error("Schema mismatch for {detail_type}: {message}")]
    SchemaMismatch {
        /// Name of the detail type that failed to materialize.
        detail_type: &'static str,
        /// Description of the mismatch.
        message: String,
    },

    // ========================================================================
    // Envelope Errors
    // ========================================================================
    /// Type tag outside the registered enumeration.
    ///
    /// Affects only typed access and diagnostic naming; decoding the
    /// rest of the envelope is never blocked by an unknown tag.
    #[error("Unknown type tag: {tag:#x}")]
    UnknownType {
        /// The unregistered tag value.
        tag: u32,
    },

    /// Segment index out of range.
    #[error("Segment index {index} out of range (count: {count})")]
    SegmentOutOfRange {
        /// The requested segment index.
        index: usize,
        /// Number of segments in the message.
        count: usize,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON parse or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an encode error.
    #[inline]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a transport timeout error.
    #[inline]
    pub fn transport_timeout(timeout_ms: u64) -> Self {
        Self::TransportTimeout { timeout_ms }
    }

    /// Creates a transport failure error.
    #[inline]
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            message: message.into(),
        }
    }

    /// Creates a schema mismatch error.
    #[inline]
    pub fn schema_mismatch(detail_type: &'static str, message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            detail_type,
            message: message.into(),
        }
    }

    /// Creates an unknown type error.
    #[inline]
    pub fn unknown_type(tag: u32) -> Self {
        Self::UnknownType { tag }
    }

    /// Creates a segment out-of-range error.
    #[inline]
    pub fn segment_out_of_range(index: usize, count: usize) -> Self {
        Self::SegmentOutOfRange { index, count }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a transport timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TransportTimeout { .. })
    }

    /// Returns `true` if this is a decode error (malformed wire bytes).
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns `true` if this is a transport-level error.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. } | Self::TransportFailure { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
