//! Native event detail types.
//!
//! A detail is the structured payload attached to a native event: an
//! RPC request or response, a document load request, or a document
//! lifecycle/metrics event. Each detail type round-trips every field
//! losslessly through a structured document (a JSON map keyed by field
//! name, carrying numbers, UTF-8 strings and ordered lists of either).
//!
//! # Symmetric Codec
//!
//! [`EventDetail`] pairs pure `to_document`/`from_document` functions
//! per detail type, so [`NativeEvent::detail`](crate::NativeEvent::detail)
//! stays generic without virtual dispatch. Field names on the wire are
//! camelCase (`documentId`, `disableCache`, …).

// ============================================================================
// Imports
// ============================================================================

use std::sync::OnceLock;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// EventDetail Trait
// ============================================================================

/// A typed detail payload with a symmetric document codec.
///
/// Implemented by deriving `Serialize`/`Deserialize` and declaring a
/// diagnostic [`NAME`](Self::NAME); the document conversions come for
/// free and are exact inverses of each other.
pub trait EventDetail: Serialize + DeserializeOwned {
    /// Detail type name used in [`Error::SchemaMismatch`] diagnostics.
    const NAME: &'static str;

    /// Converts the detail into its structured document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if a field cannot be represented.
    fn to_document(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::Json)
    }

    /// Reconstructs the detail from a structured document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] if required fields are missing
    /// or have the wrong shape.
    fn from_document(document: &Value) -> Result<Self> {
        serde_json::from_value(document.clone())
            .map_err(|e| Error::schema_mismatch(Self::NAME, e.to_string()))
    }
}

// ============================================================================
// RpcRequestDetail
// ============================================================================

/// An RPC call from one process to its peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequestDetail {
    /// Target document.
    #[serde(rename = "documentId")]
    pub document_id: u32,

    /// Method name to invoke.
    pub method: String,

    /// Ordered string arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl RpcRequestDetail {
    /// Creates a request with no arguments.
    #[inline]
    #[must_use]
    pub fn new(document_id: u32, method: impl Into<String>) -> Self {
        Self {
            document_id,
            method: method.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl EventDetail for RpcRequestDetail {
    const NAME: &'static str = "RpcRequest";
}

// ============================================================================
// RpcResponseDetail
// ============================================================================

/// The outcome of an RPC call.
///
/// Simple responses carry only `success` and `message`; richer
/// responses attach an extra `data` document, omitted from the wire
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponseDetail {
    /// Whether the call succeeded.
    pub success: bool,

    /// Human-readable outcome description.
    #[serde(default)]
    pub message: String,

    /// Optional response data document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponseDetail {
    /// Creates a success response.
    #[inline]
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a failure response.
    #[inline]
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches a response data document.
    #[inline]
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl EventDetail for RpcResponseDetail {
    const NAME: &'static str = "RpcResponse";
}

// ============================================================================
// DocumentRequestDetail
// ============================================================================

/// How scripts in a requested document are allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptRunMode {
    /// Run scripts with full capabilities.
    #[default]
    Dangerously,
    /// Run scripts in the restricted sandbox.
    Safely,
    /// Do not run scripts at all.
    Disabled,
}

/// A request to load a document into the script process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequestDetail {
    /// Identifier assigned to the new document.
    #[serde(rename = "documentId")]
    pub document_id: u32,

    /// Document URL to load.
    pub url: String,

    /// Bypass the resource cache for this load.
    #[serde(rename = "disableCache", default)]
    pub disable_cache: bool,

    /// Load as a non-interactive preview.
    #[serde(rename = "isPreview", default)]
    pub is_preview: bool,

    /// Script execution policy for the document.
    #[serde(rename = "runScripts", default)]
    pub run_scripts: ScriptRunMode,
}

impl DocumentRequestDetail {
    /// Creates a request with default cache, preview and script policy.
    #[inline]
    #[must_use]
    pub fn new(document_id: u32, url: impl Into<String>) -> Self {
        Self {
            document_id,
            url: url.into(),
            disable_cache: false,
            is_preview: false,
            run_scripts: ScriptRunMode::default(),
        }
    }
}

impl EventDetail for DocumentRequestDetail {
    const NAME: &'static str = "DocumentRequest";
}

// ============================================================================
// DocumentEventDetail
// ============================================================================

/// Document lifecycle and metrics event kinds.
///
/// Serialized as the numeric tag. Tags start at `0x10`; values below
/// are reserved, and unrecognized tags map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
#[repr(u32)]
pub enum DocumentEventType {
    /// Unrecognized event kind.
    Unknown = 0x10,
    /// The content process was spawned.
    SpawnProcess = 0x11,
    /// The document is about to start scripting.
    BeforeScripting = 0x12,
    /// The document is about to start loading.
    BeforeLoading = 0x13,
    /// The document dispatched a subresource request.
    DispatchRequest = 0x14,
    /// The document finished loading.
    Loaded = 0x15,
    /// The document's load event fired.
    Load = 0x16,
    /// The DOM tree finished parsing.
    DomContentLoaded = 0x17,
    /// First contentful paint metric.
    FirstContentfulPaint = 0x18,
    /// Largest contentful paint metric.
    LargestContentfulPaint = 0x19,
    /// The document hit an error.
    Error = 0x1a,
}

impl DocumentEventType {
    /// Returns the display name for this event kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::SpawnProcess => "spawnprocess",
            Self::BeforeScripting => "beforescripting",
            Self::BeforeLoading => "beforeloading",
            Self::DispatchRequest => "dispatchrequest",
            Self::Loaded => "loaded",
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::FirstContentfulPaint => "fcp",
            Self::LargestContentfulPaint => "lcp",
            Self::Error => "error",
        }
    }
}

impl From<u32> for DocumentEventType {
    fn from(tag: u32) -> Self {
        match tag {
            0x11 => Self::SpawnProcess,
            0x12 => Self::BeforeScripting,
            0x13 => Self::BeforeLoading,
            0x14 => Self::DispatchRequest,
            0x15 => Self::Loaded,
            0x16 => Self::Load,
            0x17 => Self::DomContentLoaded,
            0x18 => Self::FirstContentfulPaint,
            0x19 => Self::LargestContentfulPaint,
            0x1a => Self::Error,
            _ => Self::Unknown,
        }
    }
}

impl From<DocumentEventType> for u32 {
    #[inline]
    fn from(event_type: DocumentEventType) -> Self {
        event_type as u32
    }
}

/// A document lifecycle/metrics event reported to the renderer process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEventDetail {
    /// Source document.
    #[serde(rename = "documentId")]
    pub document_id: u32,

    /// Event kind.
    #[serde(rename = "eventType")]
    pub event_type: DocumentEventType,

    /// Monotonic milliseconds captured when the detail was built.
    #[serde(default)]
    pub timestamp: u64,
}

impl DocumentEventDetail {
    /// Creates an event, capturing the timestamp now.
    #[inline]
    #[must_use]
    pub fn new(document_id: u32, event_type: DocumentEventType) -> Self {
        Self {
            document_id,
            event_type,
            timestamp: monotonic_millis(),
        }
    }

    /// Creates an event with an explicit timestamp.
    #[inline]
    #[must_use]
    pub fn with_timestamp(document_id: u32, event_type: DocumentEventType, timestamp: u64) -> Self {
        Self {
            document_id,
            event_type,
            timestamp,
        }
    }
}

impl EventDetail for DocumentEventDetail {
    const NAME: &'static str = "DocumentEvent";
}

/// Milliseconds elapsed on the process-wide monotonic clock.
///
/// Anchored at first use; values are comparable within one process
/// only, which is all the event timeline needs.
fn monotonic_millis() -> u64 {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    ANCHOR.get_or_init(Instant::now).elapsed().as_millis() as u64
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_rpc_request_round_trip() {
        let detail = RpcRequestDetail::new(1, "method")
            .with_arg("arg1")
            .with_arg("arg2");

        let document = detail.to_document().expect("to_document");
        let restored = RpcRequestDetail::from_document(&document).expect("from_document");

        assert_eq!(restored.document_id, 1);
        assert_eq!(restored.method, "method");
        assert_eq!(restored.args, vec!["arg1".to_string(), "arg2".to_string()]);
        assert_eq!(restored, detail);
    }

    #[test]
    fn test_rpc_request_camel_case_fields() {
        let document = RpcRequestDetail::new(7, "ping").to_document().expect("doc");
        assert_eq!(document["documentId"], json!(7));
        assert_eq!(document["method"], json!("ping"));
    }

    #[test]
    fn test_rpc_request_missing_method_is_schema_mismatch() {
        let document = json!({ "documentId": 1 });
        let err = RpcRequestDetail::from_document(&document).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch {
                detail_type: "RpcRequest",
                ..
            }
        ));
    }

    #[test]
    fn test_rpc_response_round_trip() {
        let detail = RpcResponseDetail::fail("document not found");
        let document = detail.to_document().expect("doc");
        let restored = RpcResponseDetail::from_document(&document).expect("restore");

        assert!(!restored.success);
        assert_eq!(restored.message, "document not found");
        assert!(restored.data.is_none());
    }

    #[test]
    fn test_rpc_response_data_omitted_when_absent() {
        let document = RpcResponseDetail::ok("done").to_document().expect("doc");
        assert!(document.get("data").is_none());
    }

    #[test]
    fn test_rpc_response_with_data() {
        let detail = RpcResponseDetail::ok("done").with_data(json!({ "frames": 60 }));
        let document = detail.to_document().expect("doc");
        let restored = RpcResponseDetail::from_document(&document).expect("restore");
        assert_eq!(restored.data, Some(json!({ "frames": 60 })));
    }

    #[test]
    fn test_document_request_round_trip() {
        let detail = DocumentRequestDetail {
            document_id: 9,
            url: "https://example.com/scene.xsml".to_string(),
            disable_cache: true,
            is_preview: true,
            run_scripts: ScriptRunMode::Safely,
        };

        let document = detail.to_document().expect("doc");
        assert_eq!(document["disableCache"], json!(true));
        assert_eq!(document["isPreview"], json!(true));
        assert_eq!(document["runScripts"], json!("safely"));

        let restored = DocumentRequestDetail::from_document(&document).expect("restore");
        assert_eq!(restored, detail);
    }

    #[test]
    fn test_document_request_defaults() {
        let document = json!({ "documentId": 3, "url": "https://example.com" });
        let restored = DocumentRequestDetail::from_document(&document).expect("restore");
        assert!(!restored.disable_cache);
        assert!(!restored.is_preview);
        assert_eq!(restored.run_scripts, ScriptRunMode::Dangerously);
    }

    #[test]
    fn test_document_event_captures_timestamp() {
        let detail = DocumentEventDetail::new(2, DocumentEventType::Loaded);
        // Captured from the monotonic clock; exact value is
        // process-relative, only its presence is guaranteed.
        let restored = DocumentEventDetail::from_document(&detail.to_document().expect("doc"))
            .expect("restore");
        assert_eq!(restored.timestamp, detail.timestamp);
    }

    #[test]
    fn test_document_event_explicit_timestamp_preserved() {
        let detail =
            DocumentEventDetail::with_timestamp(2, DocumentEventType::Load, 123_456);
        let restored = DocumentEventDetail::from_document(&detail.to_document().expect("doc"))
            .expect("restore");
        assert_eq!(restored.timestamp, 123_456);
        assert_eq!(restored.event_type, DocumentEventType::Load);
    }

    #[test]
    fn test_document_event_type_serializes_as_tag() {
        let document = DocumentEventDetail::with_timestamp(1, DocumentEventType::Loaded, 0)
            .to_document()
            .expect("doc");
        assert_eq!(document["eventType"], json!(0x15));
    }

    #[test]
    fn test_document_event_type_unknown_fallback() {
        assert_eq!(DocumentEventType::from(0), DocumentEventType::Unknown);
        assert_eq!(DocumentEventType::from(0xffff), DocumentEventType::Unknown);
        assert_eq!(
            DocumentEventType::from(0x17),
            DocumentEventType::DomContentLoaded
        );
    }

    #[test]
    fn test_document_event_type_names() {
        assert_eq!(DocumentEventType::DomContentLoaded.name(), "DOMContentLoaded");
        assert_eq!(DocumentEventType::FirstContentfulPaint.name(), "fcp");
        assert_eq!(DocumentEventType::Unknown.name(), "unknown");
    }

    #[test]
    fn test_monotonic_millis_is_nondecreasing() {
        let a = monotonic_millis();
        let b = monotonic_millis();
        assert!(b >= a);
    }
}
