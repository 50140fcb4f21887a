//! JSON-RPC 2.0 envelope for the MCP protocol.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier: string, number, or null.
///
/// Numbers keep their JSON form, so ids outside the `i64` range echo back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
    Null,
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// Error object within a JSON-RPC error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One protocol message: request, success response or error response.
///
/// The kind is decided by which fields are present, see [`Envelope::kind`].
/// Absent fields are omitted on the wire. An explicit `null` id or result is
/// kept as `Some(..)` so decoding and re-encoding is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Carried as sent. A missing tag reads as empty.
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

/// What an envelope is, judged by field presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    Request,
    Success,
    Failure,
    /// Neither shape, or a mix of both.
    Malformed,
}

/// Field present (even as `null`) deserializes to `Some`; missing falls back to `default`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Envelope {
    pub fn request(id: Option<RequestId>, method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: Some(method.to_string()),
            params,
            result: None,
            error: None,
        }
    }

    /// Responses always carry an id; an unknown one is sent as `null`.
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.unwrap_or(RequestId::Null)),
            method: None,
            params: None,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<RequestId>, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.unwrap_or(RequestId::Null)),
            method: None,
            params: None,
            result: None,
            error: Some(error),
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        match (&self.method, &self.result, &self.error) {
            (Some(_), None, None) => EnvelopeKind::Request,
            (None, Some(_), None) => EnvelopeKind::Success,
            (None, None, Some(_)) => EnvelopeKind::Failure,
            _ => EnvelopeKind::Malformed,
        }
    }
}
