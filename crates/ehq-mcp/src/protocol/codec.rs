//! Envelope codec: raw bytes to [`Envelope`] and back.

use serde_json::Value;

use crate::types::{Envelope, McpError, McpResult, RequestId};

/// A message that could not be decoded.
///
/// `id` is set when the input was a JSON object with a readable `id`, so the
/// error reply can still be correlated.
#[derive(Debug)]
pub struct DecodeFailure {
    pub error: McpError,
    pub id: Option<RequestId>,
}

impl DecodeFailure {
    fn parse(e: impl std::fmt::Display, id: Option<RequestId>) -> Self {
        Self {
            error: McpError::ParseError(e.to_string()),
            id,
        }
    }

    pub fn into_envelope(self) -> Envelope {
        self.error.into_envelope(self.id)
    }
}

/// Decode one complete JSON document into an envelope.
///
/// Every failure (bad syntax, non UTF-8, not an object, fields of the wrong
/// type) is a `ParseError`.
pub fn decode(raw: &[u8]) -> Result<Envelope, DecodeFailure> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| DecodeFailure::parse(e, None))?;

    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

    serde_json::from_value(value).map_err(|e| DecodeFailure::parse(e, id))
}

/// Encode an envelope. Absent fields are left out.
pub fn encode(envelope: &Envelope) -> McpResult<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(McpError::Json)
}
