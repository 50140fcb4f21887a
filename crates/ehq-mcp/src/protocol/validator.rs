//! JSON-RPC message validation.

use crate::types::{Envelope, EnvelopeKind, McpError, McpResult, JSONRPC_VERSION};

/// Validate that an incoming envelope is a request.
///
/// A `jsonrpc` tag other than `"2.0"` is tolerated and only logged.
pub fn validate_request(envelope: &Envelope) -> McpResult<()> {
    if envelope.jsonrpc != JSONRPC_VERSION {
        tracing::debug!(
            "Accepting message with jsonrpc version {:?}, expected \"{JSONRPC_VERSION}\"",
            envelope.jsonrpc
        );
    }

    match envelope.kind() {
        EnvelopeKind::Request => Ok(()),
        EnvelopeKind::Success | EnvelopeKind::Failure => Err(McpError::InvalidRequest(
            "Expected a request, got a response".to_string(),
        )),
        EnvelopeKind::Malformed => Err(McpError::InvalidRequest(
            "A request must have a method and no result or error".to_string(),
        )),
    }
}
