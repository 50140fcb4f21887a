//! `initialize` handling.
//!
//! There is no negotiation failure path: whatever the client declares, the
//! server answers with its own protocol version and capabilities.

use serde_json::Value;

use crate::types::{
    Implementation, InitializeParams, InitializeResult, ServerCapabilities, MCP_VERSION,
};

pub fn negotiate(
    params: Option<Value>,
    server_info: &Implementation,
    capabilities: &ServerCapabilities,
) -> InitializeResult {
    match params.map(serde_json::from_value::<InitializeParams>) {
        Some(Ok(init)) => {
            if init.protocol_version != MCP_VERSION {
                tracing::warn!(
                    "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                    init.protocol_version,
                    MCP_VERSION
                );
            }
            tracing::info!(
                "Initialized with client: {} v{}",
                init.client_info.name,
                init.client_info.version
            );
        }
        Some(Err(e)) => tracing::debug!("Unrecognized initialize params accepted: {e}"),
        None => tracing::debug!("Initialize without params"),
    }

    InitializeResult::new(server_info.clone(), capabilities.clone())
}
