//! Resource: info://server

use crate::catalog::ResourceReader;
use crate::types::{Implementation, McpResult, ResourceDefinition, MCP_VERSION};

pub const URI: &str = "info://server";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: URI.to_string(),
        name: "Server Information".to_string(),
        description: Some("Information about this MCP server".to_string()),
        mime_type: Some("text/plain".to_string()),
    }
}

/// Describes whichever server serves the read.
pub struct ServerInfo;

impl ResourceReader for ServerInfo {
    fn read(&self, server: &Implementation) -> McpResult<String> {
        Ok(format!(
            "Server: {} v{}\nProtocol: {MCP_VERSION}",
            server.name, server.version
        ))
    }
}
