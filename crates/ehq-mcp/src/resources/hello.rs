//! Resource: hello://world

use crate::catalog::StaticText;
use crate::types::ResourceDefinition;

pub const URI: &str = "hello://world";
pub const TEXT: &str = "Hello, World! This is a sample resource from the MCP server.";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: URI.to_string(),
        name: "Hello World".to_string(),
        description: Some("A simple hello world resource".to_string()),
        mime_type: Some("text/plain".to_string()),
    }
}

pub fn reader() -> StaticText {
    StaticText(TEXT.to_string())
}
