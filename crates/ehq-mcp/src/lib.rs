//! EHQ MCP Server: JSON-RPC tools and resources over stdio, HTTP and WebSocket.

pub mod catalog;
pub mod config;
pub mod protocol;
pub mod resources;
pub mod tools;
pub mod transport;
pub mod types;

pub use catalog::Catalog;
pub use config::UpstreamConfig;
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;

use resources::ResourceRegistry;
use tools::ToolRegistry;
use types::Implementation;

/// A handler with every built-in tool and resource installed.
pub fn build_handler(upstream: &UpstreamConfig) -> ProtocolHandler {
    let handler = ProtocolHandler::new(Implementation::server());
    ToolRegistry::install(handler.catalog(), upstream);
    ResourceRegistry::install(handler.catalog());
    handler
}
