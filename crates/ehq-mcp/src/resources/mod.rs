//! MCP resource implementations.

pub mod hello;
pub mod registry;
pub mod server_info;

pub use registry::ResourceRegistry;
