//! MCP tool implementations.

pub mod echo;
pub mod get_projects;
pub mod get_time;
pub mod hello_world;
pub mod registry;

pub use registry::ToolRegistry;
