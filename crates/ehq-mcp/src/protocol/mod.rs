//! MCP protocol handling: envelope codec and JSON-RPC dispatch.

pub mod codec;
pub mod handler;
pub mod method;
pub mod negotiation;
pub mod validator;

pub use handler::ProtocolHandler;
pub use method::Method;
