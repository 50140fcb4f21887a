//! Transport layer for MCP communication.

pub mod framing;
#[cfg(feature = "http")]
pub mod http;
pub mod shutdown;
pub mod stdio;
#[cfg(feature = "http")]
pub mod ws;

#[cfg(feature = "http")]
pub use http::{serve_router, HttpTransport};
pub use shutdown::{shutdown_channel, ConnectionTracker, Shutdown, ShutdownTrigger};
pub use stdio::StdioTransport;
#[cfg(feature = "http")]
pub use ws::WsTransport;
