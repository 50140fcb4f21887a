//! Catalog of the tools and resources a server exposes.

pub mod handler;
pub mod store;

pub use handler::{ResourceReader, StaticText, ToolHandler};
pub use store::{Catalog, ResourceEntry, ToolEntry};
