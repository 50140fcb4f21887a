//! Behaviour attached to catalog entries.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::{Implementation, McpResult};

/// Executes a tool.
///
/// Tools have no declared error contract, so a handler never fails at the
/// protocol level: problems are reported in the returned text.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Map<String, Value>) -> String;
}

/// Produces the text content of a resource.
pub trait ResourceReader: Send + Sync {
    fn read(&self, server: &Implementation) -> McpResult<String>;
}

/// A resource whose content never changes.
#[derive(Debug, Clone)]
pub struct StaticText(pub String);

impl ResourceReader for StaticText {
    fn read(&self, _server: &Implementation) -> McpResult<String> {
        Ok(self.0.clone())
    }
}
