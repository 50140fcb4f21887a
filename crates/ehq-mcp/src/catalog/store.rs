//! Tool and resource catalog, keyed by tool name and resource URI.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::types::{McpError, McpResult, ResourceDefinition, ToolDefinition};

use super::handler::{ResourceReader, ToolHandler};

/// A registered tool: its descriptor and the handler that runs it.
#[derive(Clone)]
pub struct ToolEntry {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

/// A registered resource: its descriptor and the reader that produces its content.
#[derive(Clone)]
pub struct ResourceEntry {
    pub definition: ResourceDefinition,
    pub reader: Arc<dyn ResourceReader>,
}

/// The server's two registries.
///
/// Registration replaces any entry with the same key. Both maps sit behind
/// read-write locks so registering while transports are serving is safe;
/// lookups clone the entry out so no lock is held while a handler runs.
#[derive(Default)]
pub struct Catalog {
    tools: RwLock<HashMap<String, ToolEntry>>,
    resources: RwLock<HashMap<String, ResourceEntry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool(&self, definition: ToolDefinition, handler: Arc<dyn ToolHandler>) {
        let name = definition.name.clone();
        let mut tools = self.tools.write().unwrap_or_else(|e| e.into_inner());
        let replaced = tools
            .insert(name.clone(), ToolEntry { definition, handler })
            .is_some();
        if replaced {
            tracing::info!("Re-registered tool: {name}");
        } else {
            tracing::info!("Registered tool: {name}");
        }
    }

    pub fn register_resource(
        &self,
        definition: ResourceDefinition,
        reader: Arc<dyn ResourceReader>,
    ) {
        let uri = definition.uri.clone();
        let mut resources = self.resources.write().unwrap_or_else(|e| e.into_inner());
        let replaced = resources
            .insert(uri.clone(), ResourceEntry { definition, reader })
            .is_some();
        if replaced {
            tracing::info!("Re-registered resource: {uri}");
        } else {
            tracing::info!("Registered resource: {uri}");
        }
    }

    pub fn tool(&self, name: &str) -> McpResult<Option<ToolEntry>> {
        let tools = self.tools.read().map_err(poisoned)?;
        Ok(tools.get(name).cloned())
    }

    pub fn resource(&self, uri: &str) -> McpResult<Option<ResourceEntry>> {
        let resources = self.resources.read().map_err(poisoned)?;
        Ok(resources.get(uri).cloned())
    }

    /// Tool descriptors sorted by name.
    pub fn list_tools(&self) -> McpResult<Vec<ToolDefinition>> {
        let tools = self.tools.read().map_err(poisoned)?;
        let mut list: Vec<_> = tools.values().map(|t| t.definition.clone()).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Resource descriptors sorted by uri.
    pub fn list_resources(&self) -> McpResult<Vec<ResourceDefinition>> {
        let resources = self.resources.read().map_err(poisoned)?;
        let mut list: Vec<_> = resources.values().map(|r| r.definition.clone()).collect();
        list.sort_by(|a, b| a.uri.cmp(&b.uri));
        Ok(list)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> McpError {
    McpError::InternalError(format!("Catalog lock poisoned: {e}"))
}
