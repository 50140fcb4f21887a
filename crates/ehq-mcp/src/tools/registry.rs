//! Built-in tool registration.

use std::sync::Arc;

use crate::catalog::{Catalog, ToolHandler};
use crate::config::UpstreamConfig;
use crate::types::ToolDefinition;

use super::{echo, get_projects, get_time, hello_world};

pub struct ToolRegistry;

impl ToolRegistry {
    /// Every built-in tool with its handler.
    pub fn builtin(upstream: &UpstreamConfig) -> Vec<(ToolDefinition, Arc<dyn ToolHandler>)> {
        vec![
            entry(hello_world::definition(), hello_world::HelloWorld),
            entry(echo::definition(), echo::Echo),
            entry(get_time::definition(), get_time::GetTime),
            entry(
                get_projects::definition(),
                get_projects::GetProjects::new(upstream.clone()),
            ),
        ]
    }

    pub fn install(catalog: &Catalog, upstream: &UpstreamConfig) {
        for (definition, handler) in Self::builtin(upstream) {
            catalog.register_tool(definition, handler);
        }
    }
}

fn entry(
    definition: ToolDefinition,
    handler: impl ToolHandler + 'static,
) -> (ToolDefinition, Arc<dyn ToolHandler>) {
    let handler: Arc<dyn ToolHandler> = Arc::new(handler);
    (definition, handler)
}
