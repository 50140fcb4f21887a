//! Tool: hello_world. Return a friendly greeting.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use serde_json::{json, Map, Value};

use crate::catalog::ToolHandler;
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "hello_world".to_string(),
        description: "Returns a friendly hello world message".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Name to greet (optional)" }
            }
        }),
    }
}

pub struct HelloWorld;

#[async_trait]
impl ToolHandler for HelloWorld {
    async fn call(&self, arguments: Map<String, Value>) -> String {
        greeting(&arguments, &Local::now())
    }
}

/// Greeting for `name` (default "World") stamped with `now`.
pub fn greeting<Tz: TimeZone>(arguments: &Map<String, Value>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let name = arguments
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or("World");

    format!(
        "Hello, {name}! 🌍\nWelcome to the EHQ MCP Server!\nCurrent time: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}
