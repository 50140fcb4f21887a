//! Tool: echo. Echo back the provided message.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::catalog::ToolHandler;
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "echo".to_string(),
        description: "Echoes back the provided message".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "Message to echo back" }
            },
            "required": ["message"]
        }),
    }
}

pub struct Echo;

#[async_trait]
impl ToolHandler for Echo {
    async fn call(&self, arguments: Map<String, Value>) -> String {
        match arguments.get("message").and_then(Value::as_str) {
            Some(message) => format!("Echo: {message}"),
            None => "Error: message parameter is required".to_string(),
        }
    }
}
