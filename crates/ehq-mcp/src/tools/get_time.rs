//! Tool: get_time. Return the current date and time.

use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use serde_json::{json, Map, Value};

use crate::catalog::ToolHandler;
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_time".to_string(),
        description: "Returns the current date and time".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "format": {
                    "type": "string",
                    "description": "Time format (optional, defaults to RFC3339)",
                    "enum": ["RFC3339", "Unix", "Kitchen"]
                }
            }
        }),
    }
}

pub struct GetTime;

#[async_trait]
impl ToolHandler for GetTime {
    async fn call(&self, arguments: Map<String, Value>) -> String {
        let format = arguments
            .get("format")
            .and_then(Value::as_str)
            .unwrap_or("RFC3339");
        render(format, &Local::now())
    }
}

/// Render `now` in one of the supported formats. Unknown formats fall back to RFC 3339.
pub fn render<Tz: TimeZone>(format: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match format {
        "Unix" => format!("Unix timestamp: {}", now.timestamp()),
        "Kitchen" => format!("Time: {}", now.format("%-I:%M%p")),
        _ => format!("Time: {}", now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}
