//! Tool: get_projects. List projects from the EHQ API.
//!
//! Authenticates with the configured credentials, then lists filterable
//! projects. Upstream failures are reported in the returned JSON text, never
//! as protocol errors.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use ehq_api::EhqClient;

use crate::catalog::ToolHandler;
use crate::config::UpstreamConfig;
use crate::types::ToolDefinition;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_projects".to_string(),
        description: "Fetches projects from the EHQ API using authentication".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "search": {
                    "type": "string",
                    "description": "Search term to filter projects by name or description (optional)"
                }
            }
        }),
    }
}

pub struct GetProjects {
    upstream: UpstreamConfig,
}

impl GetProjects {
    pub fn new(upstream: UpstreamConfig) -> Self {
        Self { upstream }
    }

    async fn fetch(&self, search: Option<&str>) -> Value {
        let Some((login, password)) = self.upstream.credentials() else {
            return json!({ "error": "Upstream credentials are not configured" });
        };

        let mut client = match EhqClient::with_timeout(&self.upstream.base_url, self.upstream.timeout) {
            Ok(client) => client,
            Err(e) => return json!({ "error": format!("Failed to create API client: {e}") }),
        };

        if let Err(e) = client.authenticate(login, password).await {
            tracing::warn!("EHQ authentication failed: {e}");
            return json!({ "error": format!("Authentication failed: {e}") });
        }

        match client.projects(search).await {
            Ok(projects) => {
                tracing::info!("Projects fetched successfully: {}", projects.data.len());
                json!({
                    "success": true,
                    "count": projects.data.len(),
                    "data": projects.data,
                })
            }
            Err(e) => {
                tracing::warn!("EHQ project listing failed: {e}");
                json!({ "error": format!("Failed to fetch projects: {e}") })
            }
        }
    }
}

#[async_trait]
impl ToolHandler for GetProjects {
    async fn call(&self, arguments: Map<String, Value>) -> String {
        let search = arguments.get("search").and_then(Value::as_str);
        let outcome = self.fetch(search).await;
        serde_json::to_string(&outcome).unwrap_or_else(|e| format!("Error: {e}"))
    }
}
