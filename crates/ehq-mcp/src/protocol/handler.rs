//! Request dispatcher. Receives JSON-RPC messages and routes them to handlers.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::catalog::{Catalog, ResourceReader, ToolHandler};
use crate::types::*;

use super::codec;
use super::method::Method;
use super::negotiation;
use super::validator::validate_request;

/// The protocol core shared by every transport.
///
/// Each exchange is independent: nothing about a previous message affects how
/// the next one is handled. The only shared state is the catalog.
pub struct ProtocolHandler {
    server_info: Implementation,
    capabilities: ServerCapabilities,
    catalog: Arc<Catalog>,
}

impl ProtocolHandler {
    pub fn new(server_info: Implementation) -> Self {
        Self::with_catalog(server_info, Arc::new(Catalog::new()))
    }

    pub fn with_catalog(server_info: Implementation, catalog: Arc<Catalog>) -> Self {
        Self {
            server_info,
            capabilities: ServerCapabilities::default_capabilities(),
            catalog,
        }
    }

    pub fn server_info(&self) -> &Implementation {
        &self.server_info
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn register_tool(&self, definition: ToolDefinition, handler: Arc<dyn ToolHandler>) {
        self.catalog.register_tool(definition, handler);
    }

    pub fn register_resource(
        &self,
        definition: ResourceDefinition,
        reader: Arc<dyn ResourceReader>,
    ) {
        self.catalog.register_resource(definition, reader);
    }

    /// Decode, dispatch and encode one raw message.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Vec<u8> {
        let response = match codec::decode(raw) {
            Ok(envelope) => self.handle_envelope(envelope).await,
            Err(failure) => {
                tracing::warn!("Failed to decode message: {}", failure.error);
                failure.into_envelope()
            }
        };

        codec::encode(&response).unwrap_or_else(|e| {
            tracing::error!("Failed to encode response: {e}");
            format!(
                r#"{{"jsonrpc":"{JSONRPC_VERSION}","id":null,"error":{{"code":{},"message":"Failed to encode response"}}}}"#,
                error_codes::INTERNAL_ERROR
            )
            .into_bytes()
        })
    }

    /// Dispatch one decoded envelope. Always produces a response envelope.
    pub async fn handle_envelope(&self, envelope: Envelope) -> Envelope {
        let id = envelope.id.clone();

        if let Err(e) = validate_request(&envelope) {
            tracing::warn!("Rejected message: {e}");
            return e.into_envelope(id);
        }

        let name = envelope.method.unwrap_or_default();
        let Some(method) = Method::from_name(&name) else {
            tracing::warn!("Method not found: {name}");
            return McpError::MethodNotFound(name).into_envelope(id);
        };

        tracing::debug!(
            "Handling {method} request (id: {})",
            id.as_ref().unwrap_or(&RequestId::Null)
        );

        match self.dispatch(method, envelope.params).await {
            Ok(result) => Envelope::success(id, result),
            Err(e) => {
                tracing::warn!("{method} failed: {e}");
                e.into_envelope(id)
            }
        }
    }

    async fn dispatch(&self, method: Method, params: Option<Value>) -> McpResult<Value> {
        match method {
            Method::Initialize => to_result(negotiation::negotiate(
                params,
                &self.server_info,
                &self.capabilities,
            )),
            Method::ToolsList => to_result(ToolListResult {
                tools: self.catalog.list_tools()?,
            }),
            Method::ToolsCall => self.handle_tools_call(params).await,
            Method::ResourcesList => to_result(ResourceListResult {
                resources: self.catalog.list_resources()?,
            }),
            Method::ResourcesRead => self.handle_resources_read(params),
        }
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let call: ToolCallParams = parse_params(params, "Tool call")?;

        let entry = self
            .catalog
            .tool(&call.name)?
            .ok_or_else(|| McpError::ToolNotFound(call.name.clone()))?;

        tracing::info!("Executing tool: {}", call.name);

        let arguments = call.arguments.unwrap_or_else(Map::new);
        let handler = entry.handler;
        let text = tokio::spawn(async move { handler.call(arguments).await })
            .await
            .map_err(|e| McpError::InternalError(format!("Tool '{}' failed: {e}", call.name)))?;

        to_result(ToolCallResult::text(text))
    }

    fn handle_resources_read(&self, params: Option<Value>) -> McpResult<Value> {
        let read: ResourceReadParams = parse_params(params, "Resource read")?;

        let entry = self
            .catalog
            .resource(&read.uri)?
            .ok_or_else(|| McpError::ResourceNotFound(read.uri.clone()))?;

        tracing::info!("Reading resource: {}", read.uri);

        let text = entry.reader.read(&self.server_info).map_err(|e| {
            McpError::InternalError(format!("Failed to read resource {}: {e}", read.uri))
        })?;

        to_result(ReadResourceResult {
            contents: vec![ResourceContent {
                uri: read.uri,
                mime_type: entry.definition.mime_type,
                text,
            }],
        })
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>, what: &str) -> McpResult<T> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams(format!("{what} params required")))
}

fn to_result(value: impl serde::Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}
