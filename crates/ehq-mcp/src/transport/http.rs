//! HTTP transport: one envelope per `POST /mcp`, plus `/health`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::protocol::ProtocolHandler;
use crate::types::McpResult;

use super::shutdown::Shutdown;

/// HTTP transport for web-based MCP clients.
pub struct HttpTransport {
    handler: Arc<ProtocolHandler>,
}

impl HttpTransport {
    pub fn new(handler: Arc<ProtocolHandler>) -> Self {
        Self { handler }
    }

    /// Routes for `POST /mcp` and `GET /health`.
    ///
    /// Protocol errors are returned inside the envelope with status 200.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/mcp", post(handle_request))
            .route("/health", get(handle_health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(self.handler.clone())
    }

    /// Serve on `addr` until shutdown.
    pub async fn run(&self, addr: &str, shutdown: Shutdown) -> McpResult<()> {
        serve_router(self.router(), addr, shutdown).await
    }
}

/// Bind `addr` and serve `router` with graceful shutdown.
pub async fn serve_router(router: Router, addr: &str, shutdown: Shutdown) -> McpResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(crate::types::McpError::Io)?;

    tracing::info!("HTTP transport listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.triggered())
        .await
        .map_err(|e| crate::types::McpError::Transport(e.to_string()))?;

    tracing::info!("HTTP transport on {addr} stopped");
    Ok(())
}

async fn handle_request(State(handler): State<Arc<ProtocolHandler>>, body: Bytes) -> Response {
    let response = handler.handle_bytes(&body).await;
    ([(header::CONTENT_TYPE, "application/json")], response).into_response()
}

async fn handle_health() -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({ "status": "healthy" }))
}
