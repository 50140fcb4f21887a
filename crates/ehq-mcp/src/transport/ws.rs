//! WebSocket transport: `GET /ws`, one envelope per frame.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::protocol::ProtocolHandler;
use crate::types::McpResult;

use super::http::serve_router;
use super::shutdown::{ConnectionGuard, ConnectionTracker, Shutdown};

#[derive(Clone)]
struct WsState {
    handler: Arc<ProtocolHandler>,
    shutdown: Shutdown,
    guard: ConnectionGuard,
}

/// WebSocket transport. Every connection runs on its own task and handles
/// its messages one at a time.
pub struct WsTransport {
    handler: Arc<ProtocolHandler>,
}

impl WsTransport {
    pub fn new(handler: Arc<ProtocolHandler>) -> Self {
        Self { handler }
    }

    /// Route for `GET /ws`. Open connections hold a guard from `tracker`
    /// until they close.
    pub fn router(&self, shutdown: Shutdown, tracker: &ConnectionTracker) -> Router {
        Router::new().route("/ws", get(handle_upgrade)).with_state(WsState {
            handler: self.handler.clone(),
            shutdown,
            guard: tracker.guard(),
        })
    }

    /// Serve on `addr` until shutdown, then wait for open connections to close.
    pub async fn run(&self, addr: &str, shutdown: Shutdown) -> McpResult<()> {
        let tracker = ConnectionTracker::new();
        let router = self.router(shutdown.clone(), &tracker);
        serve_router(router, addr, shutdown).await?;
        tracker.wait().await;
        Ok(())
    }
}

async fn handle_upgrade(ws: WebSocketUpgrade, State(state): State<WsState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: WsState) {
    let WsState {
        handler,
        mut shutdown,
        guard: _guard,
    } = state;

    tracing::info!("WebSocket client connected");

    loop {
        let message = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            message = socket.recv() => message,
        };

        let raw = match message {
            Some(Ok(Message::Text(text))) => text.into_bytes(),
            Some(Ok(Message::Binary(data))) => data,
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(Message::Close(_))) | None => break,
            Some(Err(e)) => {
                tracing::warn!("WebSocket read failed: {e}");
                break;
            }
        };

        let response = handler.handle_bytes(&raw).await;
        let text = String::from_utf8_lossy(&response).into_owned();

        if let Err(e) = socket.send(Message::Text(text)).await {
            tracing::warn!("WebSocket write failed: {e}");
            break;
        }
    }

    tracing::info!("WebSocket client disconnected");
}
