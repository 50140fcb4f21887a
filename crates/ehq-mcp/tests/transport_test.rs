//! Transport bindings driven end to end: stdio, HTTP and WebSocket.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use ehq_mcp::config::UpstreamConfig;
use ehq_mcp::transport::{shutdown_channel, Shutdown, StdioTransport};
use ehq_mcp::ProtocolHandler;

// ─────────────────────── helpers ───────────────────────

fn handler() -> Arc<ProtocolHandler> {
    let upstream = UpstreamConfig::new("http://127.0.0.1:9", None, None);
    Arc::new(ehq_mcp::build_handler(&upstream))
}

fn lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON envelope"))
        .collect()
}

// ─────────────────────── stdio ───────────────────────

#[tokio::test]
async fn test_stdio_answers_each_line_in_order() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "\n",
        "\n",
        "   \r\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"message":"a"}}}"#,
        "\r\n",
        "{oops\n",
        r#"{"jsonrpc":"2.0","id":"last","method":"resources/list"}"#,
        "\n",
    );

    let mut output = Vec::new();
    StdioTransport::new(handler())
        .serve(input.as_bytes(), &mut output, Shutdown::never())
        .await
        .unwrap();

    let responses = lines(&output);
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["id"], 1);
    assert!(responses[0]["result"]["tools"].is_array());
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["content"][0]["text"], "Echo: a");
    assert_eq!(responses[2]["error"]["code"], -32700);
    assert!(responses[2]["id"].is_null());
    assert_eq!(responses[3]["id"], "last");
    assert!(output.ends_with(b"\n"));
}

#[tokio::test]
async fn test_stdio_stops_at_eof_without_output() {
    let mut output = Vec::new();
    StdioTransport::new(handler())
        .serve(&b""[..], &mut output, Shutdown::never())
        .await
        .unwrap();
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_stdio_stops_on_shutdown_between_exchanges() {
    let reader = tokio_test::io::Builder::new()
        .read(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"resources/list\"}\n")
        .wait(Duration::from_secs(30))
        .build();

    let (trigger, shutdown) = shutdown_channel();
    let transport = StdioTransport::new(handler());
    let task = tokio::spawn(async move {
        let mut output = Vec::new();
        transport
            .serve(tokio::io::BufReader::new(reader), &mut output, shutdown)
            .await
            .map(|_| output)
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    trigger.trigger();

    let output = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("stdio loop stopped")
        .unwrap()
        .unwrap();
    let responses = lines(&output);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 1);
}

// ─────────────────────── HTTP ───────────────────────

#[cfg(feature = "http")]
mod http {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use ehq_mcp::transport::{ConnectionTracker, HttpTransport, WsTransport};

    async fn post_mcp(body: &str) -> (StatusCode, Option<String>, Value) {
        let router = HttpTransport::new(handler()).router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_post_mcp_round_trip() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 11,
            "method": "resources/read",
            "params": { "uri": "hello://world" }
        });
        let (status, content_type, body) = post_mcp(&request.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body["id"], 11);
        assert_eq!(
            body["result"]["contents"][0]["text"],
            "Hello, World! This is a sample resource from the MCP server."
        );
    }

    #[tokio::test]
    async fn test_protocol_errors_still_return_200() {
        let (status, _, body) = post_mcp("{broken").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32700);

        let (status, _, body) = post_mcp(r#"{"jsonrpc":"2.0","id":1,"method":"nope"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_health() {
        let router = HttpTransport::new(handler()).router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_get_mcp_not_allowed() {
        let router = HttpTransport::new(handler()).router();
        let response = router
            .oneshot(Request::builder().uri("/mcp").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_merged_router_serves_both_routes() {
        let h = handler();
        let tracker = ConnectionTracker::new();
        let router = HttpTransport::new(h.clone())
            .router()
            .merge(WsTransport::new(h).router(Shutdown::never(), &tracker));

        let health = router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        // Not an upgrade request, but the route exists.
        let ws = router
            .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_ne!(ws.status(), StatusCode::NOT_FOUND);
    }
}

// ─────────────────────── WebSocket ───────────────────────

#[cfg(feature = "http")]
mod websocket {
    use super::*;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    use ehq_mcp::transport::{ConnectionTracker, WsTransport};

    /// Serve the WebSocket route on an ephemeral port.
    async fn start(shutdown: Shutdown) -> (String, ConnectionTracker) {
        let tracker = ConnectionTracker::new();
        let router = WsTransport::new(handler()).router(shutdown.clone(), &tracker);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.triggered())
                .await
                .unwrap();
        });

        (format!("ws://{addr}/ws"), tracker)
    }

    async fn next_json<S>(stream: &mut S) -> Value
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_one_reply_per_frame() {
        let (url, _tracker) = start(Shutdown::never()).await;
        let (mut socket, _) = tokio_tungstenite::connect_async(url).await.unwrap();

        for i in 0..3 {
            let request = json!({
                "jsonrpc": "2.0",
                "id": i,
                "method": "tools/call",
                "params": { "name": "echo", "arguments": { "message": format!("m{i}") } }
            });
            socket.send(Message::Text(request.to_string())).await.unwrap();

            let reply = next_json(&mut socket).await;
            assert_eq!(reply["id"], i);
            assert_eq!(reply["result"]["content"][0]["text"], format!("Echo: m{i}"));
        }

        socket
            .send(Message::Binary(b"{bad".to_vec()))
            .await
            .unwrap();
        let reply = next_json(&mut socket).await;
        assert_eq!(reply["error"]["code"], -32700);

        socket.close(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_connections_are_independent() {
        let (url, _tracker) = start(Shutdown::never()).await;
        let (mut first, _) = tokio_tungstenite::connect_async(url.clone()).await.unwrap();
        let (mut second, _) = tokio_tungstenite::connect_async(url).await.unwrap();

        second
            .send(Message::Text(r#"{"jsonrpc":"2.0","id":"b","method":"tools/list"}"#.into()))
            .await
            .unwrap();
        first
            .send(Message::Text(r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#.into()))
            .await
            .unwrap();

        assert_eq!(next_json(&mut first).await["id"], "a");
        assert_eq!(next_json(&mut second).await["id"], "b");
    }

    #[tokio::test]
    async fn test_shutdown_closes_connections() {
        let (trigger, shutdown) = shutdown_channel();
        let (url, tracker) = start(shutdown).await;
        let (mut socket, _) = tokio_tungstenite::connect_async(url).await.unwrap();

        socket
            .send(Message::Text(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#.into()))
            .await
            .unwrap();
        assert_eq!(next_json(&mut socket).await["id"], 1);

        trigger.trigger();

        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("server closed the socket");
        assert!(matches!(frame, Some(Ok(Message::Close(_))) | None));

        drop(socket);
        tokio::time::timeout(Duration::from_secs(5), tracker.wait())
            .await
            .expect("connection guards released");
    }
}
