//! Built-in tool behaviour, including the upstream-backed `get_projects`.

use chrono::{FixedOffset, TimeZone, Utc};
use serde_json::{json, Map, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ehq_mcp::catalog::ToolHandler;
use ehq_mcp::config::UpstreamConfig;
use ehq_mcp::tools::get_projects::GetProjects;
use ehq_mcp::tools::{get_time, hello_world, ToolRegistry};

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "attributes": { "token": "tok-123" } }
        })))
        .mount(server)
        .await;
}

fn tool_for(server: &MockServer) -> GetProjects {
    GetProjects::new(UpstreamConfig::new(&server.uri(), Some("admin"), Some("secret")))
}

// ─────────────────────── hello_world / get_time ───────────────────────

#[test]
fn test_greeting_format() {
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

    assert_eq!(
        hello_world::greeting(&args(json!({ "name": "Ada" })), &now),
        "Hello, Ada! 🌍\nWelcome to the EHQ MCP Server!\nCurrent time: 2024-03-09 14:05:07"
    );
    assert_eq!(
        hello_world::greeting(&args(json!({ "name": "" })), &now),
        "Hello, World! 🌍\nWelcome to the EHQ MCP Server!\nCurrent time: 2024-03-09 14:05:07"
    );
    assert!(hello_world::greeting(&Map::new(), &now).starts_with("Hello, World!"));
}

#[test]
fn test_time_formats() {
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 15, 4, 5).unwrap();

    assert_eq!(get_time::render("Unix", &now), format!("Unix timestamp: {}", now.timestamp()));
    assert_eq!(get_time::render("Kitchen", &now), "Time: 3:04PM");
    assert_eq!(get_time::render("RFC3339", &now), "Time: 2024-03-09T15:04:05Z");
    assert_eq!(get_time::render("bogus", &now), "Time: 2024-03-09T15:04:05Z");
}

#[test]
fn test_time_keeps_local_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = offset.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();

    assert_eq!(get_time::render("RFC3339", &now), "Time: 2024-01-02T09:30:00+02:00");
    assert_eq!(get_time::render("Kitchen", &now), "Time: 9:30AM");
}

#[test]
fn test_builtin_tool_names() {
    let upstream = UpstreamConfig::new("https://x", None, None);
    let mut names: Vec<String> = ToolRegistry::builtin(&upstream)
        .into_iter()
        .map(|(definition, _)| definition.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["echo", "get_projects", "get_time", "hello_world"]);
}

// ─────────────────────── get_projects ───────────────────────

#[tokio::test]
async fn test_get_projects_success() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/projects"))
        .and(header("authorization", "Bearer tok-123"))
        .and(query_param("filterable", "true"))
        .and(query_param("filters[search]", "park"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "type": "project", "id": "1", "attributes": { "name": "Park upgrade" } },
                { "type": "project", "id": "2", "attributes": { "name": "Parking review" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = tool_for(&server).call(args(json!({ "search": "park" }))).await;
    let body: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["attributes"]["name"], "Park upgrade");
    assert_eq!(body["data"][1]["type"], "project");
}

#[tokio::test]
async fn test_get_projects_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let text = tool_for(&server).call(Map::new()).await;
    let body: Value = serde_json::from_str(&text).unwrap();

    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Authentication failed: "), "{error}");
    assert!(error.contains("401"));
    assert!(body.get("success").is_none());
}

#[tokio::test]
async fn test_get_projects_listing_failure() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let text = tool_for(&server).call(Map::new()).await;
    let body: Value = serde_json::from_str(&text).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch projects: "));
}

#[tokio::test]
async fn test_get_projects_missing_credentials_skips_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tool = GetProjects::new(UpstreamConfig::new(&server.uri(), Some("admin"), None));
    let body: Value = serde_json::from_str(&tool.call(Map::new()).await).unwrap();
    assert_eq!(body["error"], "Upstream credentials are not configured");
}
