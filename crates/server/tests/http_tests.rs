use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sandbox_api::{ClientError, MockToolsClient};
use sandbox_engine::{Engine, EngineSettings};
use sandbox_server::{RunningSandboxServer, SandboxServer};
use serde_json::{Value, json};
use tempfile::TempDir;

struct Harness {
    server: RunningSandboxServer,
    client: MockToolsClient,
    logs: TempDir,
}

async fn start() -> Harness {
    let logs = TempDir::new().expect("log dir");
    let engine = Engine::with_builtin_catalog(EngineSettings {
        fixtures_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fixtures"),
        log_path: logs.path().to_path_buf(),
        scenario: "inbox_triage".into(),
    })
    .expect("engine");
    let address: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = SandboxServer::new(address, Arc::new(engine)).start().await.expect("server starts");
    let client = MockToolsClient::new(&server.base_url()).expect("client");
    client.wait_until_healthy(Duration::from_secs(5)).await.expect("healthy");
    Harness { server, client, logs }
}

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("json response")
}

#[tokio::test]
async fn health_and_directory_describe_the_catalog() {
    let harness = start().await;

    let health = harness.client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.scenario, "inbox_triage");
    assert_eq!(health.tools_available, 25);

    let directory = harness.client.list_tools().await.unwrap();
    assert_eq!(directory.count, 25);
    assert_eq!(directory.tools[0].name, "inbox.list");

    harness.server.stop().await.unwrap();
}

#[tokio::test]
async fn tool_calls_round_trip_through_http() {
    let harness = start().await;

    let found = parse(&harness.client.call_tool("email.read", &json!({ "message_id": "42" })).await);
    assert_eq!(found["found"], true);
    assert_eq!(found["email"]["subject"], "Hi");

    let missing = parse(&harness.client.call_tool("email.read", &json!({ "message_id": "99" })).await);
    assert_eq!(missing, json!({ "email": null, "found": false }));

    let created = parse(&harness.client.call_tool("calendar.create", &json!({ "title": "Standup" })).await);
    assert_eq!(created["status"], "created");
    assert_eq!(created["title"], "Standup");

    let calls = harness.client.tool_calls().await.unwrap();
    assert_eq!(calls.calls.len(), 3);
    assert_eq!(calls.calls[2].tool, "calendar.create");

    let raw = harness.client.tool_calls_raw().await.unwrap();
    assert_eq!(sandbox_types::count_by_tool(&raw)["email.read"], 2);

    let episode = harness.client.episode_result("inbox_triage", "Replied to Dana.", 4).await.unwrap();
    assert_eq!(episode.tool_calls_total, 4);
    assert_eq!(episode.tool_calls_raw.len(), 3);
    assert_eq!(episode.tool_calls_by_type["email.read"], 2);
    assert_eq!(episode.tool_calls_by_type["calendar.create"], 1);
    assert_eq!(episode.response, "Replied to Dana.");

    harness.server.stop().await.unwrap();
}

#[tokio::test]
async fn unknown_tool_is_404_listing_known_tools() {
    let harness = start().await;

    let body = parse(&harness.client.call_tool("fax.send", &json!({})).await);
    let known: Vec<&str> = body["known_tools"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert_eq!(known.len(), 25);
    assert!(known.contains(&"email.read"));
    assert!(body["detail"].as_str().unwrap().starts_with("Unknown tool: fax.send"));

    let requests = harness.client.all_requests().await.unwrap();
    assert_eq!(requests.summary.total, 1);
    assert_eq!(requests.summary.failed, 1);
    assert_eq!(requests.requests[0].status_code, 404);
    assert!(harness.client.tool_calls().await.unwrap().calls.is_empty());

    harness.server.stop().await.unwrap();
}

#[tokio::test]
async fn malformed_bodies_degrade_to_empty_arguments() {
    let harness = start().await;
    let http = reqwest::Client::new();
    let url = format!("{}/tools/email.draft", harness.server.base_url());

    let response = http.post(&url).body("definitely not json").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let draft: Value = response.json().await.unwrap();
    assert_eq!(draft["draft_id"], "draft_unknown");

    let empty = http.post(&url).send().await.unwrap();
    assert_eq!(empty.status().as_u16(), 200);

    let requests = harness.client.all_requests().await.unwrap();
    assert_eq!(requests.requests[0].request_body, Some(json!({ "_raw": "definitely not json" })));
    assert_eq!(requests.requests[1].request_body, None);
    assert_eq!(requests.summary.success, 2);

    let journal = std::fs::read_to_string(harness.logs.path().join("inbox_triage_all_requests.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 2);

    harness.server.stop().await.unwrap();
}

#[tokio::test]
async fn set_scenario_resets_logs_and_switches_fixtures() {
    let harness = start().await;

    let before = parse(&harness.client.call_tool("contacts.list", &json!({})).await);
    assert_eq!(before, json!({ "contacts": [] }));
    assert_eq!(harness.client.all_requests().await.unwrap().summary.total, 1);

    let switched = harness.client.set_scenario("client_escalation").await.unwrap();
    assert_eq!(switched.scenario, "client_escalation");
    assert!(harness.client.tool_calls().await.unwrap().calls.is_empty());
    assert_eq!(harness.client.all_requests().await.unwrap().summary.total, 0);
    assert_eq!(harness.client.health().await.unwrap().scenario, "client_escalation");

    let after = parse(&harness.client.call_tool("contacts.get", &json!({ "contact_id": "1" })).await);
    assert_eq!(after["found"], true);
    assert_eq!(after["contact"]["name"], "Dana Ruiz");

    harness.server.stop().await.unwrap();
}

#[tokio::test]
async fn malformed_fixture_is_500_and_bad_scenario_is_400() {
    let harness = start().await;
    harness.client.set_scenario("client_escalation").await.unwrap();

    let body = parse(&harness.client.call_tool("doc.list", &json!({})).await);
    assert!(body["detail"].as_str().unwrap().contains("documents.json"));
    assert_eq!(harness.client.all_requests().await.unwrap().requests[0].status_code, 500);

    let rejected = harness.client.set_scenario("a\\b").await;
    assert!(matches!(rejected, Err(ClientError::Status { status: 400, .. })));
    assert_eq!(harness.client.health().await.unwrap().scenario, "client_escalation");

    harness.server.stop().await.unwrap();
}
