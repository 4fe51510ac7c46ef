//! End-to-end API integration tests
//!
//! These tests drive the full router over in-memory storage:
//! - Agent registration, listing, update and deletion
//! - Error bodies for missing agents and malformed requests
//! - Execution submission and polling to a terminal status

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use agent_pipeline::api::{build_router, AppState};
use agent_pipeline::config::Settings;
use serde_json::{json, Value};
use std::time::Duration;
use tower::util::ServiceExt; // for oneshot

/// Setup test application over in-memory repositories
fn setup_app() -> Router {
    build_router(AppState::in_memory(&Settings::default()))
}

/// Sends a request and returns the status with the body parsed as JSON
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}

async fn create_agent(app: &Router, name: &str, agent_type: &str, config: Value) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/agents",
        Some(json!({ "name": name, "agent_type": agent_type, "config": config })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", json);
    json
}

async fn wait_terminal(app: &Router, agent_id: &str, execution_id: &str) -> Value {
    let uri = format!("/api/agents/{}/executions/{}", agent_id, execution_id);
    for _ in 0..200 {
        let (status, json) = send(app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        if json["status"] == "completed" || json["status"] == "failed" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("execution {} never finished", execution_id);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");

    let (status, json) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_register_and_list_agents() {
    let app = setup_app();

    let (status, json) = send(&app, "GET", "/api/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));

    let agent = create_agent(&app, "Flight Specialist", "a2a", json!({})).await;
    assert!(agent["agent_id"].is_string());
    assert_eq!(agent["name"], "Flight Specialist");
    assert_eq!(agent["agent_type"], "a2a");
    assert_eq!(agent["config"], json!({}));
    assert_eq!(agent["status"], "created");
    assert_eq!(agent["created_at"], agent["updated_at"]);

    let (status, json) = send(&app, "GET", "/api/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([agent.clone()]));

    let uri = format!("/api/agents/{}", agent["agent_id"].as_str().unwrap());
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, agent);
}

#[tokio::test]
async fn test_config_keeps_key_order() {
    let app = setup_app();
    let config = json!({ "zeta": 1, "alpha": { "nested": [1, 2] }, "mid": "x" });

    let agent = create_agent(&app, "Ordered", "custom_agent_type", config).await;

    let keys: Vec<&str> = agent["config"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_register_rejects_bad_requests() {
    let app = setup_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/agents",
        Some(json!({ "name": "   ", "agent_type": "adk", "config": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("name"));

    let (status, json) = send(
        &app,
        "POST",
        "/api/agents",
        Some(json!({ "name": "Typo", "agent_type": "not_a_type" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/agents",
        Some(json!({ "name": "Listy", "agent_type": "adk", "config": [1, 2] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, json) = send(&app, "GET", "/api/agents", None).await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_missing_agent_is_404_with_detail() {
    let app = setup_app();
    let id = uuid::Uuid::new_v4();

    let (status, json) = send(&app, "GET", &format!("/api/agents/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], format!("Agent not found: {}", id));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/agents/{}", id),
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/agents/{}/execute", id),
        Some(json!({ "parameters": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(&app, "GET", "/api/agents/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_update_name_only_keeps_config() {
    let app = setup_app();
    let agent = create_agent(&app, "Planner", "adk", json!({ "model": "small" })).await;
    let uri = format!("/api/agents/{}", agent["agent_id"].as_str().unwrap());

    tokio::time::sleep(Duration::from_millis(5)).await;
    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "name": "Trip Planner" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["agent_id"], agent["agent_id"]);
    assert_eq!(updated["name"], "Trip Planner");
    assert_eq!(updated["config"], agent["config"]);
    assert_eq!(updated["status"], "updated");
    assert_ne!(updated["updated_at"], agent["updated_at"]);
    assert_eq!(updated["created_at"], agent["created_at"]);
}

#[tokio::test]
async fn test_invalid_config_update_changes_nothing() {
    let app = setup_app();
    let agent = create_agent(&app, "Planner", "adk", json!({ "model": "small" })).await;
    let uri = format!("/api/agents/{}", agent["agent_id"].as_str().unwrap());

    let (status, json) = send(&app, "PUT", &uri, Some(json!({ "config": "not an object" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());

    let (status, json) = send(&app, "PUT", &uri, Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());

    let (_, current) = send(&app, "GET", &uri, None).await;
    assert_eq!(current, agent);
}

#[tokio::test]
async fn test_execute_and_poll_to_completion() {
    let app = setup_app();
    let agent = create_agent(&app, "Currency Agent", "adk", json!({ "base": "USD" })).await;
    let agent_id = agent["agent_id"].as_str().unwrap();

    let (status, execution) = send(
        &app,
        "POST",
        &format!("/api/agents/{}/execute", agent_id),
        Some(json!({ "parameters": { "amount": 10 } })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(execution["status"], "running");
    assert_eq!(execution["agent_id"], agent["agent_id"]);

    let finished = wait_terminal(&app, agent_id, execution["execution_id"].as_str().unwrap()).await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["result"]["status"], "success");
    assert_eq!(finished["result"]["params"], json!({ "amount": 10 }));
    assert_eq!(finished["result"]["config"], json!({ "base": "USD" }));
    assert!(finished["error"].is_null());
    assert!(finished["completed_at"].is_string());

    let (status, history) = send(&app, "GET", &format!("/api/agents/{}/executions", agent_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_execute_misconfigured_agent_fails_immediately() {
    let app = setup_app();
    let agent = create_agent(&app, "Flight Specialist", "a2a", json!({})).await;

    let (status, execution) = send(
        &app,
        "POST",
        &format!("/api/agents/{}/execute", agent["agent_id"].as_str().unwrap()),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(execution["status"], "failed");
    assert!(execution["error"].as_str().unwrap().contains("url"));
    assert!(execution["result"].is_null());
}

#[tokio::test]
async fn test_delete_agent_removes_history() {
    let app = setup_app();
    let agent = create_agent(&app, "Short Lived", "mcp", json!({})).await;
    let uri = format!("/api/agents/{}", agent["agent_id"].as_str().unwrap());

    send(&app, "POST", &format!("{}/execute", uri), Some(json!({}))).await;

    let (status, deleted) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["agent_id"], agent["agent_id"]);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("{}/executions", uri), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
