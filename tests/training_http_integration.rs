//! Integration tests for the training HTTP API.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt), so no TCP binding
//! is needed. The router runs over the built-in scenario catalog with the
//! offline capabilities.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use roleplay_trainer::adapters::capabilities::{
    HeuristicScorer, KeywordGoalClassifier, ScriptedCounterpart,
};
use roleplay_trainer::adapters::http::app_router;
use roleplay_trainer::adapters::scenarios::InMemoryScenarioCatalog;
use roleplay_trainer::application::{Capabilities, EngineSettings, SessionRegistry};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app() -> Router {
    let capabilities = Capabilities {
        counterpart: Arc::new(ScriptedCounterpart::new().with_narrative("Good call overall.")),
        scorer: Arc::new(HeuristicScorer::new()),
        goal_classifier: Arc::new(KeywordGoalClassifier),
    };
    let registry = Arc::new(SessionRegistry::new(
        Arc::new(InMemoryScenarioCatalog::builtin()),
        capabilities,
        EngineSettings::default(),
    ));
    app_router(registry, Duration::from_secs(10))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn start_session(app: &Router, scenario_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/sessions",
        Some(json!({ "scenario_id": scenario_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["session_id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health and catalog
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_builtin_scenarios() {
    let (status, body) = send(&app(), Method::GET, "/api/scenarios", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    let ids: Vec<&str> = body["scenarios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["scenario_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"ltc-standard-sales"));
    assert!(ids.contains(&"service-de-escalation"));
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn start_returns_opening_snapshot() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({ "scenario_id": "ltc-standard-sales" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "active");
    assert_eq!(body["turns"].as_array().unwrap().len(), 2);
    assert_eq!(body["turns"][0]["sender"], "system");
    assert_eq!(body["turns"][1]["sender"], "counterpart");
    assert_eq!(body["goals"].as_array().unwrap().len(), 4);
    assert!(body.get("report").is_none());
}

#[tokio::test]
async fn full_session_round_trip() {
    let app = app();
    let id = start_session(&app, "ltc-standard-sales").await;

    let (status, turns) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/turns"),
        Some(json!({ "text": "I understand the budget is tight. Could we compare the total cost?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turns["trainee"]["sender"], "trainee");
    assert_eq!(turns["counterpart"]["sender"], "counterpart");
    assert!(turns["counterpart"]["feedback"].is_object());

    let (status, snapshot) = send(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["turns"].as_array().unwrap().len(), 4);

    let (status, report) = send(&app, Method::POST, &format!("/api/sessions/{id}/end"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["session_id"], id.as_str());
    assert_eq!(report["trainee_turns"], 1);
    assert_eq!(report["narrative_feedback"], "Good call overall.");

    let (_, again) = send(&app, Method::POST, &format!("/api/sessions/{id}/end"), None).await;
    assert_eq!(again, report);

    let (_, snapshot) = send(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(snapshot["status"], "ended");
    assert_eq!(snapshot["report"], report);
}

#[tokio::test]
async fn reset_restarts_the_scenario() {
    let app = app();
    let id = start_session(&app, "contract-renewal").await;
    send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/turns"),
        Some(json!({ "text": "Thanks for meeting with me today." })),
    )
    .await;

    let (status, body) = send(&app, Method::POST, &format!("/api/sessions/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], id.as_str());
    assert_eq!(body["turns"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_discards_the_session() {
    let app = app();
    let id = start_session(&app, "ltc-standard-sales").await;
    let uri = format!("/api/sessions/{id}");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn unknown_scenario_is_404() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/sessions",
        Some(json!({ "scenario_id": "no-such-scenario" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SCENARIO_NOT_FOUND");
}

#[tokio::test]
async fn unknown_session_is_404() {
    let uri = format!("/api/sessions/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app(), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn malformed_session_id_is_400() {
    let (status, body) = send(&app(), Method::GET, "/api/sessions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn blank_turn_is_400() {
    let app = app();
    let id = start_session(&app, "ltc-standard-sales").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/turns"),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_INPUT");
}

#[tokio::test]
async fn turn_after_end_is_409() {
    let app = app();
    let id = start_session(&app, "ltc-standard-sales").await;
    send(&app, Method::POST, &format!("/api/sessions/{id}/end"), None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/turns"),
        Some(json!({ "text": "One more thing" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}
