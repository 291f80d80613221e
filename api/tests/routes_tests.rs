//! HTTP route tests
//!
//! Requests go through the full router with a scripted provider behind the
//! service.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use planforge_api::{router, ApiState};
use planforge_core::llm::adapters::{ScriptedProvider, ScriptedReply};
use planforge_core::AiService;

fn app(replies: Vec<ScriptedReply>) -> Router {
    let service =
        AiService::new(ScriptedProvider::new(replies), "gpt-4o", "gpt-4o-mini").unwrap();
    router(Arc::new(ApiState::new(service)))
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let response = app(Vec::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "healthy", "service": "planforge-api"}));
}

#[tokio::test]
async fn test_validate_assumptions_route() {
    let answer = json!({
        "isValid": true,
        "feedback": [],
        "suggestions": ["Estimate the number of schools in the first region"]
    });
    let body = json!({"assumptions": {"marketAssumptions": {"targetAudience": "students"}}});

    let (status, response) = post(
        app(vec![ScriptedReply::json(&answer)]),
        "/api/ai/assumptions/validate",
        &body.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, answer);
}

#[tokio::test]
async fn test_functional_blocks_fallback_is_ok() {
    let body = json!({"project": {"id": "p1", "name": "Homework Helper"}});

    let (status, response) = post(
        app(vec![ScriptedReply::Content("not json".to_string())]),
        "/api/ai/functional-blocks",
        &body.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["blocks"][0]["name"], "Core Functionality");
    assert_eq!(response["blocks"][0]["order"], 1);
}

#[tokio::test]
async fn test_suggestions_route() {
    let answer = json!({"suggestions": [{
        "id": "s1",
        "type": "feature",
        "content": "Offline mode",
        "reason": "Students study on the bus"
    }]});
    let body = json!({"project": {"id": "p1", "name": "Homework Helper"}, "focusArea": "mobile"});

    let (status, response) = post(
        app(vec![ScriptedReply::json(&answer)]),
        "/api/ai/suggestions",
        &body.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, answer);
}

#[tokio::test]
async fn test_schedule_empty_blocks_is_bad_request() {
    let body = json!({"project": {"id": "p1", "name": "Homework Helper"}, "blocks": []});

    let (status, response) = post(
        app(vec![ScriptedReply::Empty]),
        "/api/ai/schedule",
        &body.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "INVALID_INPUT");
    assert_eq!(response["error"]["details"]["field"], "blocks");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, response) = post(app(Vec::new()), "/api/ai/chat", "{\"messages\": [").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "INVALID_INPUT");
    assert!(response["error"]["message"].is_string());
}

#[tokio::test]
async fn test_chat_route_returns_tool_calls() {
    let reply = ScriptedReply::ToolCalls {
        content: Some("Adding it now.".to_string()),
        calls: vec![planforge_core::llm::adapters::RawToolCall {
            id: "call_1".to_string(),
            name: "add_task".to_string(),
            arguments: r#"{"title":"Write onboarding guide"}"#.to_string(),
        }],
    };
    let body = json!({
        "messages": [{"role": "user", "content": "Add a task for the onboarding guide"}],
        "tools": [{"name": "add_task", "description": "Add a task"}]
    });

    let (status, response) = post(app(vec![reply]), "/api/ai/chat", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Adding it now.");
    assert_eq!(response["toolCalls"][0]["name"], "add_task");
    assert_eq!(
        response["toolCalls"][0]["arguments"],
        json!({"title": "Write onboarding guide"})
    );
}
