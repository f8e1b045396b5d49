//! Router tests.

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use thinking_core::{EchoTool, ToolRegistry};
use thinking_orchestration::{ExecutorOptions, MockToolExecutor, Orchestrator, WorkflowRegistry};
use tower::ServiceExt;

fn test_state() -> (Arc<AppState>, Arc<MockToolExecutor>) {
    let mock = Arc::new(MockToolExecutor::new());
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(WorkflowRegistry::new())));
    orchestrator.set_tool_executor(mock.clone(), ExecutorOptions::default());

    let tools = Arc::new(ToolRegistry::new());
    tools.register(Arc::new(EchoTool::new())).unwrap();
    (Arc::new(AppState::new(orchestrator, tools)), mock)
}

fn wf1() -> Value {
    json!({
        "id": "wf-1",
        "name": "Think",
        "type": "sequential",
        "steps": [
            {"id": "s1", "tool": "think", "input": {"content": "$problem"}, "store_as": "analysis"}
        ]
    })
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_workflow_created() {
    let (state, _) = test_state();
    let response = send(create_router(state.clone()), "POST", "/workflows", Some(wf1())).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await, json!({"success": true}));
    assert!(state.orchestrator.registry().contains("wf-1"));
}

#[tokio::test]
async fn test_register_duplicate_conflict() {
    let (state, _) = test_state();
    send(create_router(state.clone()), "POST", "/workflows", Some(wf1())).await;
    let response = send(create_router(state.clone()), "POST", "/workflows", Some(wf1())).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("wf-1"));
    assert_eq!(state.orchestrator.list_workflows().count, 1);
}

#[tokio::test]
async fn test_register_invalid_workflow() {
    let (state, _) = test_state();
    let cyclic = json!({
        "id": "loop",
        "name": "Loop",
        "type": "parallel",
        "steps": [
            {"id": "a", "tool": "t", "depends_on": ["b"]},
            {"id": "b", "tool": "t", "depends_on": ["a"]}
        ]
    });
    let response = send(create_router(state), "POST", "/workflows", Some(cyclic)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("cycle"));
}

#[tokio::test]
async fn test_register_malformed_body() {
    let (state, _) = test_state();
    let request = Request::builder()
        .method("POST")
        .uri("/workflows")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = create_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn test_list_and_get_workflows() {
    let (state, _) = test_state();
    send(create_router(state.clone()), "POST", "/workflows", Some(wf1())).await;

    let response = send(create_router(state.clone()), "GET", "/workflows", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["workflows"][0]["id"], "wf-1");
    assert_eq!(body["workflows"][0]["type"], "sequential");
    assert_eq!(body["workflows"][0]["step_count"], 1);

    let response = send(create_router(state.clone()), "GET", "/workflows/wf-1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["steps"][0]["store_as"], "analysis");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_get_unknown_workflow() {
    let (state, _) = test_state();
    let response = send(create_router(state), "GET", "/workflows/ghost", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json_body(response).await["error"]
        .as_str()
        .unwrap()
        .contains("ghost"));
}

#[tokio::test]
async fn test_execute_workflow() {
    let (state, mock) = test_state();
    mock.set_response("think", json!({"thought": "ok"})).await;
    send(create_router(state.clone()), "POST", "/workflows", Some(wf1())).await;

    let response = send(
        create_router(state),
        "POST",
        "/workflows/wf-1/execute",
        Some(json!({"input": {"problem": "X"}})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["step_results"]["s1"]["status"], "success");
    assert_eq!(body["final_output"], json!({"thought": "ok"}));
    assert_eq!(mock.call_count("think").await, 1);
}

#[tokio::test]
async fn test_execute_unknown_workflow_is_failed_result() {
    let (state, mock) = test_state();
    let response = send(create_router(state), "POST", "/workflows/ghost/execute", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "failed");
    assert!(body["step_results"].as_object().unwrap().is_empty());
    assert!(mock.calls().await.is_empty());
}

#[tokio::test]
async fn test_execute_rejects_malformed_body() {
    let (state, _) = test_state();
    send(create_router(state.clone()), "POST", "/workflows", Some(wf1())).await;

    let response = send(
        create_router(state),
        "POST",
        "/workflows/wf-1/execute",
        Some(json!({"input": "not an object"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tools() {
    let (state, _) = test_state();
    let response = send(create_router(state), "GET", "/tools", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["tools"][0]["id"], "echo");
}

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let response = send(create_router(state), "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tools"], 1);
    assert_eq!(body["workflows"], 0);
}

#[tokio::test]
async fn test_health_degraded_without_executor() {
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(WorkflowRegistry::new())));
    let state = Arc::new(AppState::new(orchestrator, Arc::new(ToolRegistry::new())));
    let response = send(create_router(state), "GET", "/health", None).await;

    assert_eq!(json_body(response).await["status"], "degraded");
}
