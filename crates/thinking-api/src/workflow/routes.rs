//! Workflow HTTP route handlers.
//!
//! - POST   /workflows              - Register workflow
//! - GET    /workflows              - List workflows
//! - GET    /workflows/{id}         - Get workflow
//! - POST   /workflows/{id}/execute - Execute workflow

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use thinking_orchestration::{RegistrationResponse, Workflow, WorkflowError};
use thinking_protocols::ToolInput;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of an execute request. An empty body means empty input.
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub input: ToolInput,
}

/// Register a workflow.
///
/// POST /workflows
pub async fn register_workflow(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Workflow>, JsonRejection>,
) -> impl IntoResponse {
    let workflow = match payload {
        Ok(Json(workflow)) => workflow,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RegistrationResponse {
                    success: false,
                    error: Some(rejection.body_text()),
                }),
            );
        }
    };

    let id = workflow.id.clone();
    match state.orchestrator.register(workflow) {
        Ok(_) => (
            StatusCode::CREATED,
            Json(RegistrationResponse {
                success: true,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(workflow = %id, error = %e, "Workflow registration rejected");
            let status = match e {
                WorkflowError::DuplicateWorkflow(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            };
            (
                status,
                Json(RegistrationResponse {
                    success: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// List registered workflows.
///
/// GET /workflows
pub async fn list_workflows(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.orchestrator.list_workflows())
}

/// Get a workflow definition by id.
///
/// GET /workflows/{id}
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, ApiError> {
    let workflow = state.orchestrator.get_workflow(&id)?;
    Ok(Json(Workflow::clone(&workflow)))
}

/// Execute a workflow. Execution failures are reported in the result body,
/// so the status is 200 unless the request itself is malformed.
///
/// POST /workflows/{id}/execute
pub async fn execute_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ExecuteRequest::default()
    } else {
        serde_json::from_slice::<ExecuteRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid execute request: {}", e)))?
    };

    // Cancelled when this future is dropped, e.g. on client disconnect.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    info!(workflow = %id, "Executing workflow");
    let result = state
        .orchestrator
        .execute_workflow_with_cancel(&id, request.input, cancel)
        .await;
    Ok((StatusCode::OK, Json(result)))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
