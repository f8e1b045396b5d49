//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use thinking_orchestration::WorkflowError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::NotFound(_) => Self::NotFound(message),
            WorkflowError::DuplicateWorkflow(_) => Self::Conflict(message),
            WorkflowError::NotInitialized | WorkflowError::Load { .. } => Self::Internal(message),
            _ => Self::BadRequest(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({"error": self.to_string()})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_error_mapping() {
        let not_found = ApiError::from(WorkflowError::NotFound("x".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Workflow not found: x");

        let dup = ApiError::from(WorkflowError::DuplicateWorkflow("x".into()));
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let invalid = ApiError::from(WorkflowError::MissingField("name".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let cycle = ApiError::from(WorkflowError::Cycle {
            steps: vec!["a".into(), "b".into(), "a".into()],
        });
        assert_eq!(cycle.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Conflict("taken".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
