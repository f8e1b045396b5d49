//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::{monitoring, tools};
use crate::state::AppState;
use crate::workflow::routes as workflow_routes;

/// Create the main router.
///
/// ```text
/// POST   /workflows              - Register workflow
/// GET    /workflows              - List workflows
/// GET    /workflows/{id}         - Get workflow definition
/// POST   /workflows/{id}/execute - Execute workflow
/// GET    /tools                  - Registered tool definitions
/// GET    /health                 - Health check
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/workflows",
            post(workflow_routes::register_workflow).get(workflow_routes::list_workflows),
        )
        .route("/workflows/{id}", get(workflow_routes::get_workflow))
        .route(
            "/workflows/{id}/execute",
            post(workflow_routes::execute_workflow),
        )
        .route("/tools", get(tools::list_tools))
        .route("/health", get(monitoring::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
