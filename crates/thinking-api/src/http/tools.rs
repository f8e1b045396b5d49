//! Tool catalogue endpoint.

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use thinking_protocols::ToolDefinition;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub count: usize,
    pub tools: Vec<ToolDefinition>,
}

/// GET /tools
pub async fn list_tools(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools = state.tools.list();
    Json(ToolListResponse {
        count: tools.len(),
        tools,
    })
}
