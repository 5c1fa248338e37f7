use crate::monitor::AgentStatus;
use crate::server::router::ByteccState;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

/// GET /api/agents
pub async fn list_agents(State(state): State<ByteccState>) -> Json<Vec<AgentStatus>> {
    Json(state.monitor.snapshot())
}

/// POST /api/agents/{id}/run
pub async fn run_agent(
    State(state): State<ByteccState>,
    Path(id): Path<u32>,
) -> Result<Json<AgentStatus>, StatusCode> {
    state.monitor.run(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub fn router() -> Router<ByteccState> {
    Router::new()
        .route("/api/agents", get(list_agents))
        .route("/api/agents/{id}/run", post(run_agent))
}
