use crate::ByteccError;
use crate::outbox::{OutboxItem, OutboxStatus, Verdict};
use crate::server::router::ByteccState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    fn status(self) -> Option<OutboxStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(OutboxStatus::Pending),
            StatusFilter::Approved => Some(OutboxStatus::Approved),
            StatusFilter::Rejected => Some(OutboxStatus::Rejected),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutboxQuery {
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Serialize)]
pub struct OutboxListing {
    pub items: Vec<OutboxItem>,
    /// Pending items regardless of the filter.
    pub pending: usize,
}

/// GET /api/outbox?status=all|pending|approved|rejected
pub async fn list_outbox(
    State(state): State<ByteccState>,
    Query(query): Query<OutboxQuery>,
) -> Json<OutboxListing> {
    Json(OutboxListing {
        items: state.outbox.list(query.status.status()),
        pending: state.outbox.pending_count(),
    })
}

/// POST /api/outbox/{id}/approve
pub async fn approve_item(
    State(state): State<ByteccState>,
    Path(id): Path<u32>,
) -> Result<Json<OutboxItem>, ByteccError> {
    Ok(Json(state.outbox.decide(id, Verdict::Approve)?))
}

/// POST /api/outbox/{id}/reject
pub async fn reject_item(
    State(state): State<ByteccState>,
    Path(id): Path<u32>,
) -> Result<Json<OutboxItem>, ByteccError> {
    Ok(Json(state.outbox.decide(id, Verdict::Reject)?))
}

pub fn router() -> Router<ByteccState> {
    Router::new()
        .route("/api/outbox", get(list_outbox))
        .route("/api/outbox/{id}/approve", post(approve_item))
        .route("/api/outbox/{id}/reject", post(reject_item))
}
