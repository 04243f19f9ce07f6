use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use shared::{AdvisorRequest, AdvisorResponse, ProjectFile, ProjectSnapshot};

use crate::ai::{self, AdvisorError};
use crate::AppState;

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Advisor chat about a posted project snapshot
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<AdvisorRequest>,
) -> Result<Json<AdvisorResponse>, StatusCode> {
    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, blocks = request.snapshot.blocks.len(), "advisor question");

    let response = ai::process_chat(&state, &request).await.map_err(|e| {
        tracing::error!(%request_id, "advisor failed: {e}");
        match e {
            AdvisorError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    })?;
    Ok(Json(response))
}

/// Project file -> snapshot with colors rederived and metrics recomputed
pub async fn metrics(Json(project): Json<ProjectFile>) -> Json<ProjectSnapshot> {
    Json(ProjectSnapshot::evaluate(project))
}
