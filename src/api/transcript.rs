//! Read-only view of the conversation transcript

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::{ApiError, ApiState};
use crate::transcript::Turn;

/// Build transcript router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/transcript", get(transcript))
        .with_state(state)
}

/// Current transcript, or the seeded persona turn if nothing is stored yet
async fn transcript(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Turn>>, ApiError> {
    let turns = state.orchestrator.store().load().await?;
    Ok(Json(turns))
}
