//! Ingest scheduler API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use transit_pulse_core::SchedulerStatus;

use crate::state::AppState;

/// GET /api/v1/scheduler
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    Json(state.scheduler().status())
}
