//! Status, history and forecast API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::warn;
use transit_pulse_core::{Forecast, LineId, StatusSnapshot, StoredEvent};

use super::{api_error, ApiError};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 200;
const MAX_HISTORY_LIMIT: i64 = 1000;

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub horizon_minutes: Option<u32>,
}

/// Normalize and validate a caller-supplied line.
fn parse_line(raw: Option<&str>) -> Result<LineId, ApiError> {
    LineId::parse(raw.unwrap_or_default()).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

fn clamp_limit(limit: Option<i64>) -> u32 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT) as u32
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/status
///
/// The cached per-line snapshot; `[]` when nothing fresh is cached.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StatusSnapshot>>, ApiError> {
    state
        .pulse()
        .get_status_snapshot()
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Status read failed: {}", e);
            api_error(StatusCode::SERVICE_UNAVAILABLE, e)
        })
}

/// GET /api/v1/history?line=L&limit=200
///
/// Recorded events for one line, most recent first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<StoredEvent>>, ApiError> {
    let line = parse_line(params.line.as_deref())?;
    let limit = clamp_limit(params.limit);

    state
        .pulse()
        .get_history(&line, limit)
        .map(Json)
        .map_err(|e| {
            warn!("History read for {} failed: {}", line, e);
            api_error(StatusCode::SERVICE_UNAVAILABLE, e)
        })
}

/// GET /api/v1/forecast?line=L&horizon_minutes=15
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastParams>,
) -> Result<Json<Forecast>, ApiError> {
    let line = parse_line(params.line.as_deref())?;

    state
        .pulse()
        .forecast(&line, params.horizon_minutes)
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Forecast for {} failed: {}", line, e);
            api_error(StatusCode::SERVICE_UNAVAILABLE, e)
        })
}
