//! Line catalog API handlers.

use axum::Json;
use transit_pulse_core::lines::sorted_lines;

/// GET /api/v1/lines
///
/// Every tracked line, sorted for stable display.
pub async fn list_lines() -> Json<Vec<&'static str>> {
    Json(sorted_lines())
}
