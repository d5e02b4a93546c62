//! Gameplay surface: the tick command and the balance rules dump.

use axum::extract::{Query, State};
use axum::Json;
use imperium_gameplay::TickDelta;
use serde_json::Value;

use super::{parse_now, NowQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// Advance the simulation. `now` defaults to the server clock; passing it
/// explicitly makes the tick reproducible.
pub async fn cmd_tick(
    State(state): State<AppState>,
    Query(query): Query<NowQuery>,
) -> Result<Json<TickDelta>, ApiError> {
    let now = match query.now.as_deref() {
        Some(raw) => parse_now(raw)?,
        None => state.clock.now(),
    };
    let delta = state.gameplay.lock().tick(now)?;
    Ok(Json(delta))
}

pub async fn rules(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rules = serde_json::to_value(state.gameplay.lock().rules())
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(rules))
}
