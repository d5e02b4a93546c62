//! World facade: snapshots, single villages, raw build commands.

use axum::extract::{Path, State};
use axum::Json;
use imperium_types::{BuildCmd, Village, VillageId};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn snapshot(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let villages = state.world.snapshot()?;
    Ok(Json(json!({ "villages": villages })))
}

pub async fn village(
    State(state): State<AppState>,
    Path(id): Path<VillageId>,
) -> Result<Json<Village>, ApiError> {
    state
        .world
        .village(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("village {id} not found")))
}

/// Append a raw build command to the village queue. The store refuses
/// unknown villages, empty building names, and zero target levels.
pub async fn cmd_build(
    State(state): State<AppState>,
    Json(cmd): Json<BuildCmd>,
) -> Result<Json<Value>, ApiError> {
    if !state.world.queue_build(&cmd)? {
        return Err(ApiError::unprocessable("build command refused"));
    }
    Ok(Json(json!({ "accepted": true })))
}
