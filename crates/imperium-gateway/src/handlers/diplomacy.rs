//! AI diplomacy surface.

use axum::extract::{Query, State};
use axum::Json;
use imperium_diplomacy::{ProposalOutcome, TickReport};
use imperium_types::{FactionId, TreatyKind};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_now, NowQuery};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn tick(
    State(state): State<AppState>,
    Query(query): Query<NowQuery>,
) -> Result<Json<TickReport>, ApiError> {
    let now = match query.now.as_deref() {
        Some(raw) => parse_now(raw)?,
        None => state.clock.now(),
    };
    Ok(Json(state.evaluator.tick_update(now)?))
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub a: FactionId,
    pub b: FactionId,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    3
}

pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<Value>, ApiError> {
    let now = state.clock.now();
    let suggestions = state
        .proposer
        .top_suggestions(query.a, query.b, now, query.k)?;
    Ok(Json(json!({ "suggestions": suggestions })))
}

#[derive(Debug, Deserialize)]
pub struct ProposeBody {
    pub from: FactionId,
    pub to: FactionId,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_h: Option<i64>,
}

pub async fn propose(
    State(state): State<AppState>,
    Json(body): Json<ProposeBody>,
) -> Result<Json<ProposalOutcome>, ApiError> {
    let kind: TreatyKind = body
        .kind
        .parse()
        .map_err(|_| ApiError::unprocessable(format!("invalid treaty type: {}", body.kind)))?;
    let now = state.clock.now();
    let outcome = state
        .treaties
        .propose(body.from, body.to, kind, now, body.duration_h)?;
    Ok(Json(outcome))
}

pub async fn rules(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rules = serde_json::to_value(state.evaluator.rules())
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(rules))
}
