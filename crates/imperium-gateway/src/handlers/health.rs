//! Service identity.

use axum::Json;
use serde_json::{json, Value};

/// What the launcher splash displays: product, tagline, and version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "imperium-backend",
        "product": "Imperium",
        "tagline": "Strategic Empire Builder",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
