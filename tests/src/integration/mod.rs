//! Cross-crate integration tests.

pub mod api;
pub mod engines;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use axum::Router;
    use chrono::{DateTime, TimeZone, Utc};
    use http_body_util::BodyExt;
    use imperium_gateway::{router, AppState};
    use imperium_store::MemoryEngine;
    use imperium_types::FixedClock;
    use serde_json::Value;

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 12, 0, 0).unwrap()
    }

    /// A full app over a seeded in-memory world with a pinned clock.
    pub fn app() -> Router {
        let engine = Arc::new(MemoryEngine::seeded_at(t0()));
        router(AppState::new(
            engine.clone(),
            engine,
            Arc::new(FixedClock::new(t0())),
        ))
    }

    pub fn get(path: &str) -> Request<Body> {
        Request::get(path).body(Body::empty()).unwrap()
    }

    pub fn post(path: &str) -> Request<Body> {
        Request::post(path).body(Body::empty()).unwrap()
    }

    pub fn post_json(path: &str, body: Value) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
