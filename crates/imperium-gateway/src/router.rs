//! Route table and server entrypoint.

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::state::AppState;

/// Build the full route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/snapshot", get(handlers::world::snapshot))
        .route("/village/:id", get(handlers::world::village))
        .route("/cmd/build", post(handlers::world::cmd_build))
        .route("/cmd/tick", post(handlers::gameplay::cmd_tick))
        .route("/rules", get(handlers::gameplay::rules))
        .route("/ai/diplomacy/tick", post(handlers::diplomacy::tick))
        .route("/ai/diplomacy/suggest", get(handlers::diplomacy::suggest))
        .route("/ai/diplomacy/propose", post(handlers::diplomacy::propose))
        .route("/ai/diplomacy/rules", get(handlers::diplomacy::rules))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// serve() stays thin so tests can drive router() directly with oneshot
// requests instead of binding a port.

/// Bind and serve until the shutdown signal fires.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: oneshot::Receiver<()>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http gateway listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
            info!("http gateway shutting down");
        })
        .await
}
