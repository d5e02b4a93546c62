//! Imperium backend node.
//!
//! Boot order: telemetry, configuration, storage engine, HTTP gateway.
//! Ctrl-C drains the gateway gracefully.

mod config;
mod container;

use anyhow::Context;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::config::NodeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let telemetry = imperium_telemetry::TelemetryConfig::from_env();
    imperium_telemetry::init(&telemetry).context("telemetry init failed")?;

    let config = NodeConfig::from_env().context("invalid configuration")?;
    info!(
        engine = ?config.engine,
        addr = %config.http_addr,
        version = env!("CARGO_PKG_VERSION"),
        "starting imperium node"
    );

    let state = container::build(&config).context("storage engine init failed")?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server = tokio::spawn(imperium_gateway::serve(
        config.http_addr,
        state,
        shutdown_rx,
    ));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutdown requested");
    let _ = shutdown_tx.send(());

    match server.await {
        Ok(Ok(())) => info!("node stopped"),
        Ok(Err(e)) => error!(error = %e, "gateway exited with error"),
        Err(e) => error!(error = %e, "gateway task panicked"),
    }
    Ok(())
}
