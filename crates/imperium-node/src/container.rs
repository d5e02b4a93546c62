//! Dependency wiring.
//!
//! The configured engine is constructed exactly once and shared, as a
//! single object, behind both store ports.

use std::sync::Arc;

use imperium_gateway::AppState;
use imperium_store::{
    DiploStore, EngineKind, FileEngine, MemoryEngine, SqliteEngine, StoreError, WorldStore,
};
use imperium_types::SystemClock;
use tracing::info;

use crate::config::NodeConfig;

/// Build the fully wired application state for the configured engine.
pub fn build(config: &NodeConfig) -> Result<AppState, StoreError> {
    let (world, diplo): (Arc<dyn WorldStore>, Arc<dyn DiploStore>) = match config.engine {
        EngineKind::Memory => {
            let engine = Arc::new(MemoryEngine::new());
            (engine.clone(), engine)
        }
        EngineKind::File => {
            let engine = Arc::new(FileEngine::open(&config.storage_path)?);
            (engine.clone(), engine)
        }
        EngineKind::Sqlite => {
            let engine = Arc::new(SqliteEngine::open(&config.db_path)?);
            (engine.clone(), engine)
        }
    };
    info!(engine = ?config.engine, "storage engine ready");

    Ok(AppState::new(world, diplo, Arc::new(SystemClock)))
}
