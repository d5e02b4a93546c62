//! Gameplay error taxonomy.

use imperium_store::StoreError;
use thiserror::Error;

/// A rules lookup outside the supported level band.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("level {0} out of bounds [1..20]")]
    LevelOutOfBounds(u32),
}

/// Failures surfaced by the simulation systems.
#[derive(Debug, Error)]
pub enum GameplayError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("rules violation: {0}")]
    Rules(#[from] RulesError),
}
