//! Diplomacy error taxonomy.

use imperium_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiplomacyError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}
