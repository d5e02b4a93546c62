//! Domain layer: storage errors and the in-memory world state shared by
//! the memory and file engines.

pub mod errors;
pub mod state;

pub use errors::{EngineKind, StoreError};
pub use state::WorldState;
