//! # Gameplay Engine
//!
//! Deterministic tick-based simulation for Imperium villages. A tick runs
//! two systems in a fixed order:
//!
//! 1. [`ProductionSystem`] — accrues resources for every village from its
//!    building levels and the time elapsed since its last tick.
//! 2. [`BuildSystem`] — completes queued construction whose ETA has passed.
//!
//! Both systems only touch world state through the [`WorldStore`] port, so
//! the engine runs identically on the memory, file, and SQLite backends.
//!
//! ## Determinism
//!
//! `tick` takes the current instant as an argument rather than reading a
//! clock, which makes every outcome reproducible: the same store contents
//! and the same `now` always yield the same [`TickDelta`]. Ticking twice at
//! the same instant is a no-op.
//!
//! [`WorldStore`]: imperium_store::WorldStore

pub mod delta;
pub mod errors;
pub mod rules;
pub mod service;
pub mod systems;

pub use delta::TickDelta;
pub use errors::{GameplayError, RulesError};
pub use rules::Rules;
pub use service::GameplayService;
pub use systems::build::{BuildSystem, PendingBuild};
pub use systems::production::ProductionSystem;
