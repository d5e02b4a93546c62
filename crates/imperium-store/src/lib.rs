//! # World Storage Engine
//!
//! The authoritative persistence subsystem for Imperium. Every other
//! subsystem reads and writes world state exclusively through the two port
//! traits defined here:
//!
//! - [`WorldStore`] — villages, stockpiles, building levels, and the
//!   per-village tick bookkeeping the gameplay engine needs.
//! - [`DiploStore`] — factions, pairwise relations, treaties, and the
//!   diplomacy audit log.
//!
//! ## Engines
//!
//! Three interchangeable engines implement both ports:
//!
//! | Engine | Backing | Use |
//! |--------|---------|-----|
//! | [`MemoryEngine`] | HashMaps | default, tests |
//! | [`FileEngine`] | JSON file, write-through | small persistent worlds |
//! | [`SqliteEngine`] | SQLite via rusqlite | durable deployments |
//!
//! The file and SQLite engines create a seeded default world on first open
//! (village 1 "Capitale", all producing buildings at level 1) so a fresh
//! process is immediately playable.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - in-memory world state and storage errors
//! - `ports/` - the `WorldStore` / `DiploStore` port traits
//! - `adapters/` - the three engine implementations and SQL migrations

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{FileEngine, MemoryEngine, SqliteEngine};
pub use domain::errors::{EngineKind, StoreError};
pub use ports::{DiploStore, WorldStore};
