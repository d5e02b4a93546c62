//! Port traits of the storage subsystem.
//!
//! These are the public APIs this crate exposes to the gameplay engine, the
//! diplomacy layer, and the HTTP gateway. Every engine implements both.

pub mod diplomacy;
pub mod world;

pub use diplomacy::DiploStore;
pub use world::WorldStore;
