//! # HTTP Gateway
//!
//! The outward face of the Imperium backend: a small REST surface over
//! axum exposing world snapshots, gameplay commands, and the AI diplomacy
//! services.
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET  | `/health` | service identity and version |
//! | GET  | `/snapshot` | all villages |
//! | GET  | `/village/{id}` | one village or 404 |
//! | POST | `/cmd/build` | append a raw build command |
//! | POST | `/cmd/tick` | advance the gameplay simulation |
//! | GET  | `/rules` | gameplay balance constants |
//! | POST | `/ai/diplomacy/tick` | advance the diplomacy simulation |
//! | GET  | `/ai/diplomacy/suggest` | ranked treaty proposals |
//! | POST | `/ai/diplomacy/propose` | open a treaty |
//! | GET  | `/ai/diplomacy/rules` | diplomacy constants |
//!
//! Tick endpoints accept an optional `now` query parameter (ISO-8601,
//! naive timestamps read as UTC) so tests and replays control time; it
//! defaults to the state's clock.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{router, serve};
pub use state::AppState;
