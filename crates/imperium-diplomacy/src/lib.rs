//! # AI Diplomacy
//!
//! Relations between factions evolve through three services, all driven by
//! an explicit `now` and reading state through the [`DiploStore`] port:
//!
//! - [`Evaluator`] — the diplomacy tick. Expires due treaties, decays
//!   opinions toward zero, pays honor bonuses for active alliances, and
//!   recomputes stances under treaty locks.
//! - [`Proposer`] — ranks CEASEFIRE / TRADE / ALLIANCE proposals for a
//!   faction pair with integer scores, so the ordering is identical on
//!   every platform.
//! - [`TreatyService`] — validates and opens treaties, applying their
//!   immediate stance and opinion effects.
//!
//! Stance locks: an active ALLIANCE pins a pair to ALLY; an active
//! CEASEFIRE enforces at least NEUTRAL. ALLIANCE outranks CEASEFIRE when
//! both are active.
//!
//! [`DiploStore`]: imperium_store::DiploStore

pub mod errors;
pub mod evaluator;
pub mod proposer;
pub mod report;
pub mod rules;
pub mod treaty;

pub use errors::DiplomacyError;
pub use evaluator::Evaluator;
pub use proposer::Proposer;
pub use report::{RelationChange, Suggestion, TickEventNote, TickReport};
pub use rules::DiplomacyRules;
pub use treaty::{ProposalOutcome, TreatyService};
