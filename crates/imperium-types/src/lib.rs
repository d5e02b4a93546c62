//! # Imperium Types Crate
//!
//! Domain entities shared across the Imperium backend subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a subsystem boundary
//!   (villages, resources, factions, relations, treaties) is defined here.
//! - **Wire compatibility**: serde renames keep the JSON shapes identical to
//!   the ones the world files and the HTTP facade already use
//!   (`villageId`, `levelTarget`, `ACTIVE`, `lumber_mill`, ...).
//! - **No adapter knowledge**: nothing in this crate knows how state is
//!   persisted or served.

pub mod building;
pub mod clock;
pub mod diplomacy;
pub mod village;

pub use building::{Building, UnknownBuilding};
pub use clock::{FixedClock, SystemClock, TimeSource};
pub use diplomacy::{
    normalize_pair, DiplomacyEvent, EventKind, Faction, Relation, Stance, Treaty, TreatyKind,
    TreatyStatus, UnknownTreatyKind,
};
pub use village::{BuildCmd, ResourceDelta, Resources, Village};

/// Identifier of a village in the world.
pub type VillageId = u64;

/// Identifier of a faction.
pub type FactionId = u64;

/// Identifier of a treaty.
pub type TreatyId = u64;
