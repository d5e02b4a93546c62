//! The world port: villages, stockpiles, building levels, tick bookkeeping.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use imperium_types::{BuildCmd, Building, ResourceDelta, Village, VillageId};

use crate::domain::errors::StoreError;

/// Primary world-state API.
///
/// Implementations must keep every mutation durable to the engine's backing
/// store before returning. Villages referenced by unknown ids are treated
/// as absent, never as errors.
pub trait WorldStore: Send + Sync {
    /// All villages in the world.
    fn snapshot(&self) -> Result<Vec<Village>, StoreError>;

    /// A single village, if it exists.
    fn village(&self, id: VillageId) -> Result<Option<Village>, StoreError>;

    /// Append a raw build command to the village's queue annotation.
    ///
    /// Returns `Ok(false)` for an unknown village, an empty building name,
    /// or a zero target level; the command is otherwise accepted verbatim.
    fn queue_build(&self, cmd: &BuildCmd) -> Result<bool, StoreError>;

    /// Current building levels of a village. Missing villages and missing
    /// buildings read as empty / level 0.
    fn building_levels(&self, vid: VillageId) -> Result<HashMap<Building, u32>, StoreError>;

    /// Record a building level reached through construction.
    fn set_building_level(
        &self,
        vid: VillageId,
        building: Building,
        level: u32,
    ) -> Result<(), StoreError>;

    /// When the village last accrued production, if ever.
    fn last_tick(&self, vid: VillageId) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Advance the village's production clock.
    fn set_last_tick(&self, vid: VillageId, ts: DateTime<Utc>) -> Result<(), StoreError>;

    /// Apply a signed stockpile change to a village.
    fn apply_resource_delta(
        &self,
        vid: VillageId,
        delta: &ResourceDelta,
    ) -> Result<(), StoreError>;

    /// Debit wood from a village if it can afford the amount.
    /// Returns whether the debit happened.
    fn debit_wood(&self, vid: VillageId, amount: i64) -> Result<bool, StoreError>;
}
