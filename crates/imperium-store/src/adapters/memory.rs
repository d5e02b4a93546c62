//! In-memory engine. Default backend and the workhorse of the test suite.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use imperium_types::{
    BuildCmd, Building, DiplomacyEvent, EventKind, Faction, FactionId, Relation, ResourceDelta,
    Stance, Treaty, TreatyId, TreatyKind, TreatyStatus, Village, VillageId,
};
use parking_lot::RwLock;

use crate::domain::errors::StoreError;
use crate::domain::state::WorldState;
use crate::ports::{DiploStore, WorldStore};

/// Volatile engine backed by a [`WorldState`] behind a lock.
pub struct MemoryEngine {
    state: RwLock<WorldState>,
}

impl MemoryEngine {
    /// Engine seeded with the default world, tick clocks set to now.
    pub fn new() -> Self {
        Self::seeded_at(Utc::now())
    }

    /// Engine seeded with the default world at a chosen instant.
    pub fn seeded_at(now: DateTime<Utc>) -> Self {
        Self {
            state: RwLock::new(WorldState::seeded(now)),
        }
    }

    /// Engine wrapping an explicit state, for tests that stage a scenario.
    pub fn from_state(state: WorldState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldStore for MemoryEngine {
    fn snapshot(&self) -> Result<Vec<Village>, StoreError> {
        Ok(self.state.read().snapshot())
    }

    fn village(&self, id: VillageId) -> Result<Option<Village>, StoreError> {
        Ok(self.state.read().village(id))
    }

    fn queue_build(&self, cmd: &BuildCmd) -> Result<bool, StoreError> {
        Ok(self.state.write().queue_build(cmd))
    }

    fn building_levels(&self, vid: VillageId) -> Result<HashMap<Building, u32>, StoreError> {
        Ok(self.state.read().building_levels(vid))
    }

    fn set_building_level(
        &self,
        vid: VillageId,
        building: Building,
        level: u32,
    ) -> Result<(), StoreError> {
        self.state.write().set_building_level(vid, building, level);
        Ok(())
    }

    fn last_tick(&self, vid: VillageId) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.state.read().last_tick(vid))
    }

    fn set_last_tick(&self, vid: VillageId, ts: DateTime<Utc>) -> Result<(), StoreError> {
        self.state.write().set_last_tick(vid, ts);
        Ok(())
    }

    fn apply_resource_delta(
        &self,
        vid: VillageId,
        delta: &ResourceDelta,
    ) -> Result<(), StoreError> {
        self.state.write().apply_resource_delta(vid, delta);
        Ok(())
    }

    fn debit_wood(&self, vid: VillageId, amount: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().debit_wood(vid, amount))
    }
}

impl DiploStore for MemoryEngine {
    fn list_factions(&self) -> Result<Vec<Faction>, StoreError> {
        Ok(self.state.read().list_factions())
    }

    fn faction(&self, id: FactionId) -> Result<Option<Faction>, StoreError> {
        Ok(self.state.read().faction(id))
    }

    fn relation(&self, a: FactionId, b: FactionId) -> Result<Option<Relation>, StoreError> {
        Ok(self.state.read().relation(a, b))
    }

    fn upsert_relation(
        &self,
        a: FactionId,
        b: FactionId,
        stance: Stance,
        opinion: f64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.state.write().upsert_relation(a, b, stance, opinion, now);
        Ok(())
    }

    fn list_relations(&self) -> Result<Vec<Relation>, StoreError> {
        Ok(self.state.read().list_relations())
    }

    fn list_treaties(&self) -> Result<Vec<Treaty>, StoreError> {
        Ok(self.state.read().list_treaties())
    }

    fn treaty(&self, id: TreatyId) -> Result<Option<Treaty>, StoreError> {
        Ok(self.state.read().treaty(id))
    }

    fn open_treaty(
        &self,
        a: FactionId,
        b: FactionId,
        kind: TreatyKind,
        started_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<TreatyId, StoreError> {
        Ok(self
            .state
            .write()
            .open_treaty(a, b, kind, started_at, expires_at))
    }

    fn set_treaty_status(&self, id: TreatyId, status: TreatyStatus) -> Result<(), StoreError> {
        self.state.write().set_treaty_status(id, status);
        Ok(())
    }

    fn log_event(
        &self,
        kind: EventKind,
        payload: serde_json::Value,
        ts: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.state.write().log_event(kind, payload, ts);
        Ok(())
    }

    fn events_since(
        &self,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<DiplomacyEvent>, StoreError> {
        Ok(self.state.read().events_since(since, limit))
    }
}
