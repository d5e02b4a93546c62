//! In-memory world state.
//!
//! `WorldState` is the plain data model behind the memory and file engines.
//! Both engines delegate every port operation to the methods here; the file
//! engine additionally writes the state back to disk after each mutation.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use imperium_types::{
    normalize_pair, BuildCmd, Building, DiplomacyEvent, EventKind, Faction, FactionId, Relation,
    ResourceDelta, Stance, Treaty, TreatyId, TreatyKind, TreatyStatus, Village, VillageId,
};

/// The complete mutable state of one world.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub villages: BTreeMap<VillageId, Village>,
    pub buildings: BTreeMap<VillageId, HashMap<Building, u32>>,
    pub last_ticks: BTreeMap<VillageId, DateTime<Utc>>,
    pub factions: BTreeMap<FactionId, Faction>,
    pub relations: BTreeMap<(FactionId, FactionId), Relation>,
    pub treaties: BTreeMap<TreatyId, Treaty>,
    pub events: Vec<DiplomacyEvent>,
    pub next_treaty_id: TreatyId,
}

impl WorldState {
    /// Empty world with no villages and no factions.
    pub fn empty() -> Self {
        Self {
            villages: BTreeMap::new(),
            buildings: BTreeMap::new(),
            last_ticks: BTreeMap::new(),
            factions: BTreeMap::new(),
            relations: BTreeMap::new(),
            treaties: BTreeMap::new(),
            events: Vec::new(),
            next_treaty_id: 1,
        }
    }

    /// The seeded default world used when an engine starts from nothing:
    /// village 1 "Capitale" with the starting stockpile, every producing
    /// building at level 1, and the tick clock set to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut state = Self::empty();
        state.villages.insert(1, Village::new(1, "Capitale"));
        state
            .buildings
            .insert(1, Building::ALL.iter().map(|b| (*b, 1)).collect());
        state.last_ticks.insert(1, now);
        state.factions.insert(
            1,
            Faction {
                id: 1,
                name: "Imperium".to_string(),
                is_player: true,
            },
        );
        state.factions.insert(
            2,
            Faction {
                id: 2,
                name: "Confederation du Nord".to_string(),
                is_player: false,
            },
        );
        state.factions.insert(
            3,
            Faction {
                id: 3,
                name: "Horde des Steppes".to_string(),
                is_player: false,
            },
        );
        state.relations.insert(
            (1, 2),
            Relation {
                a: 1,
                b: 2,
                stance: Stance::Neutral,
                opinion: 0.0,
                last_updated: now,
            },
        );
        state
    }

    // --- World operations -------------------------------------------------

    pub fn snapshot(&self) -> Vec<Village> {
        self.villages.values().cloned().collect()
    }

    pub fn village(&self, id: VillageId) -> Option<Village> {
        self.villages.get(&id).cloned()
    }

    /// Append a raw build command to the village queue annotation.
    /// Returns false for an unknown village or a malformed command.
    pub fn queue_build(&mut self, cmd: &BuildCmd) -> bool {
        if cmd.building.is_empty() || cmd.level_target == 0 {
            return false;
        }
        match self.villages.get_mut(&cmd.village_id) {
            Some(v) => {
                v.queue.push(format!("{} -> L{}", cmd.building, cmd.level_target));
                true
            }
            None => false,
        }
    }

    pub fn building_levels(&self, vid: VillageId) -> HashMap<Building, u32> {
        self.buildings.get(&vid).cloned().unwrap_or_default()
    }

    pub fn set_building_level(&mut self, vid: VillageId, building: Building, level: u32) {
        self.buildings.entry(vid).or_default().insert(building, level);
    }

    pub fn last_tick(&self, vid: VillageId) -> Option<DateTime<Utc>> {
        self.last_ticks.get(&vid).copied()
    }

    pub fn set_last_tick(&mut self, vid: VillageId, ts: DateTime<Utc>) {
        self.last_ticks.insert(vid, ts);
    }

    /// Apply a signed stockpile change. Unknown villages are ignored.
    pub fn apply_resource_delta(&mut self, vid: VillageId, delta: &ResourceDelta) {
        if let Some(v) = self.villages.get_mut(&vid) {
            v.resources.apply(delta);
        }
    }

    /// Debit wood if the village can afford it. Returns whether the debit
    /// happened.
    pub fn debit_wood(&mut self, vid: VillageId, amount: i64) -> bool {
        match self.villages.get_mut(&vid) {
            Some(v) if v.resources.wood >= amount => {
                v.resources.wood -= amount;
                true
            }
            _ => false,
        }
    }

    // --- Diplomacy operations ---------------------------------------------

    pub fn list_factions(&self) -> Vec<Faction> {
        self.factions.values().cloned().collect()
    }

    pub fn faction(&self, id: FactionId) -> Option<Faction> {
        self.factions.get(&id).cloned()
    }

    pub fn relation(&self, a: FactionId, b: FactionId) -> Option<Relation> {
        self.relations.get(&normalize_pair(a, b)).cloned()
    }

    pub fn upsert_relation(
        &mut self,
        a: FactionId,
        b: FactionId,
        stance: Stance,
        opinion: f64,
        now: DateTime<Utc>,
    ) {
        let (a, b) = normalize_pair(a, b);
        self.relations.insert(
            (a, b),
            Relation {
                a,
                b,
                stance,
                opinion,
                last_updated: now,
            },
        );
    }

    pub fn list_relations(&self) -> Vec<Relation> {
        self.relations.values().cloned().collect()
    }

    pub fn list_treaties(&self) -> Vec<Treaty> {
        self.treaties.values().cloned().collect()
    }

    pub fn treaty(&self, id: TreatyId) -> Option<Treaty> {
        self.treaties.get(&id).cloned()
    }

    pub fn open_treaty(
        &mut self,
        a: FactionId,
        b: FactionId,
        kind: TreatyKind,
        started_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> TreatyId {
        let (a, b) = normalize_pair(a, b);
        let id = self.next_treaty_id;
        self.next_treaty_id += 1;
        self.treaties.insert(
            id,
            Treaty {
                id,
                a,
                b,
                kind,
                status: TreatyStatus::Active,
                started_at,
                expires_at,
            },
        );
        id
    }

    pub fn set_treaty_status(&mut self, id: TreatyId, status: TreatyStatus) {
        if let Some(t) = self.treaties.get_mut(&id) {
            t.status = status;
        }
    }

    pub fn log_event(&mut self, kind: EventKind, payload: serde_json::Value, ts: DateTime<Utc>) {
        let id = self.events.len() as u64 + 1;
        self.events.push(DiplomacyEvent {
            id,
            kind,
            payload,
            ts,
        });
    }

    pub fn events_since(
        &self,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Vec<DiplomacyEvent> {
        let filtered: Vec<DiplomacyEvent> = self
            .events
            .iter()
            .filter(|e| since.map_or(true, |s| e.ts >= s))
            .cloned()
            .collect();
        match limit {
            Some(n) if filtered.len() > n => filtered[filtered.len() - n..].to_vec(),
            _ => filtered,
        }
    }
}
