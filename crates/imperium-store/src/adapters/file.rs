//! JSON file engine.
//!
//! The whole world lives in a single JSON document, read once at open and
//! written back after every mutation. Two on-disk layouts are accepted on
//! load: the canonical layout this engine saves (resources embedded in
//! each village) and the seed layout produced by the `world-seed` tool
//! (separate top-level `resources` and `buildQueues` maps).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use imperium_types::{
    BuildCmd, Building, DiplomacyEvent, EventKind, Faction, FactionId, Relation, ResourceDelta,
    Resources, Stance, Treaty, TreatyId, TreatyKind, TreatyStatus, Village, VillageId,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::domain::state::WorldState;
use crate::ports::{DiploStore, WorldStore};

/// Persistent engine backed by one JSON world file.
#[derive(Debug)]
pub struct FileEngine {
    path: PathBuf,
    state: RwLock<WorldState>,
}

impl FileEngine {
    /// Open the world file, creating a seeded default world if it does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let state = if path.exists() {
            Self::load(&path)?
        } else {
            let state = WorldState::seeded(Utc::now());
            Self::write_file(&path, &state)?;
            debug!(path = %path.display(), "created default world file");
            state
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn load(path: &Path) -> Result<WorldState, StoreError> {
        let raw = fs::read_to_string(path)?;
        let model: WorldFileModel =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(model.into_state())
    }

    fn write_file(path: &Path, state: &WorldState) -> Result<(), StoreError> {
        let model = WorldFileModel::from_state(state);
        let raw = serde_json::to_string_pretty(&model).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, raw)?;
        Ok(())
    }

    fn persist(&self, state: &WorldState) -> Result<(), StoreError> {
        Self::write_file(&self.path, state)
    }
}

// --- On-disk layout ---------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct WorldFileModel {
    #[serde(default)]
    villages: BTreeMap<String, Village>,
    /// Seed layout only: stockpiles keyed by village id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resources: Option<BTreeMap<String, Resources>>,
    /// Seed layout only: pending queue items keyed by village id.
    #[serde(default, rename = "buildQueues", skip_serializing_if = "Option::is_none")]
    build_queues: Option<BTreeMap<String, Vec<SeedQueueItem>>>,
    #[serde(default)]
    buildings: BTreeMap<String, BTreeMap<String, u32>>,
    #[serde(default, rename = "engineState")]
    engine_state: BTreeMap<String, EngineStateRecord>,
    #[serde(default)]
    factions: BTreeMap<String, Faction>,
    #[serde(default)]
    relations: BTreeMap<String, Relation>,
    #[serde(default)]
    treaties: BTreeMap<String, Treaty>,
    #[serde(default, rename = "diplomacyEvents")]
    diplomacy_events: Vec<DiplomacyEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EngineStateRecord {
    last_tick: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SeedQueueItem {
    building: String,
    #[serde(default = "default_seed_level")]
    level: u32,
}

fn default_seed_level() -> u32 {
    1
}

impl WorldFileModel {
    fn into_state(self) -> WorldState {
        let mut state = WorldState::empty();
        let resources_map = self.resources.unwrap_or_default();
        let queues_map = self.build_queues.unwrap_or_default();

        for (key, mut village) in self.villages {
            // Seed layout keeps stockpiles and queues outside the village.
            if let Some(res) = resources_map.get(&key) {
                village.resources = *res;
            }
            if let Some(items) = queues_map.get(&key) {
                village.queue = items
                    .iter()
                    .map(|i| format!("{} -> L{}", i.building, i.level))
                    .collect();
            }
            state.villages.insert(village.id, village);
        }

        for (key, levels) in self.buildings {
            if let Ok(vid) = key.parse::<VillageId>() {
                let parsed: HashMap<Building, u32> = levels
                    .iter()
                    .filter_map(|(name, lvl)| name.parse::<Building>().ok().map(|b| (b, *lvl)))
                    .collect();
                state.buildings.insert(vid, parsed);
            }
        }

        for (key, record) in self.engine_state {
            if let Ok(vid) = key.parse::<VillageId>() {
                state.last_ticks.insert(vid, record.last_tick);
            }
        }

        // Villages without gameplay state get the playable defaults.
        let now = Utc::now();
        let vids: Vec<VillageId> = state.villages.keys().copied().collect();
        for vid in vids {
            state
                .buildings
                .entry(vid)
                .or_insert_with(|| Building::ALL.iter().map(|b| (*b, 1)).collect());
            state.last_ticks.entry(vid).or_insert(now);
        }

        for faction in self.factions.into_values() {
            state.factions.insert(faction.id, faction);
        }
        for rel in self.relations.into_values() {
            state.relations.insert((rel.a, rel.b), rel);
        }
        for treaty in self.treaties.into_values() {
            state.treaties.insert(treaty.id, treaty);
        }
        state.next_treaty_id = state.treaties.keys().max().map_or(1, |max| max + 1);

        state.events = self.diplomacy_events;
        for (i, ev) in state.events.iter_mut().enumerate() {
            if ev.id == 0 {
                ev.id = i as u64 + 1;
            }
        }

        state
    }

    fn from_state(state: &WorldState) -> Self {
        Self {
            villages: state
                .villages
                .values()
                .map(|v| (v.id.to_string(), v.clone()))
                .collect(),
            resources: None,
            build_queues: None,
            buildings: state
                .buildings
                .iter()
                .map(|(vid, levels)| {
                    (
                        vid.to_string(),
                        levels
                            .iter()
                            .map(|(b, lvl)| (b.as_str().to_string(), *lvl))
                            .collect(),
                    )
                })
                .collect(),
            engine_state: state
                .last_ticks
                .iter()
                .map(|(vid, ts)| (vid.to_string(), EngineStateRecord { last_tick: *ts }))
                .collect(),
            factions: state
                .factions
                .values()
                .map(|f| (f.id.to_string(), f.clone()))
                .collect(),
            relations: state
                .relations
                .values()
                .map(|r| (format!("{}_{}", r.a, r.b), r.clone()))
                .collect(),
            treaties: state
                .treaties
                .values()
                .map(|t| (t.id.to_string(), t.clone()))
                .collect(),
            diplomacy_events: state.events.clone(),
        }
    }
}

// --- Port implementations ---------------------------------------------------

impl WorldStore for FileEngine {
    fn snapshot(&self) -> Result<Vec<Village>, StoreError> {
        Ok(self.state.read().snapshot())
    }

    fn village(&self, id: VillageId) -> Result<Option<Village>, StoreError> {
        Ok(self.state.read().village(id))
    }

    fn queue_build(&self, cmd: &BuildCmd) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let accepted = state.queue_build(cmd);
        if accepted {
            self.persist(&state)?;
        }
        Ok(accepted)
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
        let mut state = self.state.write();
        state.set_building_level(vid, building, level);
        self.persist(&state)
    }

    fn last_tick(&self, vid: VillageId) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.state.read().last_tick(vid))
    }

    fn set_last_tick(&self, vid: VillageId, ts: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.set_last_tick(vid, ts);
        self.persist(&state)
    }

    fn apply_resource_delta(
        &self,
        vid: VillageId,
        delta: &ResourceDelta,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.apply_resource_delta(vid, delta);
        self.persist(&state)
    }

    fn debit_wood(&self, vid: VillageId, amount: i64) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let debited = state.debit_wood(vid, amount);
        if debited {
            self.persist(&state)?;
        }
        Ok(debited)
    }
}

impl DiploStore for FileEngine {
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
        let mut state = self.state.write();
        state.upsert_relation(a, b, stance, opinion, now);
        self.persist(&state)
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
        let mut state = self.state.write();
        let id = state.open_treaty(a, b, kind, started_at, expires_at);
        self.persist(&state)?;
        Ok(id)
    }

    fn set_treaty_status(&self, id: TreatyId, status: TreatyStatus) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.set_treaty_status(id, status);
        self.persist(&state)
    }

    fn log_event(
        &self,
        kind: EventKind,
        payload: serde_json::Value,
        ts: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.log_event(kind, payload, ts);
        self.persist(&state)
    }

    fn events_since(
        &self,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<DiplomacyEvent>, StoreError> {
        Ok(self.state.read().events_since(since, limit))
    }
}
