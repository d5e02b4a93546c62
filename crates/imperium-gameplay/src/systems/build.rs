//! Construction.
//!
//! One build slot per village. The wood cost is debited when the order is
//! accepted; the level increment lands when a tick observes the ETA has
//! passed. Rejections (occupied slot, unknown village, max level, unpaid
//! cost) are reported as `Ok(false)`, not errors.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use imperium_store::WorldStore;
use imperium_types::{Building, VillageId};
use tracing::debug;

use crate::delta::TickDelta;
use crate::errors::GameplayError;
use crate::rules::{Rules, MAX_LEVEL};

/// An accepted order waiting on its ETA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBuild {
    pub building: Building,
    pub target_level: u32,
    pub eta: DateTime<Utc>,
}

pub struct BuildSystem {
    store: Arc<dyn WorldStore>,
    pending: HashMap<VillageId, PendingBuild>,
}

impl BuildSystem {
    pub fn new(store: Arc<dyn WorldStore>) -> Self {
        Self {
            store,
            pending: HashMap::new(),
        }
    }

    /// The order occupying the village's slot, if any.
    pub fn pending(&self, vid: VillageId) -> Option<&PendingBuild> {
        self.pending.get(&vid)
    }

    /// Try to enqueue an upgrade of `building` to its next level.
    pub fn queue_build(
        &mut self,
        vid: VillageId,
        building: Building,
        rules: &Rules,
        now: DateTime<Utc>,
    ) -> Result<bool, GameplayError> {
        if self.pending.contains_key(&vid) {
            return Ok(false);
        }
        if self.store.village(vid)?.is_none() {
            return Ok(false);
        }

        let current = self
            .store
            .building_levels(vid)?
            .get(&building)
            .copied()
            .unwrap_or(0);
        let target = current + 1;
        if target > MAX_LEVEL {
            return Ok(false);
        }

        let cost = rules.cost(building, target)? as i64;
        if !self.store.debit_wood(vid, cost)? {
            return Ok(false);
        }

        let eta = now + chrono::Duration::milliseconds(
            (rules.duration_s(building, target)? * 1000.0) as i64,
        );
        debug!(village = vid, %building, target, %eta, "build queued");
        self.pending.insert(
            vid,
            PendingBuild {
                building,
                target_level: target,
                eta,
            },
        );
        Ok(true)
    }

    /// Land every pending build whose ETA has passed.
    pub fn apply(&mut self, now: DateTime<Utc>) -> Result<TickDelta, GameplayError> {
        let mut delta = TickDelta::default();
        let mut done: Vec<VillageId> = self
            .pending
            .iter()
            .filter(|(_, build)| build.eta <= now)
            .map(|(&vid, _)| vid)
            .collect();
        done.sort_unstable();

        for vid in done {
            let Some(build) = self.pending.remove(&vid) else {
                continue;
            };
            self.store
                .set_building_level(vid, build.building, build.target_level)?;
            debug!(village = vid, building = %build.building, level = build.target_level, "build completed");
            delta.builds_completed.push((vid, build.building));
        }
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use imperium_store::MemoryEngine;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 12, 0, 0).unwrap()
    }

    fn system() -> (Arc<MemoryEngine>, BuildSystem) {
        let engine = Arc::new(MemoryEngine::seeded_at(t0()));
        let sys = BuildSystem::new(engine.clone());
        (engine, sys)
    }

    #[test]
    fn enqueue_debits_wood_and_completion_lands_at_eta() {
        let (engine, mut sys) = system();
        let rules = Rules::default();

        assert!(sys
            .queue_build(1, Building::LumberMill, &rules, t0())
            .unwrap());
        // L2 costs floor(60 * 1.28) = 76 wood, debited immediately.
        assert_eq!(engine.village(1).unwrap().unwrap().resources.wood, 800 - 76);
        // Not done before the ETA.
        assert!(sys.apply(t0() + chrono::Duration::seconds(10)).unwrap().is_empty());

        // L2 takes 60 * 1.32 = 79.2s.
        let delta = sys.apply(t0() + chrono::Duration::seconds(80)).unwrap();
        assert_eq!(delta.builds_completed, vec![(1, Building::LumberMill)]);
        assert_eq!(
            engine.building_levels(1).unwrap()[&Building::LumberMill],
            2
        );
        assert!(sys.pending(1).is_none());
    }

    #[test]
    fn slot_is_exclusive_until_completion() {
        let (_, mut sys) = system();
        let rules = Rules::default();
        assert!(sys.queue_build(1, Building::Farm, &rules, t0()).unwrap());
        assert!(!sys.queue_build(1, Building::ClayPit, &rules, t0()).unwrap());

        sys.apply(t0() + chrono::Duration::hours(1)).unwrap();
        assert!(sys.queue_build(1, Building::ClayPit, &rules, t0()).unwrap());
    }

    #[test]
    fn insufficient_wood_rejects_without_debit() {
        let (engine, mut sys) = system();
        let rules = Rules::default();
        // Drain the stockpile below any upgrade cost.
        assert!(engine.debit_wood(1, 760).unwrap());
        assert!(!sys.queue_build(1, Building::Farm, &rules, t0()).unwrap());
        assert_eq!(engine.village(1).unwrap().unwrap().resources.wood, 40);
    }

    #[test]
    fn unknown_village_and_max_level_are_rejected() {
        let (engine, mut sys) = system();
        let rules = Rules::default();
        assert!(!sys.queue_build(999, Building::Farm, &rules, t0()).unwrap());

        engine.set_building_level(1, Building::Farm, MAX_LEVEL).unwrap();
        assert!(!sys.queue_build(1, Building::Farm, &rules, t0()).unwrap());
    }
}
