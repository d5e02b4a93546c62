//! The tick orchestrator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use imperium_store::WorldStore;
use imperium_types::{Building, VillageId};
use tracing::info;

use crate::delta::TickDelta;
use crate::errors::GameplayError;
use crate::rules::Rules;
use crate::systems::build::{BuildSystem, PendingBuild};
use crate::systems::production::ProductionSystem;

/// Owns the two systems and the active ruleset, and advances the world one
/// tick at a time. Must live as long as the process: the build system's
/// pending slots are in-memory state that a tick needs to see.
pub struct GameplayService {
    production: ProductionSystem,
    build: BuildSystem,
    rules: Rules,
}

impl GameplayService {
    pub fn new(store: Arc<dyn WorldStore>) -> Self {
        Self {
            production: ProductionSystem::new(store.clone()),
            build: BuildSystem::new(store),
            rules: Rules::default(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Enqueue a construction order through the build system.
    pub fn queue_build(
        &mut self,
        vid: VillageId,
        building: Building,
        now: DateTime<Utc>,
    ) -> Result<bool, GameplayError> {
        self.build.queue_build(vid, building, &self.rules, now)
    }

    /// The order occupying a village's build slot, if any.
    pub fn pending_build(&self, vid: VillageId) -> Option<&PendingBuild> {
        self.build.pending(vid)
    }

    /// Advance the world to `now`: production accrual first, then build
    /// completions, merged into a single delta.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickDelta, GameplayError> {
        let mut delta = self.production.apply(now, &self.rules)?;
        delta.absorb(self.build.apply(now)?);
        if !delta.is_empty() {
            info!(
                villages_changed = delta.resources_changed.len(),
                builds_completed = delta.builds_completed.len(),
                "tick applied"
            );
        }
        Ok(delta)
    }
}
