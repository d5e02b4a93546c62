//! Resource accrual.
//!
//! Production is integrated lazily: each village remembers the instant it
//! last accrued, and a tick pays out `floor(rate(level) * Δt_hours)` for
//! every producing building, then advances the clock. A tick at or before
//! the recorded instant changes nothing, which makes replays safe.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use imperium_store::WorldStore;
use imperium_types::{Building, ResourceDelta};
use tracing::trace;

use crate::delta::TickDelta;
use crate::errors::GameplayError;
use crate::rules::Rules;

pub struct ProductionSystem {
    store: Arc<dyn WorldStore>,
}

impl ProductionSystem {
    pub fn new(store: Arc<dyn WorldStore>) -> Self {
        Self { store }
    }

    /// Accrue production for every village up to `now`.
    pub fn apply(&self, now: DateTime<Utc>, rules: &Rules) -> Result<TickDelta, GameplayError> {
        let mut delta = TickDelta::default();

        for village in self.store.snapshot()? {
            let vid = village.id;
            let Some(last_tick) = self.store.last_tick(vid)? else {
                continue;
            };

            let elapsed = now.signed_duration_since(last_tick);
            if elapsed <= chrono::Duration::zero() {
                continue;
            }
            let hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;

            let levels = self.store.building_levels(vid)?;
            let mut accrued = ResourceDelta::default();
            for building in Building::ALL {
                let level = levels.get(&building).copied().unwrap_or(0);
                if level == 0 {
                    continue;
                }
                let produced = (rules.rate(building, level)? * hours) as i64;
                match building {
                    Building::LumberMill => accrued.wood += produced,
                    Building::ClayPit => accrued.clay += produced,
                    Building::IronMine => accrued.iron += produced,
                    Building::Farm => accrued.crop += produced,
                }
            }

            if !accrued.is_zero() {
                self.store.apply_resource_delta(vid, &accrued)?;
                trace!(village = vid, ?accrued, "production accrued");
                delta.resources_changed.insert(vid, accrued);
            }
            self.store.set_last_tick(vid, now)?;
        }

        Ok(delta)
    }
}
