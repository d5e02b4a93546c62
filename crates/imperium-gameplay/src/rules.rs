//! Balance rules: production rates, upgrade costs, and build durations.
//!
//! All three follow the same shape, a per-building base value scaled
//! exponentially by level. Levels run 1 through 20; level 0 means the
//! building does not exist and never reaches the formulas.

use imperium_types::Building;
use serde::Serialize;

use crate::errors::RulesError;

/// Highest reachable building level.
pub const MAX_LEVEL: u32 = 20;

const RATE_GROWTH: f64 = 1.15;
const COST_GROWTH: f64 = 1.28;
const DURATION_GROWTH: f64 = 1.32;

/// One base value per producing building. Serializes as a map keyed by the
/// building's wire name.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BaseTable {
    pub lumber_mill: f64,
    pub clay_pit: f64,
    pub iron_mine: f64,
    pub farm: f64,
}

impl BaseTable {
    fn get(&self, building: Building) -> f64 {
        match building {
            Building::LumberMill => self.lumber_mill,
            Building::ClayPit => self.clay_pit,
            Building::IronMine => self.iron_mine,
            Building::Farm => self.farm,
        }
    }
}

/// The active balance ruleset.
#[derive(Debug, Clone, Serialize)]
pub struct Rules {
    pub version: &'static str,
    /// Units produced per hour at level 1.
    pub base_rates: BaseTable,
    /// Wood cost of the level-1 upgrade.
    pub base_costs: BaseTable,
    /// Level-1 build duration in seconds.
    pub base_durations_s: BaseTable,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            version: "v1",
            base_rates: BaseTable {
                lumber_mill: 60.0,
                clay_pit: 60.0,
                iron_mine: 60.0,
                farm: 30.0,
            },
            base_costs: BaseTable {
                lumber_mill: 60.0,
                clay_pit: 60.0,
                iron_mine: 60.0,
                farm: 50.0,
            },
            base_durations_s: BaseTable {
                lumber_mill: 60.0,
                clay_pit: 60.0,
                iron_mine: 60.0,
                farm: 45.0,
            },
        }
    }
}

impl Rules {
    fn scaled(base: f64, growth: f64, level: u32) -> Result<f64, RulesError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(RulesError::LevelOutOfBounds(level));
        }
        Ok(base * growth.powi(level as i32 - 1))
    }

    /// Production rate in units per hour at the given level.
    pub fn rate(&self, building: Building, level: u32) -> Result<f64, RulesError> {
        Self::scaled(self.base_rates.get(building), RATE_GROWTH, level)
    }

    /// Wood cost of upgrading *to* the given level.
    pub fn cost(&self, building: Building, level: u32) -> Result<f64, RulesError> {
        Self::scaled(self.base_costs.get(building), COST_GROWTH, level)
    }

    /// Construction time in seconds for the given level.
    pub fn duration_s(&self, building: Building, level: u32) -> Result<f64, RulesError> {
        Self::scaled(self.base_durations_s.get(building), DURATION_GROWTH, level)
    }
}
