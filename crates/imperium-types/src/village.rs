//! Village entities and the raw build command accepted by the facade.

use serde::{Deserialize, Serialize};

use crate::VillageId;

/// Stockpile of the four base resources.
///
/// New villages start with 800 of each, matching the seeded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub wood: i64,
    pub clay: i64,
    pub iron: i64,
    pub crop: i64,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            wood: 800,
            clay: 800,
            iron: 800,
            crop: 800,
        }
    }
}

impl Resources {
    pub const fn new(wood: i64, clay: i64, iron: i64, crop: i64) -> Self {
        Self {
            wood,
            clay,
            iron,
            crop,
        }
    }

    /// Total resource-equivalent value, used for rough sufficiency checks.
    pub fn total(&self) -> i64 {
        self.wood + self.clay + self.iron + self.crop
    }

    pub fn apply(&mut self, delta: &ResourceDelta) {
        self.wood += delta.wood;
        self.clay += delta.clay;
        self.iron += delta.iron;
        self.crop += delta.crop;
    }
}

/// Signed change to a village's stockpile, produced by a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub wood: i64,
    pub clay: i64,
    pub iron: i64,
    pub crop: i64,
}

impl ResourceDelta {
    pub fn is_zero(&self) -> bool {
        self.wood == 0 && self.clay == 0 && self.iron == 0 && self.crop == 0
    }

    pub fn merge(&mut self, other: &ResourceDelta) {
        self.wood += other.wood;
        self.clay += other.clay;
        self.iron += other.iron;
        self.crop += other.crop;
    }
}

/// A village as exposed by the snapshot facade.
///
/// `queue` is the human-readable construction queue annotation
/// (`"farm -> L2"`), kept distinct from the gameplay build slot which
/// lives in the tick engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Village {
    pub id: VillageId,
    pub name: String,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub queue: Vec<String>,
}

impl Village {
    pub fn new(id: VillageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resources: Resources::default(),
            queue: Vec::new(),
        }
    }
}

/// Raw build command accepted by `POST /cmd/build`.
///
/// The building name is free-form at this layer; only the tick engine
/// validates it against the known building set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCmd {
    pub village_id: VillageId,
    pub building: String,
    pub level_target: u32,
}
