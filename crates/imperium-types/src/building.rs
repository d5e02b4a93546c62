//! The building catalogue known to the tick engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four producing buildings of a village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Building {
    LumberMill,
    ClayPit,
    IronMine,
    Farm,
}

/// Raised when a free-form building name does not match the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown building: {0}")]
pub struct UnknownBuilding(pub String);

impl Building {
    /// All buildings, in canonical order.
    pub const ALL: [Building; 4] = [
        Building::LumberMill,
        Building::ClayPit,
        Building::IronMine,
        Building::Farm,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Building::LumberMill => "lumber_mill",
            Building::ClayPit => "clay_pit",
            Building::IronMine => "iron_mine",
            Building::Farm => "farm",
        }
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Building {
    type Err = UnknownBuilding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lumber_mill" => Ok(Building::LumberMill),
            "clay_pit" => Ok(Building::ClayPit),
            "iron_mine" => Ok(Building::IronMine),
            "farm" => Ok(Building::Farm),
            other => Err(UnknownBuilding(other.to_string())),
        }
    }
}
