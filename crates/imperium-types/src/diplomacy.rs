//! Diplomacy entities: factions, pairwise relations, treaties, and the
//! audit event log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FactionId, TreatyId};

/// Normalize a faction pair to `(min, max)` ordering.
///
/// Relations and treaties are always stored with `a < b`; lookups accept
/// either order and normalize first.
pub fn normalize_pair(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A faction participating in diplomacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub is_player: bool,
}

/// Diplomatic stance between two factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Ally,
    Neutral,
    Hostile,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stance::Ally => "ALLY",
            Stance::Neutral => "NEUTRAL",
            Stance::Hostile => "HOSTILE",
        };
        f.write_str(s)
    }
}

impl FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALLY" => Ok(Stance::Ally),
            "NEUTRAL" => Ok(Stance::Neutral),
            "HOSTILE" => Ok(Stance::Hostile),
            other => Err(format!("unknown stance: {other}")),
        }
    }
}

/// Relation between two factions. Invariant: `a < b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub a: FactionId,
    pub b: FactionId,
    pub stance: Stance,
    pub opinion: f64,
    pub last_updated: DateTime<Utc>,
}

/// Kinds of treaty that can be struck between two factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatyKind {
    Ceasefire,
    Trade,
    Alliance,
}

/// Raised when a free-form treaty kind does not match the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid_type: {0}")]
pub struct UnknownTreatyKind(pub String);

impl TreatyKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TreatyKind::Ceasefire => "CEASEFIRE",
            TreatyKind::Trade => "TRADE",
            TreatyKind::Alliance => "ALLIANCE",
        }
    }

    /// Deterministic tie-break rank used when sorting suggestions.
    pub const fn rank(&self) -> u8 {
        match self {
            TreatyKind::Ceasefire => 0,
            TreatyKind::Trade => 1,
            TreatyKind::Alliance => 2,
        }
    }
}

impl fmt::Display for TreatyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatyKind {
    type Err = UnknownTreatyKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CEASEFIRE" => Ok(TreatyKind::Ceasefire),
            "TRADE" => Ok(TreatyKind::Trade),
            "ALLIANCE" => Ok(TreatyKind::Alliance),
            other => Err(UnknownTreatyKind(other.to_string())),
        }
    }
}

/// Lifecycle status of a treaty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatyStatus {
    Active,
    Expired,
    Cancelled,
}

impl fmt::Display for TreatyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TreatyStatus::Active => "ACTIVE",
            TreatyStatus::Expired => "EXPIRED",
            TreatyStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for TreatyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(TreatyStatus::Active),
            "EXPIRED" => Ok(TreatyStatus::Expired),
            "CANCELLED" => Ok(TreatyStatus::Cancelled),
            other => Err(format!("unknown treaty status: {other}")),
        }
    }
}

/// A treaty between two factions. Invariant: `a < b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treaty {
    pub id: TreatyId,
    pub a: FactionId,
    pub b: FactionId,
    #[serde(rename = "type")]
    pub kind: TreatyKind,
    pub status: TreatyStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Treaty {
    /// Whether this treaty binds the given (unordered) faction pair.
    pub fn binds(&self, a: FactionId, b: FactionId) -> bool {
        normalize_pair(a, b) == (self.a, self.b)
    }
}

/// Classification of entries in the diplomacy audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Attack,
    Trade,
    TreatyOpen,
    TreatyExpire,
    TreatyProposeDuplicate,
    TickUpdate,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Attack => "attack",
            EventKind::Trade => "trade",
            EventKind::TreatyOpen => "treaty_open",
            EventKind::TreatyExpire => "treaty_expire",
            EventKind::TreatyProposeDuplicate => "treaty_propose_duplicate",
            EventKind::TickUpdate => "tick_update",
        };
        f.write_str(s)
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attack" => Ok(EventKind::Attack),
            "trade" => Ok(EventKind::Trade),
            "treaty_open" => Ok(EventKind::TreatyOpen),
            "treaty_expire" => Ok(EventKind::TreatyExpire),
            "treaty_propose_duplicate" => Ok(EventKind::TreatyProposeDuplicate),
            "tick_update" => Ok(EventKind::TickUpdate),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// Audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomacyEvent {
    #[serde(default)]
    pub id: u64,
    pub kind: EventKind,
    pub payload: serde_json::Value,
    pub ts: DateTime<Utc>,
}

impl DiplomacyEvent {
    /// Whether the event payload references the given (unordered) pair.
    ///
    /// Events carry `a`/`b` fields in whichever order the caller logged them.
    pub fn involves(&self, a: FactionId, b: FactionId) -> bool {
        let pa = self.payload.get("a").and_then(|v| v.as_u64());
        let pb = self.payload.get("b").and_then(|v| v.as_u64());
        match (pa, pb) {
            (Some(x), Some(y)) => normalize_pair(x, y) == normalize_pair(a, b),
            _ => false,
        }
    }
}
