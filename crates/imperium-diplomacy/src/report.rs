//! Wire-facing outcomes of the diplomacy services.

use imperium_types::{FactionId, Stance, TreatyId, TreatyKind};
use serde::Serialize;

/// One relation touched by a diplomacy tick. Serializes as the 6-element
/// array `[a, b, old_opinion, old_stance, new_opinion, new_stance]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationChange(
    pub FactionId,
    pub FactionId,
    pub f64,
    pub Stance,
    pub f64,
    pub Stance,
);

/// Everything a diplomacy tick changed.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TickReport {
    pub updated_relations: Vec<RelationChange>,
    pub expired_treaties: Vec<TreatyId>,
    /// Summaries of the audit entries this tick wrote.
    pub events: Vec<TickEventNote>,
}

/// A summary of one audit entry written during a tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickEventNote {
    pub kind: String,
    pub ts: chrono::DateTime<chrono::Utc>,
}

/// One ranked proposal from the AI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: TreatyKind,
    pub score: i64,
    pub reason: String,
}
