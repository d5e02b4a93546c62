//! The diplomacy port: factions, relations, treaties, and the audit log.

use chrono::{DateTime, Utc};
use imperium_types::{
    DiplomacyEvent, EventKind, Faction, FactionId, Relation, Stance, Treaty, TreatyId, TreatyKind,
    TreatyStatus,
};

use crate::domain::errors::StoreError;

/// Diplomacy state API.
///
/// Relations and treaties are stored normalized (`a < b`); every method
/// taking a faction pair accepts either order.
pub trait DiploStore: Send + Sync {
    fn list_factions(&self) -> Result<Vec<Faction>, StoreError>;

    fn faction(&self, id: FactionId) -> Result<Option<Faction>, StoreError>;

    fn relation(&self, a: FactionId, b: FactionId) -> Result<Option<Relation>, StoreError>;

    /// Create or replace the relation for a pair.
    fn upsert_relation(
        &self,
        a: FactionId,
        b: FactionId,
        stance: Stance,
        opinion: f64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    fn list_relations(&self) -> Result<Vec<Relation>, StoreError>;

    fn list_treaties(&self) -> Result<Vec<Treaty>, StoreError>;

    fn treaty(&self, id: TreatyId) -> Result<Option<Treaty>, StoreError>;

    /// Open a new ACTIVE treaty and return its id.
    fn open_treaty(
        &self,
        a: FactionId,
        b: FactionId,
        kind: TreatyKind,
        started_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<TreatyId, StoreError>;

    fn set_treaty_status(&self, id: TreatyId, status: TreatyStatus) -> Result<(), StoreError>;

    /// Append an entry to the diplomacy audit log.
    fn log_event(
        &self,
        kind: EventKind,
        payload: serde_json::Value,
        ts: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Audit log entries, optionally bounded below by `since` (inclusive)
    /// and truncated to the most recent `limit`.
    fn events_since(
        &self,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<DiplomacyEvent>, StoreError>;
}
