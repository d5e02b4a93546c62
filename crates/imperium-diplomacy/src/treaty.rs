//! Treaty lifecycle: validation, opening, and immediate effects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use imperium_store::DiploStore;
use imperium_types::{
    normalize_pair, EventKind, FactionId, Stance, TreatyId, TreatyKind,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::errors::DiplomacyError;
use crate::rules::DiplomacyRules;

/// Result of a treaty proposal, in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProposalOutcome {
    Accepted {
        accepted: bool,
        treaty_id: TreatyId,
        expires_at: DateTime<Utc>,
    },
    Rejected {
        accepted: bool,
        reason: String,
    },
}

impl ProposalOutcome {
    fn accepted(treaty_id: TreatyId, expires_at: DateTime<Utc>) -> Self {
        Self::Accepted {
            accepted: true,
            treaty_id,
            expires_at,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            accepted: false,
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

pub struct TreatyService {
    store: Arc<dyn DiploStore>,
    rules: DiplomacyRules,
}

impl TreatyService {
    pub fn new(store: Arc<dyn DiploStore>, rules: DiplomacyRules) -> Self {
        Self { store, rules }
    }

    /// Propose a treaty between two factions.
    ///
    /// A duplicate of an already-active treaty of the same kind is rejected
    /// with `already_active`. On acceptance the treaty opens immediately and
    /// its stance and opinion effects land on the relation before returning.
    pub fn propose(
        &self,
        a: FactionId,
        b: FactionId,
        kind: TreatyKind,
        now: DateTime<Utc>,
        duration_h: Option<i64>,
    ) -> Result<ProposalOutcome, DiplomacyError> {
        let (a, b) = normalize_pair(a, b);

        for treaty in self.store.list_treaties()? {
            if treaty.status == imperium_types::TreatyStatus::Active
                && treaty.binds(a, b)
                && treaty.kind == kind
            {
                self.store.log_event(
                    EventKind::TreatyProposeDuplicate,
                    json!({"a": a, "b": b, "type": kind.as_str()}),
                    now,
                )?;
                return Ok(ProposalOutcome::rejected("already_active"));
            }
        }

        let duration_h = duration_h.unwrap_or(match kind {
            TreatyKind::Ceasefire => self.rules.ceasefire_duration_h,
            TreatyKind::Trade => self.rules.trade_duration_h,
            TreatyKind::Alliance => self.rules.alliance_duration_h,
        });
        let expires_at = now + chrono::Duration::hours(duration_h);

        let treaty_id = self.store.open_treaty(a, b, kind, now, Some(expires_at))?;

        let Some(rel) = self.store.relation(a, b)? else {
            return Ok(ProposalOutcome::rejected("relation_not_found"));
        };

        let mut stance = rel.stance;
        let mut opinion = rel.opinion;
        match kind {
            TreatyKind::Ceasefire => {
                if stance == Stance::Hostile {
                    stance = Stance::Neutral;
                    opinion = opinion.max(self.rules.hostile_threshold + 2.0);
                }
            }
            // Trade benefits materialize through trade events later.
            TreatyKind::Trade => {}
            TreatyKind::Alliance => {
                stance = Stance::Ally;
                opinion = opinion.max(self.rules.ally_threshold);
            }
        }
        self.store.upsert_relation(a, b, stance, opinion, now)?;

        self.store.log_event(
            EventKind::TreatyOpen,
            json!({
                "id": treaty_id,
                "a": a,
                "b": b,
                "type": kind.as_str(),
                "expires_at": expires_at.to_rfc3339(),
            }),
            now,
        )?;
        info!(treaty = treaty_id, %kind, a, b, "treaty opened");

        Ok(ProposalOutcome::accepted(treaty_id, expires_at))
    }
}
