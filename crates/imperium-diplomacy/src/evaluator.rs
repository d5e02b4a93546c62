//! The diplomacy tick.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use imperium_store::DiploStore;
use imperium_types::{EventKind, FactionId, Stance, TreatyKind, TreatyStatus};
use serde_json::json;
use tracing::{debug, info};

use crate::errors::DiplomacyError;
use crate::report::{RelationChange, TickReport};
use crate::rules::DiplomacyRules;

/// Applies time-based updates: treaty expiry, opinion cooldown, alliance
/// honor bonuses, and stance recomputation under treaty locks.
pub struct Evaluator {
    store: Arc<dyn DiploStore>,
    rules: DiplomacyRules,
}

impl Evaluator {
    pub fn new(store: Arc<dyn DiploStore>, rules: DiplomacyRules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &DiplomacyRules {
        &self.rules
    }

    /// Advance the diplomacy state to `now`.
    pub fn tick_update(&self, now: DateTime<Utc>) -> Result<TickReport, DiplomacyError> {
        let mut report = TickReport::default();

        // Expire treaties whose time has come.
        for treaty in self.store.list_treaties()? {
            let due = treaty
                .expires_at
                .is_some_and(|expires| expires <= now);
            if treaty.status == TreatyStatus::Active && due {
                self.store.set_treaty_status(treaty.id, TreatyStatus::Expired)?;
                self.store.log_event(
                    EventKind::TreatyExpire,
                    json!({
                        "id": treaty.id,
                        "a": treaty.a,
                        "b": treaty.b,
                        "type": treaty.kind.as_str(),
                    }),
                    now,
                )?;
                debug!(treaty = treaty.id, "treaty expired");
                report.expired_treaties.push(treaty.id);
            }
        }

        // Index the surviving locks. ALLIANCE outranks CEASEFIRE.
        let mut locks: HashMap<(FactionId, FactionId), TreatyKind> = HashMap::new();
        for treaty in self.store.list_treaties()? {
            if treaty.status != TreatyStatus::Active {
                continue;
            }
            locks
                .entry((treaty.a, treaty.b))
                .and_modify(|kind| {
                    if *kind == TreatyKind::Ceasefire && treaty.kind == TreatyKind::Alliance {
                        *kind = TreatyKind::Alliance;
                    }
                })
                .or_insert(treaty.kind);
        }

        // Cooldown, honor, and stance recompute for every relation.
        for rel in self.store.list_relations()? {
            let hours = (now - rel.last_updated)
                .num_milliseconds()
                .max(0) as f64
                / 3_600_000.0;

            let mut opinion = if hours > 0.0 {
                rel.opinion * self.rules.cooldown_factor.powf(hours)
            } else {
                rel.opinion
            };

            let lock = locks.get(&(rel.a, rel.b)).copied();
            if lock == Some(TreatyKind::Alliance) && hours > 0.0 {
                opinion += self.rules.honor_bonus_per_hour * hours;
            }

            let stance = match lock {
                Some(TreatyKind::Alliance) => Stance::Ally,
                Some(TreatyKind::Ceasefire) => {
                    if opinion >= self.rules.ally_threshold {
                        Stance::Ally
                    } else {
                        Stance::Neutral
                    }
                }
                _ => {
                    if opinion >= self.rules.ally_threshold {
                        Stance::Ally
                    } else if opinion <= self.rules.hostile_threshold {
                        Stance::Hostile
                    } else {
                        Stance::Neutral
                    }
                }
            };

            if (opinion - rel.opinion).abs() > 1e-6 || stance != rel.stance || hours > 0.0 {
                self.store
                    .upsert_relation(rel.a, rel.b, stance, opinion, now)?;
                report.updated_relations.push(RelationChange(
                    rel.a,
                    rel.b,
                    rel.opinion,
                    rel.stance,
                    opinion,
                    stance,
                ));
            }
        }

        self.store.log_event(
            EventKind::TickUpdate,
            json!({
                "updated_relations": report.updated_relations.len(),
                "expired_treaties": report.expired_treaties.len(),
            }),
            now,
        )?;
        report.events.push(crate::report::TickEventNote {
            kind: EventKind::TickUpdate.to_string(),
            ts: now,
        });
        info!(
            relations = report.updated_relations.len(),
            expired = report.expired_treaties.len(),
            "diplomacy tick applied"
        );
        Ok(report)
    }
}
