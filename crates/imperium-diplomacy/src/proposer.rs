//! Deterministic proposal ranking.
//!
//! Every score is an integer so the ordering never depends on float
//! rounding. Ties break on treaty kind rank (CEASEFIRE < TRADE <
//! ALLIANCE), again deterministically.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use imperium_store::DiploStore;
use imperium_types::{normalize_pair, EventKind, FactionId, Stance, TreatyKind, TreatyStatus};

use crate::errors::DiplomacyError;
use crate::report::Suggestion;
use crate::rules::DiplomacyRules;

/// Caps the influence of repeated recent events on a single score.
const EVENT_CAP: i64 = 5;

/// Sentinel for proposals that are structurally impossible right now.
const BLOCKED: i64 = -1_000_000_000;

pub struct Proposer {
    store: Arc<dyn DiploStore>,
    rules: DiplomacyRules,
}

impl Proposer {
    pub fn new(store: Arc<dyn DiploStore>, rules: DiplomacyRules) -> Self {
        Self { store, rules }
    }

    /// Rank treaty proposals for the pair and return the best `k`.
    ///
    /// Returns an empty list when no relation exists between the factions.
    pub fn top_suggestions(
        &self,
        a: FactionId,
        b: FactionId,
        now: DateTime<Utc>,
        k: usize,
    ) -> Result<Vec<Suggestion>, DiplomacyError> {
        let (a, b) = normalize_pair(a, b);
        let Some(rel) = self.store.relation(a, b)? else {
            return Ok(Vec::new());
        };
        let opinion = rel.opinion;

        // Recent aggression and commerce inside the rolling window.
        let since = now - chrono::Duration::hours(self.rules.recent_window_h);
        let mut attacks = 0i64;
        let mut trades = 0i64;
        for event in self.store.events_since(Some(since), None)? {
            if !event.involves(a, b) {
                continue;
            }
            match event.kind {
                EventKind::Attack => attacks += 1,
                EventKind::Trade => trades += 1,
                _ => {}
            }
        }

        // Third factions both sides are hostile toward.
        let mut shared_enemies = 0i64;
        for faction in self.store.list_factions()? {
            if faction.id == a || faction.id == b {
                continue;
            }
            let ac = self.store.relation(a, faction.id)?;
            let bc = self.store.relation(b, faction.id)?;
            if ac.is_some_and(|r| r.stance == Stance::Hostile)
                && bc.is_some_and(|r| r.stance == Stance::Hostile)
            {
                shared_enemies += 1;
            }
        }

        let mut has_trade = false;
        let mut has_alliance = false;
        for treaty in self.store.list_treaties()? {
            if treaty.status == TreatyStatus::Active && treaty.binds(a, b) {
                match treaty.kind {
                    TreatyKind::Trade => has_trade = true,
                    TreatyKind::Alliance => has_alliance = true,
                    TreatyKind::Ceasefire => {}
                }
            }
        }

        let mut candidates = Vec::with_capacity(3);

        // CEASEFIRE: pointless under an alliance, urgent under fire.
        if !has_alliance {
            let mut score = 0;
            if rel.stance == Stance::Hostile {
                score += self.rules.ceasefire_hostile_bonus;
            }
            score += self.rules.ceasefire_attack_w * attacks.min(EVENT_CAP);
            let below = (-opinion + self.rules.hostile_threshold).round().max(0.0) as i64;
            score += self.rules.ceasefire_opinion_w * below;
            candidates.push(Suggestion {
                kind: TreatyKind::Ceasefire,
                score,
                reason: format!(
                    "hostile={} attacks={attacks} op={opinion:.1}",
                    rel.stance == Stance::Hostile
                ),
            });
        } else {
            candidates.push(Suggestion {
                kind: TreatyKind::Ceasefire,
                score: BLOCKED,
                reason: String::new(),
            });
        }

        // TRADE: momentum from recent transactions and positive opinion.
        if has_trade {
            candidates.push(Suggestion {
                kind: TreatyKind::Trade,
                score: -self.rules.trade_block_if_active_penalty,
                reason: "trade_already_active".into(),
            });
        } else {
            let mut score = self.rules.trade_recent_w * trades.min(EVENT_CAP);
            score += self.rules.trade_opinion_pos_w * (opinion.round().max(0.0) as i64);
            candidates.push(Suggestion {
                kind: TreatyKind::Trade,
                score,
                reason: format!("trades={trades} op={opinion:.1}"),
            });
        }

        // ALLIANCE: only viable above the opinion floor; omitted otherwise.
        if opinion >= self.rules.alliance_min_opinion && !has_alliance {
            let mut score = self.rules.alliance_opinion_w
                * ((opinion - self.rules.alliance_min_opinion).round() as i64);
            score += self.rules.alliance_shared_enemy_w * shared_enemies.min(EVENT_CAP);
            candidates.push(Suggestion {
                kind: TreatyKind::Alliance,
                score,
                reason: format!("op={opinion:.1} shared_enemies={shared_enemies}"),
            });
        }

        candidates.sort_by_key(|s| (-s.score, s.kind.rank()));
        candidates.truncate(k);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use imperium_store::MemoryEngine;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 23, 12, 0, 0).unwrap()
    }

    fn setup() -> (Arc<MemoryEngine>, Proposer) {
        let engine = Arc::new(MemoryEngine::new());
        let proposer = Proposer::new(engine.clone(), DiplomacyRules::default());
        (engine, proposer)
    }

    #[test]
    fn no_relation_means_no_suggestions() {
        let (_, proposer) = setup();
        assert!(proposer.top_suggestions(8, 9, t0(), 3).unwrap().is_empty());
    }

    #[test]
    fn hostile_pairs_lead_with_ceasefire() {
        let (engine, proposer) = setup();
        engine.upsert_relation(1, 2, Stance::Hostile, -60.0, t0()).unwrap();
        for _ in 0..3 {
            engine
                .log_event(EventKind::Attack, json!({"a": 2, "b": 1}), t0())
                .unwrap();
        }

        let suggestions = proposer.top_suggestions(1, 2, t0(), 3).unwrap();
        assert_eq!(suggestions[0].kind, TreatyKind::Ceasefire);
        // 1200 hostile + 3*35 attacks + 20 points below threshold * 15.
        assert_eq!(suggestions[0].score, 1200 + 105 + 300);
        // Alliance is unviable at this opinion and does not even appear.
        assert!(suggestions.iter().all(|s| s.kind != TreatyKind::Alliance));
    }

    #[test]
    fn friendly_pairs_rank_alliance_and_trade() {
        let (engine, proposer) = setup();
        engine.upsert_relation(1, 2, Stance::Ally, 50.0, t0()).unwrap();
        // Both hostile toward faction 3.
        engine.upsert_relation(1, 3, Stance::Hostile, -50.0, t0()).unwrap();
        engine.upsert_relation(2, 3, Stance::Hostile, -50.0, t0()).unwrap();
        engine
            .log_event(EventKind::Trade, json!({"a": 1, "b": 2}), t0())
            .unwrap();

        let suggestions = proposer.top_suggestions(1, 2, t0(), 3).unwrap();
        assert_eq!(suggestions[0].kind, TreatyKind::Alliance);
        // 20 * (50 - 20) + 40 * 1 shared enemy.
        assert_eq!(suggestions[0].score, 600 + 40);
        assert_eq!(suggestions[1].kind, TreatyKind::Trade);
        // 25 * 1 trade + 5 * 50.
        assert_eq!(suggestions[1].score, 25 + 250);
    }

    #[test]
    fn equal_scores_break_ties_by_kind_rank() {
        let (engine, proposer) = setup();
        engine.upsert_relation(1, 2, Stance::Neutral, 0.0, t0()).unwrap();

        let suggestions = proposer.top_suggestions(1, 2, t0(), 3).unwrap();
        // Both score zero; ceasefire ranks first.
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].score, 0);
        assert_eq!(suggestions[1].score, 0);
        assert_eq!(suggestions[0].kind, TreatyKind::Ceasefire);
        assert_eq!(suggestions[1].kind, TreatyKind::Trade);
    }

    #[test]
    fn active_treaties_block_their_kind() {
        let (engine, proposer) = setup();
        engine.upsert_relation(1, 2, Stance::Ally, 60.0, t0()).unwrap();
        engine
            .open_treaty(1, 2, TreatyKind::Trade, t0(), None)
            .unwrap();
        engine
            .open_treaty(1, 2, TreatyKind::Alliance, t0(), None)
            .unwrap();

        let suggestions = proposer.top_suggestions(1, 2, t0(), 3).unwrap();
        // Alliance omitted, trade deeply penalized, ceasefire blocked.
        assert!(suggestions.iter().all(|s| s.kind != TreatyKind::Alliance));
        let trade = suggestions.iter().find(|s| s.kind == TreatyKind::Trade).unwrap();
        assert_eq!(trade.score, -10_000);
        let ceasefire = suggestions
            .iter()
            .find(|s| s.kind == TreatyKind::Ceasefire)
            .unwrap();
        assert_eq!(ceasefire.score, BLOCKED);
    }

    #[test]
    fn old_events_fall_out_of_the_window() {
        let (engine, proposer) = setup();
        engine.upsert_relation(1, 2, Stance::Neutral, 0.0, t0()).unwrap();
        engine
            .log_event(
                EventKind::Attack,
                json!({"a": 1, "b": 2}),
                t0() - chrono::Duration::hours(30),
            )
            .unwrap();

        let suggestions = proposer.top_suggestions(1, 2, t0(), 3).unwrap();
        let ceasefire = suggestions
            .iter()
            .find(|s| s.kind == TreatyKind::Ceasefire)
            .unwrap();
        assert_eq!(ceasefire.score, 0);
    }
}
