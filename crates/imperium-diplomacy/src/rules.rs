//! Diplomacy constants (`diplo_v1`), calibrated for 30-60 minute sessions.

use serde::Serialize;

/// The versioned diplomacy ruleset. Serialized verbatim on the rules
/// endpoint, so field names are wire names.
#[derive(Debug, Clone, Serialize)]
pub struct DiplomacyRules {
    pub version: &'static str,

    // Opinion dynamics
    /// Opinion multiplier per game-hour at tick.
    pub cooldown_factor: f64,
    /// Opinion drop per aggression event.
    pub attack_penalty: f64,
    /// Opinion gain per trade transaction.
    pub trade_bonus: f64,
    /// Opinion gain per hour of active alliance.
    pub honor_bonus_per_hour: f64,

    // Stance thresholds
    pub ally_threshold: f64,
    pub hostile_threshold: f64,

    // Proposal scoring (integers, fixed-point)
    pub recent_window_h: i64,
    pub ceasefire_hostile_bonus: i64,
    pub ceasefire_attack_w: i64,
    pub ceasefire_opinion_w: i64,
    pub trade_recent_w: i64,
    pub trade_opinion_pos_w: i64,
    pub trade_block_if_active_penalty: i64,
    pub alliance_min_opinion: f64,
    pub alliance_opinion_w: i64,
    pub alliance_shared_enemy_w: i64,

    // Default treaty durations
    pub ceasefire_duration_h: i64,
    pub trade_duration_h: i64,
    pub alliance_duration_h: i64,
}

impl Default for DiplomacyRules {
    fn default() -> Self {
        Self {
            version: "diplo_v1",
            cooldown_factor: 0.98,
            attack_penalty: 20.0,
            trade_bonus: 8.0,
            honor_bonus_per_hour: 1.5,
            ally_threshold: 40.0,
            hostile_threshold: -40.0,
            recent_window_h: 24,
            ceasefire_hostile_bonus: 1200,
            ceasefire_attack_w: 35,
            ceasefire_opinion_w: 15,
            trade_recent_w: 25,
            trade_opinion_pos_w: 5,
            trade_block_if_active_penalty: 10_000,
            alliance_min_opinion: 20.0,
            alliance_opinion_w: 20,
            alliance_shared_enemy_w: 40,
            ceasefire_duration_h: 12,
            trade_duration_h: 24,
            alliance_duration_h: 72,
        }
    }
}
