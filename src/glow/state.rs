//! Glow Trip game state definitions.
//!
//! The whole state is one serde record so it can be persisted as a flat
//! camelCase JSON snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::effects::EffectDelta;
use super::i18n::{Locale, LocalizedText};

pub const STATE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trip {
    /// Fraction of the current trip, in `[0, 1)`.
    pub progress: f64,
    /// Fraction per second.
    pub speed_base: f64,
    pub speed_bonus: f64,
    pub speed_mult: f64,
    /// Start of the current trip (ms since epoch).
    pub started_at: f64,
    pub last_finish_during_event: Option<String>,
    /// Seconds the last finished trip took.
    pub last_duration: Option<f64>,
}

impl Trip {
    pub fn new(now_ms: f64) -> Self {
        Self {
            progress: 0.0,
            speed_base: 0.12,
            speed_bonus: 0.0,
            speed_mult: 1.0,
            started_at: now_ms,
            last_finish_during_event: None,
            last_duration: None,
        }
    }
}

impl Default for Trip {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A timed modifier from a random event or an activated boost.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActiveEffect {
    pub key: String,
    pub name: LocalizedText,
    /// Seconds remaining.
    pub time_left: f64,
    pub effects: EffectDelta,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Unlock {
    pub unlocked_at: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub events_activated: u64,
    pub trips_completed: u64,
    pub boosts_used: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub sound: bool,
    pub animations: bool,
    pub high_contrast: bool,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            animations: true,
            high_contrast: false,
            locale: Locale::Ru,
        }
    }
}

/// Scheduling bookkeeping. Reset whenever a save is loaded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Run {
    pub last_tick: Option<f64>,
    /// Seconds accumulated towards the next autosave.
    pub save_timer: f64,
    pub last_click_at: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub version: u32,

    pub glow: f64,
    pub spent_glow: f64,
    pub total_glow_earned: f64,

    pub per_click_base: f64,
    pub per_click_bonus: f64,
    pub per_click_mult: f64,
    pub per_second_base: f64,
    pub per_second_bonus: f64,
    pub per_second_mult: f64,

    pub event_chance_bonus: f64,
    pub boost_duration_mult: f64,
    pub shop_discount_extra: f64,

    pub trip: Trip,
    pub active_events: Vec<ActiveEffect>,
    pub cooldowns: BTreeMap<String, f64>,
    pub inventory: BTreeMap<String, u32>,
    pub achievements: BTreeMap<String, Unlock>,
    pub stats: Stats,
    pub settings: Settings,
    pub run: Run,
}

impl GameState {
    /// Fresh state with the trip clock starting at `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            version: STATE_VERSION,
            glow: 0.0,
            spent_glow: 0.0,
            total_glow_earned: 0.0,
            per_click_base: 1.0,
            per_click_bonus: 0.0,
            per_click_mult: 1.0,
            per_second_base: 0.0,
            per_second_bonus: 0.0,
            per_second_mult: 1.0,
            event_chance_bonus: 0.0,
            boost_duration_mult: 0.0,
            shop_discount_extra: 0.0,
            trip: Trip::new(now_ms),
            active_events: Vec::new(),
            cooldowns: BTreeMap::new(),
            inventory: BTreeMap::new(),
            achievements: BTreeMap::new(),
            stats: Stats::default(),
            settings: Settings::default(),
            run: Run::default(),
        }
    }

    pub fn level_of(&self, item_key: &str) -> u32 {
        self.inventory.get(item_key).copied().unwrap_or(0)
    }

    pub fn is_unlocked(&self, achievement_key: &str) -> bool {
        self.achievements.contains_key(achievement_key)
    }

    pub fn is_active(&self, effect_key: &str) -> bool {
        self.active_events.iter().any(|e| e.key == effect_key)
    }

    /// Credit income: raises both the balance and the lifetime total.
    pub fn earn(&mut self, amount: f64) {
        self.glow += amount;
        self.total_glow_earned += amount;
    }

    /// Keys of items owned at level 1 or above.
    pub fn owned_keys(&self) -> impl Iterator<Item = &str> {
        self.inventory
            .iter()
            .filter(|(_, lvl)| **lvl > 0)
            .map(|(k, _)| k.as_str())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_defaults() {
        let s = GameState::new(1234.0);
        assert_eq!(s.version, 1);
        assert_eq!(s.glow, 0.0);
        assert_eq!(s.per_click_base, 1.0);
        assert_eq!(s.per_second_mult, 1.0);
        assert!((s.trip.speed_base - 0.12).abs() < 1e-12);
        assert_eq!(s.trip.started_at, 1234.0);
        assert_eq!(s.settings.locale, Locale::Ru);
        assert!(s.settings.sound);
        assert!(!s.settings.high_contrast);
    }

    #[test]
    fn serializes_camel_case() {
        let s = GameState::new(0.0);
        let v = serde_json::to_value(&s).unwrap();
        assert!(v.get("spentGlow").is_some());
        assert!(v.get("totalGlowEarned").is_some());
        assert!(v.get("activeEvents").is_some());
        assert!(v["trip"].get("speedBase").is_some());
        assert!(v["trip"].get("lastFinishDuringEvent").is_some());
        assert!(v["settings"].get("highContrast").is_some());
        assert!(v["stats"].get("boostsUsed").is_some());
    }

    #[test]
    fn missing_nested_fields_take_defaults() {
        let s: GameState = serde_json::from_str(r#"{"trip":{"progress":0.5}}"#).unwrap();
        assert_eq!(s.trip.progress, 0.5);
        assert!((s.trip.speed_base - 0.12).abs() < 1e-12);
        assert_eq!(s.per_click_base, 1.0);
    }

    #[test]
    fn owned_keys_skip_zero_levels() {
        let mut s = GameState::new(0.0);
        s.inventory.insert("clothes_scarf".into(), 2);
        s.inventory.insert("clothes_coat".into(), 0);
        let owned: Vec<&str> = s.owned_keys().collect();
        assert_eq!(owned, vec!["clothes_scarf"]);
        assert_eq!(s.level_of("clothes_coat"), 0);
        assert_eq!(s.level_of("nope"), 0);
    }

    #[test]
    fn earn_moves_balance_and_total() {
        let mut s = GameState::new(0.0);
        s.earn(12.5);
        assert_eq!(s.glow, 12.5);
        assert_eq!(s.total_glow_earned, 12.5);
        assert_eq!(s.spent_glow, 0.0);
    }
}
