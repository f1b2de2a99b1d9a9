//! Read-only content catalogs: shop items, random events, achievements.
//!
//! Each list is parsed from its own JSON document. The host may supply a
//! primary source; anything missing or unparsable falls back to the copy
//! embedded in the binary, and a broken fallback leaves the list empty.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use super::effects::{EffectDelta, Reward};
use super::i18n::LocalizedText;

pub const EMBEDDED_ITEMS: &str = include_str!("../../assets/data/items.json");
pub const EMBEDDED_EVENTS: &str = include_str!("../../assets/data/events.json");
pub const EMBEDDED_ACHIEVEMENTS: &str = include_str!("../../assets/data/achievements.json");

/// Upper bound used when a `tripTimeLess` condition has no usable limit.
pub const NO_TIME_LIMIT: f64 = 999_999.0;

// ── Items ──────────────────────────────────────────────────────

/// How a shop item's timed boost behaves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoostKind {
    /// Multiplies click and passive income.
    #[default]
    MultIncome,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostDescriptor {
    #[serde(rename = "type")]
    pub kind: BoostKind,
    pub mult: Option<f64>,
    pub duration: Option<f64>,
}

/// Per-level contribution of an owned item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemEffects {
    pub per_click: f64,
    pub per_second: f64,
    pub trip_speed: f64,
    pub active_boost: Option<BoostDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDef {
    pub key: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub desc: LocalizedText,
    pub base_price: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
    #[serde(default)]
    pub effects: ItemEffects,
}

impl ItemDef {
    /// Catalog max level; missing or zero means a single purchase.
    pub fn max_level(&self) -> u32 {
        self.max_level.filter(|&m| m > 0).unwrap_or(1)
    }

    pub fn boost(&self) -> Option<&BoostDescriptor> {
        self.effects.active_boost.as_ref()
    }
}

// ── Events ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub key: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub desc: LocalizedText,
    /// Relative selection weight.
    #[serde(default)]
    pub chance: Option<f64>,
    /// Seconds, before the boost-duration multiplier.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Seconds; twice the scaled duration when absent.
    #[serde(default)]
    pub cooldown: Option<f64>,
    #[serde(default)]
    pub effects: EffectDelta,
}

// ── Achievements ───────────────────────────────────────────────

/// Achievement predicate over game state.
///
/// Anything that does not parse as one of the known kinds becomes
/// [`Condition::Unknown`], which is never satisfied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Condition {
    /// Owned items span at least `count` categories.
    BuyDistinct {
        #[serde(default = "one")]
        count: u64,
    },
    TotalGlow {
        #[serde(default)]
        value: f64,
    },
    TripsCompleted {
        #[serde(default = "one")]
        count: u64,
    },
    /// Last finished trip took at most `seconds`.
    TripTimeLess {
        #[serde(default = "no_time_limit")]
        seconds: f64,
    },
    /// At least `count` distinct items owned.
    UniqueItems {
        #[serde(default = "one")]
        count: u64,
    },
    EventsActivated {
        #[serde(default = "one")]
        count: u64,
    },
    SpentGlow {
        #[serde(default)]
        value: f64,
    },
    BoostsUsed {
        #[serde(default = "one")]
        count: u64,
    },
    /// Last trip finished while this event was active.
    TripDuringEvent {
        #[serde(rename = "eventKey", default)]
        event_key: Option<String>,
    },
    #[default]
    #[serde(other)]
    Unknown,
}

fn one() -> u64 {
    1
}

fn no_time_limit() -> f64 {
    NO_TIME_LIMIT
}

fn lenient_condition<'de, D>(deserializer: D) -> Result<Condition, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub key: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub desc: LocalizedText,
    #[serde(default, deserialize_with = "lenient_condition")]
    pub condition: Condition,
    #[serde(default)]
    pub reward: Reward,
}

// ── Catalog ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct ItemsFile {
    #[serde(default)]
    items: Vec<ItemDef>,
}

#[derive(Deserialize, Default)]
struct EventsFile {
    #[serde(default)]
    events: Vec<EventDef>,
}

#[derive(Deserialize, Default)]
struct AchievementsFile {
    #[serde(default)]
    achievements: Vec<AchievementDef>,
}

/// Raw JSON text for each catalog list. `None` means "not available".
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogSources<'a> {
    pub items: Option<&'a str>,
    pub events: Option<&'a str>,
    pub achievements: Option<&'a str>,
}

impl CatalogSources<'static> {
    pub fn embedded() -> Self {
        Self {
            items: Some(EMBEDDED_ITEMS),
            events: Some(EMBEDDED_EVENTS),
            achievements: Some(EMBEDDED_ACHIEVEMENTS),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub items: Vec<ItemDef>,
    pub events: Vec<EventDef>,
    pub achievements: Vec<AchievementDef>,
}

impl Catalog {
    /// The catalog shipped with the game.
    pub fn embedded() -> Self {
        Self::load(&CatalogSources::default(), &CatalogSources::embedded())
    }

    /// Build each list from `primary`, falling back to `fallback`, then to empty.
    pub fn load(primary: &CatalogSources<'_>, fallback: &CatalogSources<'_>) -> Self {
        let items: ItemsFile = parse_list("items", primary.items, fallback.items);
        let events: EventsFile = parse_list("events", primary.events, fallback.events);
        let achievements: AchievementsFile =
            parse_list("achievements", primary.achievements, fallback.achievements);
        Self {
            items: items.items,
            events: events.events,
            achievements: achievements.achievements,
        }
    }

    pub fn item(&self, key: &str) -> Option<&ItemDef> {
        self.items.iter().find(|it| it.key == key)
    }

    /// `(event key, achievement key)` for every `tripDuringEvent` achievement.
    pub fn trip_watchers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.achievements.iter().filter_map(|a| match &a.condition {
            Condition::TripDuringEvent {
                event_key: Some(key),
            } => Some((key.as_str(), a.key.as_str())),
            _ => None,
        })
    }
}

fn parse_list<T>(label: &str, primary: Option<&str>, fallback: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    if let Some(raw) = primary {
        match serde_json::from_str(raw) {
            Ok(parsed) => return parsed,
            Err(e) => super::log_warn(&format!(
                "{label} source rejected, using embedded copy: {e}"
            )),
        }
    }
    match fallback.map(serde_json::from_str::<T>) {
        Some(Ok(parsed)) => parsed,
        Some(Err(e)) => {
            super::log_warn(&format!("embedded {label} unreadable, starting empty: {e}"));
            T::default()
        }
        None => T::default(),
    }
}
