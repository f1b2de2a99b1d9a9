//! Random events: cooldown decay, effect expiry, and the time-scaled roll.

use super::catalog::{Catalog, EventDef};
use super::effects::EffectDelta;
use super::i18n::LocalizedText;
use super::rng::RandomSource;
use super::state::{ActiveEffect, GameState};

/// Chance per second that some event fires, before achievement bonuses.
pub const BASE_EVENT_CHANCE_PER_SEC: f64 = 0.005;
/// Selection weight for events with no (or zero) `chance`.
pub const DEFAULT_EVENT_WEIGHT: f64 = 0.01;
/// Seconds, for events with no (or zero) `duration`.
pub const DEFAULT_EVENT_DURATION: f64 = 30.0;

/// What the presentation layer hears when an event starts.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivatedEvent {
    pub key: String,
    pub name: LocalizedText,
    /// Seconds, already scaled by the boost-duration multiplier.
    pub duration: f64,
    pub effects: EffectDelta,
}

/// Probability of at least one activation during `dt` seconds at a
/// per-second rate `chance_per_sec`.
pub fn roll_prob(chance_per_sec: f64, dt: f64) -> f64 {
    let p = chance_per_sec.clamp(0.0, 1.0);
    if dt <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - p).powf(dt)
}

/// Scale a base duration by `1 + boostDurationMult`.
pub fn scaled_duration(state: &GameState, base: f64) -> f64 {
    base * (1.0 + state.boost_duration_mult)
}

fn weight(ev: &EventDef) -> f64 {
    ev.chance.filter(|&c| c > 0.0).unwrap_or(DEFAULT_EVENT_WEIGHT)
}

/// Events that are neither cooling down nor already active.
fn eligible<'a>(state: &GameState, catalog: &'a Catalog) -> Vec<&'a EventDef> {
    catalog
        .events
        .iter()
        .filter(|ev| !state.cooldowns.contains_key(&ev.key) && !state.is_active(&ev.key))
        .collect()
}

/// Weighted pick with a uniform draw in `[0, 1)`.
fn pick<'a>(pool: &[&'a EventDef], draw: f64) -> Option<&'a EventDef> {
    let total: f64 = pool.iter().map(|ev| weight(ev)).sum();
    let mut r = draw * total;
    for &ev in pool {
        r -= weight(ev);
        if r <= 0.0 {
            return Some(ev);
        }
    }
    pool.last().copied()
}

/// Advance the events engine by `dt` seconds.
///
/// Decays cooldowns and active effects, then rolls once. A successful roll
/// with nothing eligible is simply lost.
pub fn tick_events(
    state: &mut GameState,
    catalog: &Catalog,
    dt: f64,
    rng: &mut dyn RandomSource,
    mut on_activate: impl FnMut(&ActivatedEvent),
) {
    for left in state.cooldowns.values_mut() {
        *left = (*left - dt).max(0.0);
    }
    state.cooldowns.retain(|_, left| *left > 0.0);

    for effect in &mut state.active_events {
        effect.time_left -= dt;
    }
    state.active_events.retain(|e| e.time_left > 0.0);

    let chance = BASE_EVENT_CHANCE_PER_SEC + state.event_chance_bonus;
    if rng.next_f64() >= roll_prob(chance, dt) {
        return;
    }

    let pool = eligible(state, catalog);
    if pool.is_empty() {
        return;
    }
    let Some(chosen) = pick(&pool, rng.next_f64()) else {
        return;
    };
    let activated = activate(state, chosen);
    on_activate(&activated);
}

fn activate(state: &mut GameState, ev: &EventDef) -> ActivatedEvent {
    let base = ev
        .duration
        .filter(|&d| d > 0.0)
        .unwrap_or(DEFAULT_EVENT_DURATION);
    let duration = scaled_duration(state, base);
    let cooldown = ev.cooldown.filter(|&c| c > 0.0).unwrap_or(duration * 2.0);

    state.active_events.push(ActiveEffect {
        key: ev.key.clone(),
        name: ev.name.clone(),
        time_left: duration,
        effects: ev.effects.clone(),
    });
    state.cooldowns.insert(ev.key.clone(), cooldown);
    state.stats.events_activated += 1;

    ActivatedEvent {
        key: ev.key.clone(),
        name: ev.name.clone(),
        duration,
        effects: ev.effects.clone(),
    }
}
