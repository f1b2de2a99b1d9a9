//! Achievement tracking: condition checks, reward application, unlock records.

use std::collections::BTreeSet;

use super::catalog::{AchievementDef, Catalog, Condition};
use super::effects::Reward;
use super::state::{GameState, Unlock};

/// Unlock every locked achievement whose condition holds, in catalog order.
///
/// Rewards are applied once, at unlock; unlocked achievements are skipped on
/// later passes. Returns the keys unlocked by this pass.
pub fn check_achievements(
    state: &mut GameState,
    catalog: &Catalog,
    now_ms: f64,
    mut on_unlock: impl FnMut(&AchievementDef),
) -> Vec<String> {
    let mut unlocked = Vec::new();
    for def in &catalog.achievements {
        if state.is_unlocked(&def.key) {
            continue;
        }
        if !meets(state, catalog, &def.condition) {
            continue;
        }
        state
            .achievements
            .insert(def.key.clone(), Unlock { unlocked_at: now_ms });
        apply_reward(state, &def.reward);
        on_unlock(def);
        unlocked.push(def.key.clone());
    }
    unlocked
}

/// Category of an owned item: the catalog's, else the key prefix before `_`.
fn category_of<'a>(catalog: &'a Catalog, key: &'a str) -> &'a str {
    match catalog.item(key) {
        Some(item) if !item.category.is_empty() => &item.category,
        _ => key.split('_').next().unwrap_or(key),
    }
}

pub fn meets(state: &GameState, catalog: &Catalog, cond: &Condition) -> bool {
    match cond {
        Condition::BuyDistinct { count } => {
            let categories: BTreeSet<&str> = state
                .owned_keys()
                .map(|k| category_of(catalog, k))
                .collect();
            categories.len() as u64 >= *count
        }
        Condition::TotalGlow { value } => state.total_glow_earned >= *value,
        Condition::TripsCompleted { count } => state.stats.trips_completed >= *count,
        Condition::TripTimeLess { seconds } => state
            .trip
            .last_duration
            .is_some_and(|d| d > 0.0 && d <= *seconds),
        Condition::UniqueItems { count } => state.owned_keys().count() as u64 >= *count,
        Condition::EventsActivated { count } => state.stats.events_activated >= *count,
        Condition::SpentGlow { value } => state.spent_glow >= *value,
        Condition::BoostsUsed { count } => state.stats.boosts_used >= *count,
        Condition::TripDuringEvent { event_key } => match event_key {
            Some(key) => state.trip.last_finish_during_event.as_deref() == Some(key.as_str()),
            None => false,
        },
        Condition::Unknown => false,
    }
}

/// Add every reward delta to its accumulator.
pub fn apply_reward(state: &mut GameState, reward: &Reward) {
    state.per_click_base += reward.per_click_add;
    state.per_click_mult += reward.per_click_mult;
    state.per_second_base += reward.per_second_add;
    state.per_second_mult += reward.per_second_mult;
    state.trip.speed_mult += reward.trip_speed_mult;
    state.event_chance_bonus += reward.event_chance;
    state.boost_duration_mult += reward.boost_duration_mult;
    state.shop_discount_extra += reward.shop_discount;
}
