//! Production and pricing: pure functions of state and catalog.

use super::catalog::Catalog;
use super::effects::product_of;
use super::state::GameState;

/// Price multiplier per owned level.
pub const PRICE_GROWTH: f64 = 1.15;
/// Upper bound on the purchase discount.
pub const MAX_SHOP_DISCOUNT: f64 = 0.9;

pub fn current_per_click(state: &GameState) -> f64 {
    (state.per_click_base + state.per_click_bonus)
        * state.per_click_mult
        * product_of(state.active_events.iter().map(|a| &a.effects), |e| {
            e.per_click_multiplier
        })
}

pub fn current_per_second(state: &GameState) -> f64 {
    (state.per_second_base + state.per_second_bonus)
        * state.per_second_mult
        * product_of(state.active_events.iter().map(|a| &a.effects), |e| {
            e.per_second_multiplier
        })
}

pub fn current_trip_speed(state: &GameState) -> f64 {
    let trip = &state.trip;
    (trip.speed_base + trip.speed_bonus)
        * trip.speed_mult
        * product_of(state.active_events.iter().map(|a| &a.effects), |e| {
            e.trip_speed_multiplier
        })
}

/// Undiscounted price of the next level.
pub fn price_for(base_price: f64, level: u32) -> f64 {
    price_with_growth(base_price, level, PRICE_GROWTH)
}

pub fn price_with_growth(base_price: f64, level: u32, growth: f64) -> f64 {
    base_price * growth.powi(level as i32)
}

/// Apply a discount fraction (capped at 90%) and round up. Never below 1.
pub fn charge_for(price: f64, discount: f64) -> f64 {
    let discount = discount.clamp(0.0, MAX_SHOP_DISCOUNT);
    (price * (1.0 - discount)).ceil().max(1.0)
}

/// What the shop charges right now for `level + 1` of an item with `base_price`.
pub fn discounted_price(state: &GameState, base_price: f64, level: u32) -> f64 {
    charge_for(price_for(base_price, level), state.shop_discount_extra)
}

/// Recompute the inventory-fed bonuses from owned levels.
///
/// Only `perClickBonus`, `perSecondBonus` and `trip.speedBonus` are derived;
/// achievement accumulators are left alone. Unknown inventory keys contribute
/// nothing.
pub fn recalc_derived(state: &mut GameState, catalog: &Catalog) {
    let mut per_click = 0.0;
    let mut per_second = 0.0;
    let mut trip_speed = 0.0;
    for (key, &level) in &state.inventory {
        if level == 0 {
            continue;
        }
        let Some(item) = catalog.item(key) else {
            continue;
        };
        let lvl = level as f64;
        per_click += item.effects.per_click * lvl;
        per_second += item.effects.per_second * lvl;
        trip_speed += item.effects.trip_speed * lvl;
    }
    state.per_click_bonus = per_click;
    state.per_second_bonus = per_second;
    state.trip.speed_bonus = trip_speed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glow::effects::EffectDelta;
    use crate::glow::state::ActiveEffect;
    use proptest::prelude::*;

    fn effect(key: &str, effects: EffectDelta) -> ActiveEffect {
        ActiveEffect {
            key: key.into(),
            time_left: 10.0,
            effects,
            ..ActiveEffect::default()
        }
    }

    #[test]
    fn per_click_defaults_to_one() {
        let s = GameState::new(0.0);
        assert_eq!(current_per_click(&s), 1.0);
        assert_eq!(current_per_second(&s), 0.0);
    }

    #[test]
    fn active_multipliers_stack_multiplicatively() {
        let mut s = GameState::new(0.0);
        s.per_click_base = 2.0;
        s.per_click_bonus = 1.0;
        s.per_click_mult = 1.5;
        s.active_events.push(effect("a", EffectDelta::income(2.0)));
        s.active_events.push(effect("b", EffectDelta::income(3.0)));
        // (2 + 1) * 1.5 * 2 * 3
        assert!((current_per_click(&s) - 27.0).abs() < 1e-9);
    }

    #[test]
    fn trip_speed_uses_trip_multiplier_only() {
        let mut s = GameState::new(0.0);
        s.trip.speed_bonus = 0.08;
        s.active_events.push(effect("boost", EffectDelta::income(5.0)));
        s.active_events.push(effect(
            "traffic",
            EffectDelta {
                trip_speed_multiplier: Some(0.5),
                ..EffectDelta::default()
            },
        ));
        assert!((current_trip_speed(&s) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn doubling_curve_scenario() {
        let price = price_with_growth(10.0, 2, 2.0);
        assert_eq!(price, 40.0);
        assert_eq!(charge_for(price, 0.0), 40.0);
        assert_eq!(charge_for(price, 0.25), 30.0);
    }

    #[test]
    fn discount_is_capped() {
        assert_eq!(charge_for(100.0, 0.95), 10.0);
        assert_eq!(charge_for(100.0, 5.0), 10.0);
    }

    #[test]
    fn price_never_below_one() {
        assert_eq!(charge_for(0.2, 0.0), 1.0);
        assert_eq!(charge_for(0.0, 0.9), 1.0);
    }

    #[test]
    fn recalc_sums_levels_times_effects() {
        let catalog = Catalog::embedded();
        let mut s = GameState::new(0.0);
        s.inventory.insert("clothes_scarf".into(), 3);
        s.inventory.insert("transport_bike".into(), 2);
        s.inventory.insert("ghost_item".into(), 9);
        recalc_derived(&mut s, &catalog);

        let scarf = catalog.item("clothes_scarf").unwrap();
        let bike = catalog.item("transport_bike").unwrap();
        assert!((s.per_click_bonus - 3.0 * scarf.effects.per_click).abs() < 1e-9);
        assert!((s.trip.speed_bonus - 2.0 * bike.effects.trip_speed).abs() < 1e-9);
    }

    #[test]
    fn recalc_leaves_achievement_accumulators() {
        let catalog = Catalog::embedded();
        let mut s = GameState::new(0.0);
        s.per_click_base = 4.0;
        s.per_click_mult = 1.25;
        s.trip.speed_mult = 1.1;
        s.per_click_bonus = 99.0;
        recalc_derived(&mut s, &catalog);
        assert_eq!(s.per_click_base, 4.0);
        assert_eq!(s.per_click_mult, 1.25);
        assert_eq!(s.trip.speed_mult, 1.1);
        assert_eq!(s.per_click_bonus, 0.0);
    }

    proptest! {
        #[test]
        fn prop_price_strictly_increases(base in 0.01f64..1e6, level in 0u32..100) {
            prop_assert!(price_for(base, level + 1) > price_for(base, level));
        }

        #[test]
        fn prop_charge_at_least_one(price in 0.0f64..1e9, discount in -1.0f64..2.0) {
            prop_assert!(charge_for(price, discount) >= 1.0);
        }

        #[test]
        fn prop_charge_never_exceeds_rounded_price(price in 1.0f64..1e9, discount in 0.0f64..1.0) {
            prop_assert!(charge_for(price, discount) <= price.ceil());
        }
    }
}
