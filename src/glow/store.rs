//! Shop purchases and boost activation.

use thiserror::Error;

use super::catalog::{BoostKind, Catalog, ItemDef};
use super::economy::{discounted_price, recalc_derived};
use super::effects::EffectDelta;
use super::events::scaled_duration;
use super::i18n::LocalizedText;
use super::state::{ActiveEffect, GameState};

pub const DEFAULT_BOOST_DURATION: f64 = 30.0;
pub const DEFAULT_BOOST_MULT: f64 = 2.0;

/// Shop categories in display order.
pub const CATEGORY_ORDER: [&str; 4] = ["clothes", "accessories", "transport", "cosmetics"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Purchase {
    pub new_level: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuyError {
    #[error("no such item")]
    NoItem,
    #[error("item is already at max level")]
    MaxLevel,
    #[error("not enough glow (price {price})")]
    NoMoney { price: f64 },
}

impl BuyError {
    /// Short reason code, as shown in purchase notices.
    pub fn reason(&self) -> &'static str {
        match self {
            BuyError::NoItem => "no_item",
            BuyError::MaxLevel => "max_level",
            BuyError::NoMoney { .. } => "no_money",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoostError {
    #[error("no such item")]
    NoItem,
    #[error("item is not owned")]
    NotOwned,
    #[error("item has no usable boost")]
    NoBoost,
}

/// The price the shop would charge for the next level of `item` right now.
pub fn shop_price(state: &GameState, item: &ItemDef) -> f64 {
    discounted_price(state, item.base_price, state.level_of(&item.key))
}

/// Buy one level of `key`.
pub fn buy_item(state: &mut GameState, catalog: &Catalog, key: &str) -> Result<Purchase, BuyError> {
    let item = catalog.item(key).ok_or(BuyError::NoItem)?;
    let level = state.level_of(key);
    if level >= item.max_level() {
        return Err(BuyError::MaxLevel);
    }
    let price = shop_price(state, item);
    if state.glow < price {
        return Err(BuyError::NoMoney { price });
    }

    state.glow -= price;
    state.spent_glow += price;
    let new_level = level + 1;
    state.inventory.insert(key.to_string(), new_level);
    recalc_derived(state, catalog);
    Ok(Purchase { new_level, price })
}

/// Start the timed boost of an owned cosmetic. Returns the scaled duration.
pub fn activate_boost(
    state: &mut GameState,
    catalog: &Catalog,
    key: &str,
) -> Result<f64, BoostError> {
    let item = catalog.item(key).ok_or(BoostError::NoItem)?;
    if state.level_of(key) == 0 {
        return Err(BoostError::NotOwned);
    }
    let boost = item.boost().ok_or(BoostError::NoBoost)?;
    let effects = match boost.kind {
        BoostKind::MultIncome => EffectDelta::income(boost.mult.unwrap_or(DEFAULT_BOOST_MULT)),
        BoostKind::Unknown => return Err(BoostError::NoBoost),
    };
    let base = boost
        .duration
        .filter(|&d| d > 0.0)
        .unwrap_or(DEFAULT_BOOST_DURATION);
    let duration = scaled_duration(state, base);

    state.active_events.push(ActiveEffect {
        key: format!("boost_{}", item.key),
        name: LocalizedText::new("Буст", "Boost"),
        time_left: duration,
        effects,
    });
    state.stats.boosts_used += 1;
    recalc_derived(state, catalog);
    Ok(duration)
}

/// Categories present in the catalog, in display order.
pub fn categories(catalog: &Catalog) -> Vec<&'static str> {
    CATEGORY_ORDER
        .into_iter()
        .filter(|c| catalog.items.iter().any(|it| it.category == *c))
        .collect()
}

pub fn items_in<'a>(catalog: &'a Catalog, category: &'a str) -> impl Iterator<Item = &'a ItemDef> {
    catalog.items.iter().filter(move |it| it.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glow::catalog::CatalogSources;
    use crate::glow::economy::current_per_click;
    use proptest::prelude::*;

    const ITEMS: &str = r#"{"items":[
        {"key":"clothes_scarf","category":"clothes","basePrice":10,"maxLevel":3,
         "effects":{"perClick":1}},
        {"key":"cosmetics_lipstick","category":"cosmetics","basePrice":5,
         "effects":{"activeBoost":{"type":"multIncome","mult":3,"duration":20}}},
        {"key":"cosmetics_blush","category":"cosmetics","basePrice":5,
         "effects":{"activeBoost":{"type":"multIncome"}}},
        {"key":"cosmetics_glitter","category":"cosmetics","basePrice":5,
         "effects":{"activeBoost":{"type":"teleport"}}}
    ]}"#;

    fn catalog() -> Catalog {
        Catalog::load(
            &CatalogSources {
                items: Some(ITEMS),
                ..CatalogSources::default()
            },
            &CatalogSources::default(),
        )
    }

    #[test]
    fn broke_player_gets_no_money_with_price() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        assert_eq!(
            buy_item(&mut s, &cat, "clothes_scarf"),
            Err(BuyError::NoMoney { price: 10.0 })
        );
        assert_eq!(s.level_of("clothes_scarf"), 0);
    }

    #[test]
    fn successful_purchase_debits_and_levels_up() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        s.glow = 100.0;
        let p = buy_item(&mut s, &cat, "clothes_scarf").unwrap();
        assert_eq!(p, Purchase { new_level: 1, price: 10.0 });
        assert_eq!(s.glow, 90.0);
        assert_eq!(s.spent_glow, 10.0);
        assert_eq!(s.per_click_bonus, 1.0);
        assert_eq!(current_per_click(&s), 2.0);

        // 10 * 1.15 = 11.5 → 12
        let p = buy_item(&mut s, &cat, "clothes_scarf").unwrap();
        assert_eq!(p.price, 12.0);
        assert_eq!(p.new_level, 2);
    }

    #[test]
    fn maxed_item_reports_max_level_even_when_rich() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        s.inventory.insert("clothes_scarf".into(), 3);
        s.glow = 1e12;
        assert_eq!(buy_item(&mut s, &cat, "clothes_scarf"), Err(BuyError::MaxLevel));
        // No maxLevel → single purchase.
        s.inventory.insert("cosmetics_lipstick".into(), 1);
        assert_eq!(
            buy_item(&mut s, &cat, "cosmetics_lipstick"),
            Err(BuyError::MaxLevel)
        );
        assert_eq!(s.glow, 1e12);
    }

    #[test]
    fn discount_applies_to_price() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        s.glow = 100.0;
        s.shop_discount_extra = 0.25;
        let p = buy_item(&mut s, &cat, "clothes_scarf").unwrap();
        // ceil(10 * 0.75) = 8
        assert_eq!(p.price, 8.0);
    }

    #[test]
    fn boost_pushes_income_effect() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        s.inventory.insert("cosmetics_lipstick".into(), 1);
        s.boost_duration_mult = 0.5;
        let dur = activate_boost(&mut s, &cat, "cosmetics_lipstick").unwrap();
        assert_eq!(dur, 30.0);
        assert_eq!(s.stats.boosts_used, 1);
        let fx = &s.active_events[0];
        assert_eq!(fx.key, "boost_cosmetics_lipstick");
        assert_eq!(fx.name.en, "Boost");
        assert_eq!(fx.effects, EffectDelta::income(3.0));
        assert_eq!(current_per_click(&s), 3.0);
    }

    #[test]
    fn boost_defaults_and_stacking() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        s.inventory.insert("cosmetics_blush".into(), 1);
        let dur = activate_boost(&mut s, &cat, "cosmetics_blush").unwrap();
        assert_eq!(dur, DEFAULT_BOOST_DURATION);
        activate_boost(&mut s, &cat, "cosmetics_blush").unwrap();
        assert_eq!(s.active_events.len(), 2);
        assert_eq!(current_per_click(&s), 4.0);
        assert_eq!(s.stats.boosts_used, 2);
    }

    #[test]
    fn boost_requirements() {
        let cat = catalog();
        let mut s = GameState::new(0.0);
        assert_eq!(activate_boost(&mut s, &cat, "nope"), Err(BoostError::NoItem));
        assert_eq!(
            activate_boost(&mut s, &cat, "cosmetics_lipstick"),
            Err(BoostError::NotOwned)
        );
        s.inventory.insert("clothes_scarf".into(), 1);
        assert_eq!(
            activate_boost(&mut s, &cat, "clothes_scarf"),
            Err(BoostError::NoBoost)
        );
        s.inventory.insert("cosmetics_glitter".into(), 1);
        assert_eq!(
            activate_boost(&mut s, &cat, "cosmetics_glitter"),
            Err(BoostError::NoBoost)
        );
        assert_eq!(s.stats.boosts_used, 0);
        assert!(s.active_events.is_empty());
    }

    #[test]
    fn categories_in_fixed_order() {
        assert_eq!(categories(&catalog()), vec!["clothes", "cosmetics"]);
        assert_eq!(
            categories(&Catalog::embedded()),
            vec!["clothes", "accessories", "transport", "cosmetics"]
        );
        assert!(categories(&Catalog::default()).is_empty());
    }

    #[test]
    fn reason_codes() {
        assert_eq!(BuyError::NoItem.reason(), "no_item");
        assert_eq!(BuyError::MaxLevel.reason(), "max_level");
        assert_eq!(BuyError::NoMoney { price: 1.0 }.reason(), "no_money");
    }

    proptest! {
        #[test]
        fn prop_unknown_key_is_no_item(key in "[a-z]{1,12}", glow in 0.0f64..1e9) {
            let cat = catalog();
            let mut s = GameState::new(0.0);
            s.glow = glow;
            prop_assert_eq!(buy_item(&mut s, &cat, &format!("zz_{}", key)), Err(BuyError::NoItem));
        }

        #[test]
        fn prop_maxed_is_max_level(glow in 0.0f64..1e12) {
            let cat = catalog();
            let mut s = GameState::new(0.0);
            s.glow = glow;
            s.inventory.insert("clothes_scarf".into(), 3);
            prop_assert_eq!(buy_item(&mut s, &cat, "clothes_scarf"), Err(BuyError::MaxLevel));
        }

        #[test]
        fn prop_purchase_conserves_glow(glow in 0.0f64..1e6) {
            let cat = catalog();
            let mut s = GameState::new(0.0);
            s.glow = glow;
            if let Ok(p) = buy_item(&mut s, &cat, "clothes_scarf") {
                prop_assert!((s.glow + p.price - glow).abs() < 1e-9);
                prop_assert_eq!(s.spent_glow, p.price);
            } else {
                prop_assert_eq!(s.glow, glow);
            }
        }
    }
}
