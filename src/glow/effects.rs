//! Effect payloads: timed modifiers carried by active effects, and the
//! permanent deltas granted by achievements.

use serde::{Deserialize, Serialize};

/// Payload of a timed effect (random event or activated boost).
///
/// Every field is optional; an absent multiplier is neutral (×1). Multipliers
/// of concurrently active effects combine by product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_click_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_second_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_speed_multiplier: Option<f64>,
    /// Carried for display only; purchase pricing reads `shopDiscountExtra`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_discount: Option<f64>,
}

impl EffectDelta {
    /// Same multiplier on click and passive income.
    pub fn income(mult: f64) -> Self {
        Self {
            per_click_multiplier: Some(mult),
            per_second_multiplier: Some(mult),
            ..Self::default()
        }
    }

    /// Whether the effect helps the player (drives the display colour).
    pub fn is_positive(&self) -> bool {
        let boosts = [
            self.per_click_multiplier,
            self.per_second_multiplier,
            self.trip_speed_multiplier,
        ]
        .into_iter()
        .flatten()
        .any(|m| m > 1.0);
        boosts || self.shop_discount.is_some_and(|d| d > 0.0)
    }
}

/// Multiply one multiplier field across a set of effects. Empty → 1.
pub fn product_of<'a>(
    effects: impl IntoIterator<Item = &'a EffectDelta>,
    field: impl Fn(&EffectDelta) -> Option<f64>,
) -> f64 {
    effects.into_iter().filter_map(field).product()
}

/// Permanent stat deltas granted when an achievement unlocks. All additive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reward {
    pub per_click_add: f64,
    pub per_click_mult: f64,
    pub per_second_add: f64,
    pub per_second_mult: f64,
    pub trip_speed_mult: f64,
    pub event_chance: f64,
    pub boost_duration_mult: f64,
    pub shop_discount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_of_empty_is_neutral() {
        let none: Vec<EffectDelta> = Vec::new();
        assert_eq!(product_of(&none, |e| e.per_click_multiplier), 1.0);
    }

    #[test]
    fn product_of_skips_missing_fields() {
        let effects = vec![
            EffectDelta::income(2.0),
            EffectDelta {
                trip_speed_multiplier: Some(0.5),
                ..EffectDelta::default()
            },
            EffectDelta::income(3.0),
        ];
        assert_eq!(product_of(&effects, |e| e.per_second_multiplier), 6.0);
        assert_eq!(product_of(&effects, |e| e.trip_speed_multiplier), 0.5);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let json = serde_json::to_string(&EffectDelta::income(2.0)).unwrap();
        assert_eq!(json, r#"{"perClickMultiplier":2.0,"perSecondMultiplier":2.0}"#);
    }

    #[test]
    fn slowdown_is_not_positive() {
        let slow = EffectDelta {
            trip_speed_multiplier: Some(0.5),
            ..EffectDelta::default()
        };
        assert!(!slow.is_positive());
        assert!(EffectDelta::income(2.0).is_positive());
    }

    #[test]
    fn reward_parses_partial_json() {
        let r: Reward = serde_json::from_str(r#"{"perClickAdd": 1, "shopDiscount": 0.05}"#).unwrap();
        assert_eq!(r.per_click_add, 1.0);
        assert_eq!(r.shop_discount, 0.05);
        assert_eq!(r.event_chance, 0.0);
    }
}
