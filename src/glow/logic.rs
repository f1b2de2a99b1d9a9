//! Glow Trip per-frame update as pure functions.

use super::achievements::check_achievements;
use super::catalog::Catalog;
use super::economy::{current_per_click, current_per_second, current_trip_speed, recalc_derived};
use super::events::{tick_events, ActivatedEvent};
use super::i18n::LocalizedText;
use super::rng::RandomSource;
use super::state::GameState;

/// Seconds of play between autosaves.
pub const AUTOSAVE_INTERVAL_SECS: f64 = 10.0;
/// Smallest trip completion bonus.
pub const TRIP_BONUS_FLOOR: f64 = 5.0;
/// Clicks closer together than this are dropped.
pub const CLICK_DEBOUNCE_MS: f64 = 60.0;

/// Something the presentation layer should tell the player about.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    TripComplete { bonus: f64 },
    EventActivated(ActivatedEvent),
    AchievementUnlocked { key: String, name: LocalizedText },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    pub trip_completed: bool,
    pub event_activated: bool,
    pub unlocked: Vec<String>,
    /// The autosave interval elapsed during this step.
    pub autosave_due: bool,
}

/// Advance the game by `dt` seconds of wall-clock time ending at `now_ms`.
pub fn step(
    state: &mut GameState,
    catalog: &Catalog,
    now_ms: f64,
    dt: f64,
    rng: &mut dyn RandomSource,
    notify: &mut dyn FnMut(Notice),
) -> StepReport {
    let mut report = StepReport::default();
    let dt = dt.max(0.0);

    // Passive income
    state.earn(current_per_second(state) * dt);

    // Trip
    state.trip.progress += current_trip_speed(state) * dt;
    if state.trip.progress >= 1.0 {
        let bonus = finish_trip(state, catalog, now_ms);
        report.trip_completed = true;
        notify(Notice::TripComplete { bonus });
        report
            .unlocked
            .extend(unlock_with_notice(state, catalog, now_ms, notify));
    }

    // Events
    let mut activated = None;
    tick_events(state, catalog, dt, rng, |ev| activated = Some(ev.clone()));
    if let Some(ev) = activated {
        report.event_activated = true;
        notify(Notice::EventActivated(ev));
        report
            .unlocked
            .extend(unlock_with_notice(state, catalog, now_ms, notify));
    }

    recalc_derived(state, catalog);

    state.run.save_timer += dt;
    if state.run.save_timer >= AUTOSAVE_INTERVAL_SECS {
        state.run.save_timer = 0.0;
        report.autosave_due = true;
    }
    report
}

/// Trip completion bonus at the current production rates.
pub fn trip_bonus(state: &GameState) -> f64 {
    let raw = 5.0 * (current_per_second(state) * 20.0 + current_per_click(state) * 5.0);
    raw.floor().max(TRIP_BONUS_FLOOR)
}

/// Close out the current trip and start the next one. Returns the bonus paid.
fn finish_trip(state: &mut GameState, catalog: &Catalog, now_ms: f64) -> f64 {
    state.trip.progress = 0.0;
    state.trip.last_duration = Some((now_ms - state.trip.started_at) / 1000.0);
    state.trip.started_at = now_ms;

    let bonus = trip_bonus(state);
    state.earn(bonus);

    // An event whose achievement is still locked wins over one already earned.
    let watchers: Vec<(&str, &str)> = catalog.trip_watchers().collect();
    let tagged = |key: &str| watchers.iter().any(|(ev, _)| *ev == key);
    let pending = |key: &str| {
        watchers
            .iter()
            .any(|(ev, ach)| *ev == key && !state.is_unlocked(ach))
    };
    let active = || state.active_events.iter().map(|e| e.key.as_str());
    let during = active()
        .find(|k| pending(k))
        .or_else(|| active().find(|k| tagged(k)))
        .map(str::to_string);
    state.trip.last_finish_during_event = during;
    state.stats.trips_completed += 1;
    bonus
}

/// Run an achievement pass, forwarding each unlock as a notice.
pub fn unlock_with_notice(
    state: &mut GameState,
    catalog: &Catalog,
    now_ms: f64,
    notify: &mut dyn FnMut(Notice),
) -> Vec<String> {
    check_achievements(state, catalog, now_ms, |a| {
        notify(Notice::AchievementUnlocked {
            key: a.key.clone(),
            name: a.name.clone(),
        })
    })
}

/// A manual click. Returns the glow earned, or `None` when debounced.
pub fn click(state: &mut GameState, now_ms: f64) -> Option<f64> {
    if let Some(last) = state.run.last_click_at {
        if now_ms - last < CLICK_DEBOUNCE_MS && now_ms >= last {
            return None;
        }
    }
    state.run.last_click_at = Some(now_ms);
    let amount = current_per_click(state);
    state.earn(amount);
    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glow::catalog::CatalogSources;
    use crate::glow::rng::{Lcg, Scripted};
    use crate::glow::state::ActiveEffect;
    use proptest::prelude::*;

    fn quiet() -> Scripted {
        // Never passes an event roll.
        Scripted::new(&[0.999_999])
    }

    fn run_step(state: &mut GameState, catalog: &Catalog, now_ms: f64, dt: f64) -> (StepReport, Vec<Notice>) {
        let mut notices = Vec::new();
        let report = step(state, catalog, now_ms, dt, &mut quiet(), &mut |n| notices.push(n));
        (report, notices)
    }

    #[test]
    fn passive_income_accrues() {
        let cat = Catalog::default();
        let mut s = GameState::new(0.0);
        s.per_second_base = 4.0;
        run_step(&mut s, &cat, 0.0, 0.25);
        assert!((s.glow - 1.0).abs() < 1e-12);
        assert!((s.total_glow_earned - 1.0).abs() < 1e-12);
    }

    #[test]
    fn trip_completes_and_pays_bonus() {
        let cat = Catalog::default();
        let mut s = GameState::new(1_000.0);
        s.trip.progress = 0.99;
        s.trip.speed_base = 0.02;
        let (report, notices) = run_step(&mut s, &cat, 31_000.0, 1.0);

        assert!(report.trip_completed);
        assert_eq!(s.trip.progress, 0.0);
        assert_eq!(s.stats.trips_completed, 1);
        assert_eq!(s.trip.last_duration, Some(30.0));
        assert_eq!(s.trip.started_at, 31_000.0);
        // perClick 1, perSecond 0 → floor(5 * 5) = 25
        assert!(s.glow >= TRIP_BONUS_FLOOR);
        assert_eq!(s.glow, 25.0);
        assert_eq!(notices, vec![Notice::TripComplete { bonus: 25.0 }]);
    }

    #[test]
    fn trip_bonus_has_floor() {
        let mut s = GameState::new(0.0);
        s.per_click_base = 0.0;
        assert_eq!(trip_bonus(&s), TRIP_BONUS_FLOOR);
        s.per_click_base = 1.0;
        s.per_second_base = 2.0;
        // 5 * (40 + 5)
        assert_eq!(trip_bonus(&s), 225.0);
    }

    #[test]
    fn trip_tagged_with_watched_event() {
        let cat = Catalog::embedded();
        let mut s = GameState::new(0.0);
        s.trip.progress = 0.999;
        s.active_events.push(ActiveEffect {
            key: "sunset".into(),
            time_left: 100.0,
            ..ActiveEffect::default()
        });
        s.active_events.push(ActiveEffect {
            key: "rain".into(),
            time_left: 100.0,
            ..ActiveEffect::default()
        });
        let (_, notices) = run_step(&mut s, &cat, 5_000.0, 0.25);
        assert_eq!(s.trip.last_finish_during_event.as_deref(), Some("rain"));
        assert!(s.is_unlocked("singing_in_the_rain"));
        assert!(notices.iter().any(|n| matches!(
            n,
            Notice::AchievementUnlocked { key, .. } if key == "singing_in_the_rain"
        )));
    }

    #[test]
    fn trip_tag_cleared_without_event() {
        let cat = Catalog::embedded();
        let mut s = GameState::new(0.0);
        s.trip.last_finish_during_event = Some("rain".into());
        s.trip.progress = 0.999;
        run_step(&mut s, &cat, 0.0, 0.25);
        assert_eq!(s.trip.last_finish_during_event, None);
    }

    #[test]
    fn event_activation_is_reported_and_counted() {
        let cat = Catalog::embedded();
        let mut s = GameState::new(0.0);
        let mut notices = Vec::new();
        let report = step(
            &mut s,
            &cat,
            0.0,
            0.25,
            &mut Scripted::new(&[0.0, 0.0]),
            &mut |n| notices.push(n),
        );
        assert!(report.event_activated);
        assert_eq!(s.stats.events_activated, 1);
        assert!(matches!(notices[0], Notice::EventActivated(_)));
    }

    #[test]
    fn fifth_event_unlocks_lucky() {
        let cat = Catalog::embedded();
        let mut s = GameState::new(0.0);
        let mut rng = Scripted::new(&[0.0]);
        let mut notices = Vec::new();
        for i in 0..5 {
            let report = step(&mut s, &cat, i as f64 * 250.0, 0.25, &mut rng, &mut |n| notices.push(n));
            assert!(report.event_activated);
        }
        assert_eq!(s.stats.events_activated, 5);
        assert!(s.is_unlocked("lucky"));
        assert!((s.event_chance_bonus - 0.002).abs() < 1e-12);
        assert!(notices.iter().any(|n| matches!(
            n,
            Notice::AchievementUnlocked { key, .. } if key == "lucky"
        )));
    }

    #[test]
    fn trip_tag_prefers_event_with_locked_achievement() {
        let primary = CatalogSources {
            achievements: Some(
                r#"{"achievements":[
                    {"key":"rain_ride","condition":{"type":"tripDuringEvent","eventKey":"rain"}},
                    {"key":"sunset_ride","condition":{"type":"tripDuringEvent","eventKey":"sunset"}}
                ]}"#,
            ),
            ..CatalogSources::default()
        };
        let cat = Catalog::load(&primary, &CatalogSources::embedded());
        let mut s = GameState::new(0.0);
        s.achievements
            .insert("rain_ride".into(), crate::glow::state::Unlock { unlocked_at: 0.0 });
        for key in ["rain", "sunset"] {
            s.active_events.push(ActiveEffect {
                key: key.into(),
                time_left: 100.0,
                ..ActiveEffect::default()
            });
        }
        s.trip.progress = 0.999;
        run_step(&mut s, &cat, 5_000.0, 0.25);
        assert_eq!(s.trip.last_finish_during_event.as_deref(), Some("sunset"));
        assert!(s.is_unlocked("sunset_ride"));
    }

    #[test]
    fn autosave_every_ten_seconds() {
        let cat = Catalog::default();
        let mut s = GameState::new(0.0);
        let mut due = 0;
        for _ in 0..80 {
            if run_step(&mut s, &cat, 0.0, 0.25).0.autosave_due {
                due += 1;
            }
        }
        // 80 × 0.25 s = 20 s
        assert_eq!(due, 2);
        assert!(s.run.save_timer < AUTOSAVE_INTERVAL_SECS);
    }

    #[test]
    fn step_recalculates_inventory_bonuses() {
        let cat = Catalog::embedded();
        let mut s = GameState::new(0.0);
        s.inventory.insert("clothes_coat".into(), 2);
        run_step(&mut s, &cat, 0.0, 0.0);
        assert_eq!(s.per_second_bonus, 1.0);
    }

    #[test]
    fn click_is_debounced() {
        let mut s = GameState::new(0.0);
        assert_eq!(click(&mut s, 1_000.0), Some(1.0));
        assert_eq!(click(&mut s, 1_030.0), None);
        assert_eq!(click(&mut s, 1_060.0), Some(1.0));
        assert_eq!(s.glow, 2.0);
        assert_eq!(s.total_glow_earned, 2.0);
    }

    #[test]
    fn click_after_clock_jump_back_counts() {
        let mut s = GameState::new(0.0);
        click(&mut s, 10_000.0);
        assert!(click(&mut s, 500.0).is_some());
    }

    #[test]
    fn long_session_stays_consistent() {
        let cat = Catalog::embedded();
        let mut s = GameState::new(0.0);
        s.per_second_base = 3.0;
        let mut rng = Lcg::new(99);
        let mut now = 0.0;
        for _ in 0..4_000 {
            now += 250.0;
            step(&mut s, &cat, now, 0.25, &mut rng, &mut |_| {});
            assert!(s.trip.progress >= 0.0 && s.trip.progress < 1.0);
            assert!(s.active_events.iter().all(|e| e.time_left > 0.0));
            assert!(s.cooldowns.values().all(|&c| c > 0.0));
        }
        assert!(s.stats.trips_completed > 0);
        assert!(s.total_glow_earned >= s.glow);
    }

    #[test]
    fn empty_catalog_still_plays() {
        let cat = Catalog::load(&CatalogSources::default(), &CatalogSources::default());
        let mut s = GameState::new(0.0);
        let mut rng = Lcg::new(3);
        for i in 0..200 {
            step(&mut s, &cat, i as f64 * 250.0, 0.25, &mut rng, &mut |_| {});
        }
        assert!(s.stats.trips_completed > 0);
        assert_eq!(s.stats.events_activated, 0);
    }

    proptest! {
        #[test]
        fn prop_income_independent_of_step_size(
            rate in 0.0f64..1000.0,
            steps in prop::collection::vec(0.0f64..0.25, 1..60),
        ) {
            let cat = Catalog::default();
            let total: f64 = steps.iter().sum();

            let mut fine = GameState::new(0.0);
            fine.per_second_base = rate;
            fine.trip.speed_base = 0.0;
            for dt in &steps {
                step(&mut fine, &cat, 0.0, *dt, &mut quiet(), &mut |_| {});
            }

            let mut coarse = GameState::new(0.0);
            coarse.per_second_base = rate;
            coarse.trip.speed_base = 0.0;
            step(&mut coarse, &cat, 0.0, total, &mut quiet(), &mut |_| {});

            let expected = rate * total;
            prop_assert!((fine.glow - expected).abs() < 1e-6 * expected.max(1.0));
            prop_assert!((coarse.glow - expected).abs() < 1e-6 * expected.max(1.0));
        }

        #[test]
        fn prop_trip_progress_stays_below_one(
            speed in 0.0f64..3.0,
            dts in prop::collection::vec(0.0f64..0.25, 1..100),
        ) {
            let cat = Catalog::default();
            let mut s = GameState::new(0.0);
            s.trip.speed_base = speed;
            for dt in dts {
                step(&mut s, &cat, 0.0, dt, &mut quiet(), &mut |_| {});
                prop_assert!(s.trip.progress < 1.0);
            }
        }
    }
}
