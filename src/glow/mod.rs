//! Glow Trip: an incremental game about Eda's rides to Serkan.
//!
//! [`GlowTrip`] is the host: it owns the state, catalog, storage and clock,
//! turns input into engine calls, and turns engine notices into log lines.

pub mod achievements;
pub mod actions;
pub mod catalog;
pub mod economy;
pub mod effects;
pub mod events;
pub mod i18n;
pub mod logic;
pub mod render;
pub mod rng;
pub mod save;
pub mod state;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::FrameClock;

use catalog::{Catalog, ItemDef};
use i18n::{format_glow, text, Msg};
use logic::Notice;
use rng::Lcg;
use save::{KeyValueStore, SaveStatus};
use state::{GameState, Run};
use store::BuyError;

const LOG_PREFIX: &str = "Glow Trip";
const MAX_LOG: usize = 50;
/// Frames the shine button stays highlighted after a click.
const CLICK_FLASH_FRAMES: u32 = 8;

/// Hotkeys for the first shop slots; later items are click-only. Shifted letters activate boosts.
pub const ITEM_KEYS: [char; 8] = ['q', 'w', 'e', 'r', 't', 'y', 'u', 'i'];

pub(crate) fn log_info(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&format!("{LOG_PREFIX}: {msg}").into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (LOG_PREFIX, msg);
}

pub(crate) fn log_warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&format!("{LOG_PREFIX}: {msg}").into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (LOG_PREFIX, msg);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Shop,
    Achievements,
    Settings,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Things only the browser can do: ask, confirm, hand over text.
#[derive(Clone, Debug, PartialEq)]
pub enum HostRequest {
    PromptImport,
    ConfirmReset,
    Exported(String),
}

pub struct GlowTrip {
    pub state: GameState,
    pub catalog: Catalog,
    pub tab: Tab,
    /// Index into [`store::categories`].
    pub category: usize,
    pub ach_scroll: u16,
    pub log: Vec<LogEntry>,
    pub click_flash: u32,
    /// Result of the latest write, if any.
    pub last_save: Option<SaveStatus>,
    store: Box<dyn KeyValueStore>,
    rng: Lcg,
    clock: FrameClock,
}

impl GlowTrip {
    /// Load the saved game from `store` (or start fresh).
    pub fn new(catalog: Catalog, mut store: Box<dyn KeyValueStore>, now_ms: f64, seed: u64) -> Self {
        let mut state = save::load_state(store.as_mut(), now_ms);
        economy::recalc_derived(&mut state, &catalog);
        Self {
            state,
            catalog,
            tab: Tab::Shop,
            category: 0,
            ach_scroll: 0,
            log: Vec::new(),
            click_flash: 0,
            last_save: None,
            store,
            rng: Lcg::new(seed),
            clock: FrameClock::new(),
        }
    }

    fn t(&self, msg: Msg) -> &'static str {
        text(self.state.settings.locale, msg)
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Latest log line, shown as the toast.
    pub fn toast(&self) -> Option<&LogEntry> {
        self.log.last()
    }

    // ── Frame ──────────────────────────────────────────────────

    /// One animation frame at wall-clock `now_ms`.
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.delta(now_ms);
        self.state.run.last_tick = self.clock.last();
        self.click_flash = self.click_flash.saturating_sub(1);

        let mut notices = Vec::new();
        let report = logic::step(
            &mut self.state,
            &self.catalog,
            now_ms,
            dt,
            &mut self.rng,
            &mut |n: Notice| notices.push(n),
        );
        for n in notices {
            self.announce(n);
        }
        if report.autosave_due {
            self.persist();
        }
    }

    fn announce(&mut self, notice: Notice) {
        let locale = self.state.settings.locale;
        let (line, important) = match notice {
            Notice::TripComplete { bonus } => (
                format!("{}: +{}", self.t(Msg::TripComplete), format_glow(bonus)),
                false,
            ),
            Notice::EventActivated(ev) => {
                let name = if ev.name.is_empty() {
                    ev.key.clone()
                } else {
                    ev.name.get(locale).to_string()
                };
                (format!("✦ {} ({}s)", name, ev.duration.round()), true)
            }
            Notice::AchievementUnlocked { key, name } => {
                let name = if name.is_empty() {
                    key
                } else {
                    name.get(locale).to_string()
                };
                (format!("★ {}: {}", self.t(Msg::AchievementUnlocked), name), true)
            }
        };
        self.add_log(&line, important);
    }

    fn check_unlocks(&mut self, now_ms: f64) {
        let mut notices = Vec::new();
        logic::unlock_with_notice(&mut self.state, &self.catalog, now_ms, &mut |n: Notice| {
            notices.push(n)
        });
        for n in notices {
            self.announce(n);
        }
    }

    // ── Actions ────────────────────────────────────────────────

    pub fn shine(&mut self, now_ms: f64) {
        if logic::click(&mut self.state, now_ms).is_some() {
            self.click_flash = CLICK_FLASH_FRAMES;
        }
    }

    pub fn categories(&self) -> Vec<&'static str> {
        store::categories(&self.catalog)
    }

    /// Items of the selected shop category, in catalog order.
    pub fn visible_items(&self) -> Vec<&ItemDef> {
        match self.categories().get(self.category) {
            Some(cat) => store::items_in(&self.catalog, cat).collect(),
            None => Vec::new(),
        }
    }

    fn item_key_at(&self, idx: usize) -> Option<String> {
        self.visible_items().get(idx).map(|it| it.key.clone())
    }

    pub fn select_category(&mut self, idx: usize) {
        if idx < self.categories().len() {
            self.category = idx;
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        let n = self.categories().len();
        if n == 0 {
            return;
        }
        self.category = if forward {
            (self.category + 1) % n
        } else {
            (self.category + n - 1) % n
        };
    }

    /// Buy the item in slot `idx` of the selected category.
    pub fn buy(&mut self, idx: usize, now_ms: f64) {
        let Some(key) = self.item_key_at(idx) else {
            return;
        };
        match store::buy_item(&mut self.state, &self.catalog, &key) {
            Ok(p) => {
                let locale = self.state.settings.locale;
                let name = self
                    .catalog
                    .item(&key)
                    .map(|it| it.name.get(locale).to_string())
                    .unwrap_or_else(|| key.clone());
                let line = format!(
                    "{} {} → {} {} (-{})",
                    self.t(Msg::Buy),
                    name,
                    self.t(Msg::Level),
                    p.new_level,
                    format_glow(p.price)
                );
                self.add_log(&line, false);
                self.check_unlocks(now_ms);
                self.persist();
            }
            Err(e) => self.report_buy_error(&e),
        }
    }

    fn report_buy_error(&mut self, err: &BuyError) {
        log_info(&format!("purchase refused: {}", err.reason()));
        let line = match err {
            BuyError::NoMoney { price } => {
                format!("{}: {}", self.t(Msg::NotEnoughGlow), format_glow(*price))
            }
            BuyError::MaxLevel => self.t(Msg::MaxLevel).to_string(),
            BuyError::NoItem => self.t(Msg::UnknownItem).to_string(),
        };
        self.add_log(&line, false);
    }

    /// Activate the boost of the item in slot `idx`.
    pub fn boost(&mut self, idx: usize, now_ms: f64) {
        let Some(key) = self.item_key_at(idx) else {
            return;
        };
        match store::activate_boost(&mut self.state, &self.catalog, &key) {
            Ok(duration) => {
                let line = format!("⚡ {} ({}s)", self.t(Msg::BoostStarted), duration.round());
                self.add_log(&line, true);
                self.check_unlocks(now_ms);
                self.persist();
            }
            Err(e) => {
                log_info(&format!("boost {key} refused: {e}"));
                let line = self.t(Msg::BoostUnavailable).to_string();
                self.add_log(&line, false);
            }
        }
    }

    // ── Persistence ────────────────────────────────────────────

    /// Best-effort write of the current state.
    pub fn persist(&mut self) {
        let mut status = None;
        save::save_state(
            self.store.as_mut(),
            &self.state,
            Some(&mut |st: SaveStatus| status = Some(st)),
        );
        self.last_save = status;
    }

    fn save_now(&mut self) {
        self.persist();
        if self.last_save == Some(SaveStatus::Saved) {
            let line = self.t(Msg::Saved).to_string();
            self.add_log(&line, false);
        }
    }

    pub fn export(&mut self) -> Option<String> {
        match save::export_state(&self.state) {
            Ok(json) => {
                let line = self.t(Msg::Exported).to_string();
                self.add_log(&line, false);
                Some(json)
            }
            Err(e) => {
                log_warn(&format!("export failed: {e}"));
                None
            }
        }
    }

    /// Replace the game with an imported snapshot. Returns whether it took.
    pub fn import_json(&mut self, json: &str, now_ms: f64) -> bool {
        match save::import_state(json, now_ms) {
            Ok(mut state) => {
                state.run = Run::default();
                economy::recalc_derived(&mut state, &self.catalog);
                self.state = state;
                self.clock.restart();
                let line = self.t(Msg::Imported).to_string();
                self.add_log(&line, true);
                self.persist();
                true
            }
            Err(e) => {
                log_warn(&format!("import failed: {e}"));
                let line = self.t(Msg::ImportFailed).to_string();
                self.add_log(&line, true);
                false
            }
        }
    }

    /// Wipe progress. Settings survive.
    pub fn reset(&mut self, now_ms: f64) {
        let settings = self.state.settings.clone();
        self.state = save::reset_state(now_ms);
        self.state.settings = settings;
        economy::recalc_derived(&mut self.state, &self.catalog);
        self.clock.restart();
        self.log.clear();
        let line = self.t(Msg::ResetDone).to_string();
        self.add_log(&line, true);
        self.persist();
    }

    // ── Input ──────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> Option<HostRequest> {
        match event {
            InputEvent::Key(c) => self.handle_key(*c, now_ms),
            InputEvent::Click(id) => self.handle_click(*id, now_ms),
        }
    }

    fn handle_key(&mut self, key: char, now_ms: f64) -> Option<HostRequest> {
        match key {
            ' ' | '\n' | 'c' => self.shine(now_ms),
            '1' => self.tab = Tab::Shop,
            '2' => self.tab = Tab::Achievements,
            '3' => self.tab = Tab::Settings,
            _ => match self.tab {
                Tab::Shop => self.handle_shop_key(key, now_ms),
                Tab::Achievements => match key {
                    'k' => self.ach_scroll = self.ach_scroll.saturating_sub(1),
                    'j' => self.ach_scroll = self.ach_scroll.saturating_add(1),
                    _ => {}
                },
                Tab::Settings => return self.handle_settings_key(key),
            },
        }
        None
    }

    fn handle_shop_key(&mut self, key: char, now_ms: f64) {
        if key == '<' || key == '>' {
            self.cycle_category(key == '>');
        } else if let Some(idx) = ITEM_KEYS.iter().position(|&k| k == key) {
            self.buy(idx, now_ms);
        } else if let Some(idx) = ITEM_KEYS
            .iter()
            .position(|&k| k.to_ascii_uppercase() == key)
        {
            self.boost(idx, now_ms);
        }
    }

    fn handle_settings_key(&mut self, key: char) -> Option<HostRequest> {
        let action = match key {
            'm' => actions::TOGGLE_SOUND,
            'v' => actions::TOGGLE_ANIMATIONS,
            'h' => actions::TOGGLE_CONTRAST,
            'l' => actions::TOGGLE_LOCALE,
            's' => actions::SAVE_NOW,
            'x' => actions::EXPORT_SAVE,
            'i' => actions::IMPORT_SAVE,
            'r' => actions::RESET_PROGRESS,
            _ => return None,
        };
        self.settings_action(action)
    }

    fn handle_click(&mut self, id: u16, now_ms: f64) -> Option<HostRequest> {
        match id {
            actions::SHINE => self.shine(now_ms),
            actions::TAB_SHOP => self.tab = Tab::Shop,
            actions::TAB_ACHIEVEMENTS => self.tab = Tab::Achievements,
            actions::TAB_SETTINGS => self.tab = Tab::Settings,
            actions::ACH_SCROLL_UP => self.ach_scroll = self.ach_scroll.saturating_sub(1),
            actions::ACH_SCROLL_DOWN => self.ach_scroll = self.ach_scroll.saturating_add(1),
            id if (actions::CATEGORY_BASE..actions::BUY_ITEM_BASE).contains(&id) => {
                self.select_category((id - actions::CATEGORY_BASE) as usize)
            }
            id if (actions::BUY_ITEM_BASE..actions::BOOST_ITEM_BASE).contains(&id) => {
                self.buy((id - actions::BUY_ITEM_BASE) as usize, now_ms)
            }
            id if (actions::BOOST_ITEM_BASE..actions::TOGGLE_SOUND).contains(&id) => {
                self.boost((id - actions::BOOST_ITEM_BASE) as usize, now_ms)
            }
            id => return self.settings_action(id),
        }
        None
    }

    fn settings_action(&mut self, id: u16) -> Option<HostRequest> {
        let settings = &mut self.state.settings;
        match id {
            actions::TOGGLE_SOUND => settings.sound = !settings.sound,
            actions::TOGGLE_ANIMATIONS => settings.animations = !settings.animations,
            actions::TOGGLE_CONTRAST => settings.high_contrast = !settings.high_contrast,
            actions::TOGGLE_LOCALE => settings.locale = settings.locale.toggled(),
            actions::SAVE_NOW => {
                self.save_now();
                return None;
            }
            actions::EXPORT_SAVE => return self.export().map(HostRequest::Exported),
            actions::IMPORT_SAVE => return Some(HostRequest::PromptImport),
            actions::RESET_PROGRESS => return Some(HostRequest::ConfirmReset),
            _ => return None,
        }
        // Settings changes are saved right away.
        self.persist();
        None
    }

    // ── Render ─────────────────────────────────────────────────

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }

    #[cfg(test)]
    fn stored(&self) -> Option<String> {
        self.store.get(save::SAVE_KEY).ok().flatten()
    }
}
