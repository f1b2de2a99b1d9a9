//! Semantic action IDs for Glow Trip click targets.
//!
//! These IDs are registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const SHINE: u16 = 0;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_SHOP: u16 = 10;
pub const TAB_ACHIEVEMENTS: u16 = 11;
pub const TAB_SETTINGS: u16 = 12;

// ── Shop category (base + category index) ───────────────────────
pub const CATEGORY_BASE: u16 = 20;

// ── Item purchase / boost (base + index within the category) ────
pub const BUY_ITEM_BASE: u16 = 100;
pub const BOOST_ITEM_BASE: u16 = 200;

// ── Settings ────────────────────────────────────────────────────
pub const TOGGLE_SOUND: u16 = 300;
pub const TOGGLE_ANIMATIONS: u16 = 301;
pub const TOGGLE_CONTRAST: u16 = 302;
pub const TOGGLE_LOCALE: u16 = 303;
pub const SAVE_NOW: u16 = 310;
pub const EXPORT_SAVE: u16 = 311;
pub const IMPORT_SAVE: u16 = 312;
pub const RESET_PROGRESS: u16 = 313;

// ── Achievements list scrolling ─────────────────────────────────
pub const ACH_SCROLL_UP: u16 = 400;
pub const ACH_SCROLL_DOWN: u16 = 401;
