//! Two-language UI text (ru / en).

use serde::{Deserialize, Serialize};

/// Display language. Persisted as `"ru"` / `"en"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub fn toggled(self) -> Self {
        match self {
            Locale::Ru => Locale::En,
            Locale::En => Locale::Ru,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }
}

/// Catalog text in both languages. A missing translation falls back to the other one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub ru: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(ru: &str, en: &str) -> Self {
        Self {
            ru: ru.to_string(),
            en: en.to_string(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        let (primary, other) = match locale {
            Locale::Ru => (&self.ru, &self.en),
            Locale::En => (&self.en, &self.ru),
        };
        if primary.is_empty() {
            other
        } else {
            primary
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ru.is_empty() && self.en.is_empty()
    }
}

/// Fixed UI strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    Title,
    Glow,
    PerClick,
    PerSecond,
    Trip,
    Shine,
    ActiveEffects,
    NoEffects,
    TabShop,
    TabAchievements,
    TabSettings,
    Level,
    Price,
    Buy,
    Maxed,
    ActivateBoost,
    Locked,
    Unlocked,
    Sound,
    Animations,
    HighContrast,
    Language,
    Save,
    Export,
    Import,
    Reset,
    Saved,
    Exported,
    Imported,
    ImportFailed,
    ResetDone,
    ResetConfirm,
    ImportPrompt,
    TripComplete,
    AchievementUnlocked,
    NotEnoughGlow,
    MaxLevel,
    UnknownItem,
    BoostStarted,
    BoostUnavailable,
    Log,
    On,
    Off,
}

/// Look up a UI string.
pub fn text(locale: Locale, msg: Msg) -> &'static str {
    match locale {
        Locale::Ru => ru(msg),
        Locale::En => en(msg),
    }
}

fn ru(msg: Msg) -> &'static str {
    match msg {
        Msg::Title => "Glow Trip — Эда едет к Серкану",
        Msg::Glow => "Сияние",
        Msg::PerClick => "за клик",
        Msg::PerSecond => "в секунду",
        Msg::Trip => "Поездка",
        Msg::Shine => "✦ Сиять ✦",
        Msg::ActiveEffects => "Активные эффекты",
        Msg::NoEffects => "нет активных эффектов",
        Msg::TabShop => "Магазин",
        Msg::TabAchievements => "Достижения",
        Msg::TabSettings => "Настройки",
        Msg::Level => "Ур.",
        Msg::Price => "Цена",
        Msg::Buy => "Купить",
        Msg::Maxed => "Макс.",
        Msg::ActivateBoost => "Активировать буст",
        Msg::Locked => "закрыто",
        Msg::Unlocked => "открыто",
        Msg::Sound => "Звук",
        Msg::Animations => "Анимации",
        Msg::HighContrast => "Высокий контраст",
        Msg::Language => "Язык",
        Msg::Save => "Сохранить",
        Msg::Export => "Экспорт",
        Msg::Import => "Импорт",
        Msg::Reset => "Сбросить прогресс",
        Msg::Saved => "Сохранено ✔",
        Msg::Exported => "Экспорт выведен в консоль",
        Msg::Imported => "Импорт завершён",
        Msg::ImportFailed => "Не удалось импортировать сохранение",
        Msg::ResetDone => "Прогресс сброшен",
        Msg::ResetConfirm => "Сбросить прогресс? Это действие необратимо.",
        Msg::ImportPrompt => "Вставьте JSON сохранения:",
        Msg::TripComplete => "Бонус за поездку",
        Msg::AchievementUnlocked => "Достижение",
        Msg::NotEnoughGlow => "Недостаточно Сияния",
        Msg::MaxLevel => "Максимальный уровень",
        Msg::UnknownItem => "Нет такого предмета",
        Msg::BoostStarted => "Буст активирован",
        Msg::BoostUnavailable => "Буст недоступен",
        Msg::Log => "Журнал",
        Msg::On => "вкл",
        Msg::Off => "выкл",
    }
}

fn en(msg: Msg) -> &'static str {
    match msg {
        Msg::Title => "Glow Trip — Eda rides to Serkan",
        Msg::Glow => "Glow",
        Msg::PerClick => "per click",
        Msg::PerSecond => "per second",
        Msg::Trip => "Trip",
        Msg::Shine => "✦ Shine ✦",
        Msg::ActiveEffects => "Active effects",
        Msg::NoEffects => "no active effects",
        Msg::TabShop => "Shop",
        Msg::TabAchievements => "Achievements",
        Msg::TabSettings => "Settings",
        Msg::Level => "Lv.",
        Msg::Price => "Price",
        Msg::Buy => "Buy",
        Msg::Maxed => "Max",
        Msg::ActivateBoost => "Activate boost",
        Msg::Locked => "locked",
        Msg::Unlocked => "unlocked",
        Msg::Sound => "Sound",
        Msg::Animations => "Animations",
        Msg::HighContrast => "High contrast",
        Msg::Language => "Language",
        Msg::Save => "Save",
        Msg::Export => "Export",
        Msg::Import => "Import",
        Msg::Reset => "Reset progress",
        Msg::Saved => "Saved ✔",
        Msg::Exported => "Export written to the console",
        Msg::Imported => "Import complete",
        Msg::ImportFailed => "Could not import the save",
        Msg::ResetDone => "Progress reset",
        Msg::ResetConfirm => "Reset progress? This cannot be undone.",
        Msg::ImportPrompt => "Paste the save JSON:",
        Msg::TripComplete => "Trip bonus",
        Msg::AchievementUnlocked => "Achievement",
        Msg::NotEnoughGlow => "Not enough Glow",
        Msg::MaxLevel => "Max level",
        Msg::UnknownItem => "No such item",
        Msg::BoostStarted => "Boost activated",
        Msg::BoostUnavailable => "Boost unavailable",
        Msg::Log => "Log",
        Msg::On => "on",
        Msg::Off => "off",
    }
}

/// Compact number formatting (1.50K, 2.00M, 3.10B).
pub fn format_glow(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_glow(-n));
    }
    if n >= 1e9 {
        format!("{:.2}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.2}K", n / 1e3)
    } else if n > 0.0 && n < 10.0 && n.fract() > 0.0 {
        format!("{:.1}", n)
    } else {
        format!("{}", n.floor() as u64)
    }
}
