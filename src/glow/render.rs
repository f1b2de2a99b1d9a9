//! Glow Trip rendering: header with the trip meter, active effects, toast,
//! tabbed shop / achievements / settings, and the log panel.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{progress_bar, ClickableList, TabBar};

use super::actions::*;
use super::catalog::ItemDef;
use super::economy::{current_per_click, current_per_second};
use super::i18n::{format_glow, text, Locale, Msg};
use super::save::SaveStatus;
use super::state::{GameState, Settings};
use super::store::shop_price;
use super::{GlowTrip, Tab, ITEM_KEYS};

/// Shimmer frames for the trip meter head.
const SHIMMER: &[char] = &['✦', '✧', '·', '✧'];

/// Colours for one settings combination.
struct Palette {
    accent: Color,
    text: Color,
    dim: Color,
    good: Color,
    bad: Color,
    border: Color,
}

impl Palette {
    fn new(settings: &Settings) -> Self {
        if settings.high_contrast {
            Self {
                accent: Color::LightYellow,
                text: Color::White,
                dim: Color::Gray,
                good: Color::LightGreen,
                bad: Color::LightRed,
                border: Color::White,
            }
        } else {
            Self {
                accent: Color::Yellow,
                text: Color::White,
                dim: Color::DarkGray,
                good: Color::Green,
                bad: Color::Red,
                border: Color::Magenta,
            }
        }
    }
}

pub fn render(game: &GlowTrip, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let pal = Palette::new(&game.state.settings);

    // Log panel on the right when wide enough (>= 80 cols)
    let (main_area, log_area) = if area.width >= 80 {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    } else {
        (area, None)
    };

    let effects_height = (game.state.active_events.len() as u16).clamp(1, 4);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(effects_height),
            Constraint::Length(1), // toast
            Constraint::Length(1), // tab bar
            Constraint::Min(5),
        ])
        .split(main_area);

    render_header(game, &pal, f, chunks[0], click_state);
    render_effects(&game.state, &pal, f, chunks[1]);
    render_toast(game, &pal, f, chunks[2]);
    render_tab_bar(game, &pal, f, chunks[3], click_state);
    match game.tab {
        Tab::Shop => render_shop(game, &pal, f, chunks[4], click_state),
        Tab::Achievements => render_achievements(game, &pal, f, chunks[4], click_state),
        Tab::Settings => render_settings(game, &pal, f, chunks[4], click_state),
    }

    if let Some(log_area) = log_area {
        render_log(game, &pal, f, log_area);
    }
}

/// Glow counter, rates, and the trip meter. The whole block is the shine button.
fn render_header(
    game: &GlowTrip,
    pal: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = &game.state;
    let locale = state.settings.locale;
    let animate = state.settings.animations;
    let flashing = animate && game.click_flash > 0;

    let shine_style = if flashing {
        Style::default()
            .fg(pal.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)
    };
    let shine_label = format!("[c] {}", text(locale, Msg::Shine));

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            format!(" ✨ {} {}  ", format_glow(state.glow.floor()), text(locale, Msg::Glow)),
            Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(shine_label, shine_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled(
            format!(" +{} {}", format_glow(current_per_click(state)), text(locale, Msg::PerClick)),
            Style::default().fg(pal.text),
        ),
        Span::styled("  ·  ", Style::default().fg(pal.dim)),
        Span::styled(
            format!("+{} {}", format_glow(current_per_second(state)), text(locale, Msg::PerSecond)),
            Style::default().fg(pal.text),
        ),
    ]));

    // Trip meter
    let label = format!(" {} ", text(locale, Msg::Trip));
    let pct = format!(" {:>3}%", (state.trip.progress * 100.0).floor() as u32);
    let bar_width = (area.width as usize)
        .saturating_sub(2 + label.chars().count() + pct.len() + 1)
        .max(4);
    let head = if animate {
        SHIMMER[(state.trip.progress * 40.0) as usize % SHIMMER.len()]
    } else {
        ' '
    };
    lines.push(Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(progress_bar(state.trip.progress, bar_width), Style::default().fg(Color::Cyan)),
        Span::styled(head.to_string(), Style::default().fg(pal.accent)),
        Span::styled(pct, Style::default().fg(pal.dim)),
    ]));

    let border_color = if flashing { pal.accent } else { pal.border };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", text(locale, Msg::Title))),
    );
    f.render_widget(widget, area);

    click_state.borrow_mut().add_click_target(area, SHINE);
}

/// One row per active effect, green when it helps and red when it hurts.
fn render_effects(state: &GameState, pal: &Palette, f: &mut Frame, area: Rect) {
    let locale = state.settings.locale;
    let mut lines: Vec<Line> = Vec::new();

    if state.active_events.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}: {}", text(locale, Msg::ActiveEffects), text(locale, Msg::NoEffects)),
            Style::default().fg(pal.dim),
        )));
    }
    for effect in state.active_events.iter().take(area.height as usize) {
        let color = if effect.effects.is_positive() { pal.good } else { pal.bad };
        let name = if effect.name.is_empty() {
            effect.key.as_str()
        } else {
            effect.name.get(locale)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" ◆ {}", name), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}s", effect.time_left.ceil().max(0.0) as u64),
                Style::default().fg(pal.dim),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

/// The newest log line.
fn render_toast(game: &GlowTrip, pal: &Palette, f: &mut Frame, area: Rect) {
    let line = match game.toast() {
        Some(entry) => {
            let style = if entry.is_important {
                Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(pal.text)
            };
            Line::from(Span::styled(format!(" » {}", entry.text), style))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_tab_bar(
    game: &GlowTrip,
    pal: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let locale = game.state.settings.locale;
    let tab_style = |tab: Tab| -> Style {
        if tab == game.tab {
            Style::default()
                .fg(Color::Black)
                .bg(pal.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(pal.accent)
        }
    };
    let unlocked = game.state.achievements.len();
    let total = game.catalog.achievements.len();

    let mut cs = click_state.borrow_mut();
    TabBar::new(" │ ")
        .tab(format!("1 {}", text(locale, Msg::TabShop)), tab_style(Tab::Shop), TAB_SHOP)
        .tab(
            format!("2 {} {}/{}", text(locale, Msg::TabAchievements), unlocked, total),
            tab_style(Tab::Achievements),
            TAB_ACHIEVEMENTS,
        )
        .tab(
            format!("3 {}", text(locale, Msg::TabSettings)),
            tab_style(Tab::Settings),
            TAB_SETTINGS,
        )
        .render(f, area, &mut cs);
}

// ── Shop ───────────────────────────────────────────────────────

fn render_shop(
    game: &GlowTrip,
    pal: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let locale = game.state.settings.locale;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    // Category bar
    let mut cs = click_state.borrow_mut();
    let mut bar = TabBar::new("·");
    for (i, cat) in game.categories().iter().enumerate() {
        let style = if i == game.category {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(pal.dim)
        };
        bar = bar.tab(category_label(cat, locale), style, CATEGORY_BASE + i as u16);
    }
    bar.render(f, chunks[0], &mut cs);

    let list_area = chunks[1];
    let inner_width = list_area.width.saturating_sub(2);
    let items = game.visible_items();

    let mut cl = build_shop_list(game, pal, &items, true);
    // Drop the descriptions when the full list would not fit.
    if is_narrow_layout(area.width) || cl.visual_height(inner_width) > list_area.height.saturating_sub(2) {
        cl = build_shop_list(game, pal, &items, false);
    }
    cl.register_targets(list_area, &mut cs, 1, 1, 0, inner_width);

    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.border))
                .title(format!(" {} ‹ › ", text(locale, Msg::TabShop))),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, list_area);
}

fn build_shop_list<'a>(
    game: &GlowTrip,
    pal: &Palette,
    items: &[&ItemDef],
    with_desc: bool,
) -> ClickableList<'a> {
    let state = &game.state;
    let locale = state.settings.locale;
    let mut cl = ClickableList::new();

    for (i, item) in items.iter().enumerate() {
        let hotkey = ITEM_KEYS.get(i).copied();
        let level = state.level_of(&item.key);
        let maxed = level >= item.max_level();
        let price = shop_price(state, item);
        let affordable = !maxed && state.glow >= price;

        let key_style = if affordable {
            Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(pal.dim)
        };
        let name_style = if affordable || level > 0 {
            Style::default().fg(pal.text)
        } else {
            Style::default().fg(pal.dim)
        };
        let price_span = if maxed {
            Span::styled(text(locale, Msg::Maxed), Style::default().fg(pal.good))
        } else {
            Span::styled(
                format!("{} {}✦", text(locale, Msg::Price), format_glow(price)),
                if affordable { Style::default().fg(pal.good) } else { Style::default().fg(pal.bad) },
            )
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    hotkey.map_or_else(|| "    ".to_string(), |k| format!("[{}] ", k)),
                    key_style,
                ),
                Span::styled(format!("{} ", item.name.get(locale)), name_style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{} {}/{}  ", text(locale, Msg::Level), level, item.max_level()),
                    Style::default().fg(pal.dim),
                ),
                price_span,
            ]),
            BUY_ITEM_BASE + i as u16,
        );

        if with_desc {
            let mut desc = format!("    {}", item.desc.get(locale));
            let summary = effect_summary(item, locale);
            if !summary.is_empty() {
                desc.push_str(&format!(" ({})", summary));
            }
            cl.push(Line::from(Span::styled(desc, Style::default().fg(pal.dim))));
        }

        if let Some(boost) = item.boost().filter(|_| level > 0) {
            let shift = hotkey.map_or_else(String::new, |k| format!("[{}] ", k.to_ascii_uppercase()));
            let mult = boost.mult.unwrap_or(super::store::DEFAULT_BOOST_MULT);
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("    {}⚡ {} ×{}", shift, text(locale, Msg::ActivateBoost), mult),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )),
                BOOST_ITEM_BASE + i as u16,
            );
        }
    }
    cl
}

/// Short "+1/click, +0.5/s" description of what one level gives.
fn effect_summary(item: &ItemDef, locale: Locale) -> String {
    let e = &item.effects;
    let mut parts = Vec::new();
    if e.per_click > 0.0 {
        parts.push(format!("+{} {}", format_glow(e.per_click), text(locale, Msg::PerClick)));
    }
    if e.per_second > 0.0 {
        parts.push(format!("+{} {}", format_glow(e.per_second), text(locale, Msg::PerSecond)));
    }
    if e.trip_speed > 0.0 {
        parts.push(format!("{} +{:.0}%", text(locale, Msg::Trip), e.trip_speed * 100.0));
    }
    parts.join(", ")
}

fn category_label(category: &str, locale: Locale) -> &'static str {
    match (category, locale) {
        ("clothes", Locale::Ru) => "Одежда",
        ("clothes", Locale::En) => "Clothes",
        ("accessories", Locale::Ru) => "Аксессуары",
        ("accessories", Locale::En) => "Accessories",
        ("transport", Locale::Ru) => "Транспорт",
        ("transport", Locale::En) => "Transport",
        ("cosmetics", Locale::Ru) => "Косметика",
        ("cosmetics", Locale::En) => "Cosmetics",
        _ => "?",
    }
}

// ── Achievements ───────────────────────────────────────────────

fn render_achievements(
    game: &GlowTrip,
    pal: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = &game.state;
    let locale = state.settings.locale;

    let mut cl = ClickableList::new();
    for ach in &game.catalog.achievements {
        let unlocked = state.is_unlocked(&ach.key);
        let (mark, style, status) = if unlocked {
            ("★", Style::default().fg(pal.good).add_modifier(Modifier::BOLD), Msg::Unlocked)
        } else {
            ("☆", Style::default().fg(pal.dim), Msg::Locked)
        };
        cl.push(Line::from(vec![
            Span::styled(format!("{} {}", mark, ach.name.get(locale)), style),
            Span::styled(format!("  {}", text(locale, status)), Style::default().fg(pal.dim)),
        ]));
        cl.push(Line::from(Span::styled(
            format!("   {}", ach.desc.get(locale)),
            Style::default().fg(pal.dim),
        )));
    }

    let inner_width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2);
    let max_scroll = cl.visual_height(inner_width).saturating_sub(visible);
    let scroll = game.ach_scroll.min(max_scroll);

    // Upper and lower halves of the panel scroll up / down.
    {
        let mut cs = click_state.borrow_mut();
        let half = area.height / 2;
        cs.add_click_target(Rect::new(area.x, area.y, area.width, half), ACH_SCROLL_UP);
        cs.add_click_target(
            Rect::new(area.x, area.y + half, area.width, area.height - half),
            ACH_SCROLL_DOWN,
        );
    }

    let title = format!(
        " {} {}/{} · j/k ",
        text(locale, Msg::TabAchievements),
        state.achievements.len(),
        game.catalog.achievements.len()
    );
    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.border))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(widget, area);
}

// ── Settings ───────────────────────────────────────────────────

fn render_settings(
    game: &GlowTrip,
    pal: &Palette,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let settings = &game.state.settings;
    let locale = settings.locale;
    let on_off = |on: bool| text(locale, if on { Msg::On } else { Msg::Off });
    let key_style = Style::default().fg(pal.accent).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(pal.text);

    let toggles: [(char, String, u16); 4] = [
        ('m', format!("{}: {}", text(locale, Msg::Sound), on_off(settings.sound)), TOGGLE_SOUND),
        (
            'v',
            format!("{}: {}", text(locale, Msg::Animations), on_off(settings.animations)),
            TOGGLE_ANIMATIONS,
        ),
        (
            'h',
            format!("{}: {}", text(locale, Msg::HighContrast), on_off(settings.high_contrast)),
            TOGGLE_CONTRAST,
        ),
        (
            'l',
            format!("{}: {}", text(locale, Msg::Language), locale.code().to_uppercase()),
            TOGGLE_LOCALE,
        ),
    ];
    let commands: [(char, Msg, u16); 4] = [
        ('s', Msg::Save, SAVE_NOW),
        ('x', Msg::Export, EXPORT_SAVE),
        ('i', Msg::Import, IMPORT_SAVE),
        ('r', Msg::Reset, RESET_PROGRESS),
    ];

    let mut cl = ClickableList::new();
    for (key, label, action) in toggles {
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{}] ", key), key_style),
                Span::styled(label, text_style),
            ]),
            action,
        );
    }
    cl.push(Line::from(""));
    for (key, msg, action) in commands {
        let style = if action == RESET_PROGRESS {
            Style::default().fg(pal.bad)
        } else {
            text_style
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{}] ", key), key_style),
                Span::styled(text(locale, msg), style),
            ]),
            action,
        );
    }
    if let Some(SaveStatus::Failed(reason)) = &game.last_save {
        cl.push(Line::from(Span::styled(
            format!(" ⚠ {}", reason),
            Style::default().fg(pal.bad),
        )));
    }

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, 0);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(pal.border))
            .title(format!(" {} ", text(locale, Msg::TabSettings))),
    );
    f.render_widget(widget, area);
}

// ── Log ────────────────────────────────────────────────────────

fn render_log(game: &GlowTrip, pal: &Palette, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest first
    let log_lines: Vec<Line> = game
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let is_recent = i < 3;
            let style = match (entry.is_important, is_recent) {
                (true, true) => Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(pal.accent),
                (false, true) => Style::default().fg(pal.text).add_modifier(Modifier::BOLD),
                (false, false) => Style::default().fg(pal.dim),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(format!(" {} ", text(game.state.settings.locale, Msg::Log))),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
