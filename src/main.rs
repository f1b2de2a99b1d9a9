mod glow;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use glow::catalog::{Catalog, CatalogSources};
use glow::i18n::{text, Msg};
use glow::save::KeyValueStore;
use glow::{GlowTrip, HostRequest};
use input::{ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Catalog JSON the page may inline as `<script type="application/json" id="...">`.
const ITEMS_ELEMENT: &str = "glow-items";
const EVENTS_ELEMENT: &str = "glow-events";
const ACHIEVEMENTS_ELEMENT: &str = "glow-achievements";

fn inline_json(document: &web_sys::Document, id: &str) -> Option<String> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.text_content())
        .filter(|s| !s.trim().is_empty())
}

/// Page-supplied catalogs, falling back to the embedded copies per list.
fn load_catalog() -> Catalog {
    let document = web_sys::window().and_then(|w| w.document());
    let [items, events, achievements] = [ITEMS_ELEMENT, EVENTS_ELEMENT, ACHIEVEMENTS_ELEMENT]
        .map(|id| document.as_ref().and_then(|d| inline_json(d, id)));
    let primary = CatalogSources {
        items: items.as_deref(),
        events: events.as_deref(),
        achievements: achievements.as_deref(),
    };
    Catalog::load(&primary, &CatalogSources::embedded())
}

#[cfg(target_arch = "wasm32")]
fn browser_store() -> Box<dyn KeyValueStore> {
    Box::new(glow::save::LocalStorage)
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_store() -> Box<dyn KeyValueStore> {
    Box::new(glow::save::MemoryStore::default())
}

/// Query the grid container's bounding rect and convert a pixel position to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    cs.cell_at(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

/// Run an input event, then carry out whatever the game asked of the browser.
fn dispatch(game: &Rc<RefCell<GlowTrip>>, event: InputEvent) {
    let now = js_sys::Date::now();
    let request = game.borrow_mut().handle_input(&event, now);
    let Some(request) = request else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let locale = game.borrow().state.settings.locale;

    match request {
        HostRequest::Exported(json) => {
            web_sys::console::log_1(&json.into());
        }
        HostRequest::PromptImport => {
            let answer = window
                .prompt_with_message(text(locale, Msg::ImportPrompt))
                .ok()
                .flatten();
            if let Some(json) = answer.filter(|s| !s.trim().is_empty()) {
                game.borrow_mut().import_json(&json, js_sys::Date::now());
            }
        }
        HostRequest::ConfirmReset => {
            let confirmed = window
                .confirm_with_message(text(locale, Msg::ResetConfirm))
                .unwrap_or(false);
            if confirmed {
                game.borrow_mut().reset(js_sys::Date::now());
            }
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let now = js_sys::Date::now();
    let game = Rc::new(RefCell::new(GlowTrip::new(
        load_catalog(),
        browser_store(),
        now,
        now as u64,
    )));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Save on tab close. The closure lives as long as the page.
    if let Some(window) = web_sys::window() {
        let game = game.clone();
        let on_unload = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut g) = game.try_borrow_mut() {
                g.persist();
            }
        });
        window.set_onbeforeunload(Some(on_unload.as_ref().unchecked_ref()));
        on_unload.forget();
    }

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(id) = action {
                dispatch(&game, InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Enter => '\n',
                _ => return,
            };
            dispatch(&game, InputEvent::Key(key));
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            game.borrow_mut().frame(js_sys::Date::now());

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            game.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
