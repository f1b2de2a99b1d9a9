//! Glow Trip save / load.
//!
//! The snapshot is the whole [`GameState`] as camelCase JSON. Loading
//! overlays the saved top-level fields onto a fresh default state, so fields
//! added later simply take their defaults. A field whose saved value no longer
//! fits its type is dropped in favour of the default.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::state::{GameState, Run};

/// localStorage key.
pub const SAVE_KEY: &str = "glowtrip_save_v1";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid save JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save JSON is not an object")]
    NotAnObject,
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Outcome of a fire-and-forget write, for whoever wants to know.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Saved,
    Failed(String),
}

/// Minimal string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// Browser localStorage. Only exists on wasm32.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| SaveError::Storage("localStorage is not available".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// In-memory store for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    /// Make every write and delete fail, to exercise the degraded path.
    pub fail_writes: bool,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::Storage("quota exceeded".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::Storage("storage is read-only".into()));
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Shallow overlay of `parsed`'s top-level fields onto `defaults`.
///
/// Nulls are skipped. Each field is kept only if it deserializes on its own.
pub fn overlay_defaults(defaults: &GameState, parsed: Value) -> Result<GameState, SaveError> {
    let Value::Object(fields) = parsed else {
        return Err(SaveError::NotAnObject);
    };
    let Value::Object(base) = serde_json::to_value(defaults)? else {
        return Err(SaveError::NotAnObject);
    };

    let mut merged: Map<String, Value> = base.clone();
    for (key, value) in fields {
        if value.is_null() {
            continue;
        }
        let mut probe = base.clone();
        probe.insert(key.clone(), value.clone());
        match serde_json::from_value::<GameState>(Value::Object(probe)) {
            Ok(_) => {
                merged.insert(key, value);
            }
            Err(e) => super::log_warn(&format!("save field `{key}` ignored: {e}")),
        }
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Parse externally supplied JSON over defaults. Keeps every saved field,
/// `run` included, so an export re-imports unchanged.
pub fn import_state(json: &str, now_ms: f64) -> Result<GameState, SaveError> {
    let parsed: Value = serde_json::from_str(json)?;
    overlay_defaults(&GameState::new(now_ms), parsed)
}

/// Pretty-printed snapshot of the full state.
pub fn export_state(state: &GameState) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn reset_state(now_ms: f64) -> GameState {
    GameState::new(now_ms)
}

/// Restore the saved game, or start fresh.
///
/// A missing save, an unreadable store, or corrupt JSON all yield defaults.
/// Corrupt data is deleted. Scheduling fields are always reset.
pub fn load_state(store: &mut dyn KeyValueStore, now_ms: f64) -> GameState {
    let raw = match store.get(SAVE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return GameState::new(now_ms),
        Err(e) => {
            super::log_warn(&format!("could not read save: {e}"));
            return GameState::new(now_ms);
        }
    };

    let mut state = match import_state(&raw, now_ms) {
        Ok(state) => state,
        Err(e) => {
            super::log_warn(&format!("corrupt save discarded: {e}"));
            if let Err(e) = store.remove(SAVE_KEY) {
                super::log_warn(&format!("could not delete corrupt save: {e}"));
            }
            return GameState::new(now_ms);
        }
    };
    state.run = Run::default();
    super::log_info("save loaded");
    state
}

/// Best-effort write. Failures are logged and reported to `on_status`, never returned.
pub fn save_state(
    store: &mut dyn KeyValueStore,
    state: &GameState,
    on_status: Option<&mut dyn FnMut(SaveStatus)>,
) {
    let result = serde_json::to_string(state)
        .map_err(SaveError::from)
        .and_then(|json| store.set(SAVE_KEY, &json));
    let status = match result {
        Ok(()) => SaveStatus::Saved,
        Err(e) => {
            super::log_warn(&format!("save failed: {e}"));
            SaveStatus::Failed(e.to_string())
        }
    };
    if let Some(callback) = on_status {
        callback(status);
    }
}
