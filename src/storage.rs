//! Persistence of picker state in a string key-value store.
//!
//! Three keys are used: the selected color (plain hex), the history and the
//! visible palette (both JSON arrays of hex strings). Loading never fails:
//! unreadable data is cleared and the defaults are used instead.

use std::collections::BTreeMap;

use crate::color::{parse_hex, rgb_to_hsl};
use crate::config::{PickerConfig, StorageKeys};
use crate::error::Result;
use crate::history::History;
use crate::palette::Palette;
use crate::state::PickerState;

/// A string key-value store (browser `localStorage` or an in-memory map).
pub trait KeyValueStore {
    /// # Errors
    /// Returns [`crate::SwatchError::Storage`] when the store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    /// Returns [`crate::SwatchError::Storage`] when the write is rejected.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// # Errors
    /// Returns [`crate::SwatchError::Storage`] when the store is unavailable.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store used natively and as the browser fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    /// Open local storage; `None` when the browser denies access.
    #[must_use]
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
fn storage_error(err: &wasm_bindgen::JsValue) -> crate::error::SwatchError {
    crate::error::SwatchError::Storage(format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(|e| storage_error(&e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(|e| storage_error(&e))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(|e| storage_error(&e))
    }
}

/// Write the selected color, history and (if shown) palette.
///
/// A hidden or empty palette removes the palette key so it is not restored.
///
/// # Errors
/// Store and serialization errors; earlier keys may already be written.
pub fn save_state<S>(store: &mut S, state: &PickerState, keys: &StorageKeys) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    store.set(&keys.base_color, &state.current_hex())?;
    store.set(&keys.history, &serde_json::to_string(state.history.entries())?)?;
    if state.palette_visible && !state.palette.is_empty() {
        store.set(&keys.palette, &serde_json::to_string(&state.palette)?)?;
    } else {
        store.remove(&keys.palette)?;
    }
    Ok(())
}

/// Restore picker state, falling back to defaults.
///
/// Corrupted history or palette data clears all picker keys. The restored
/// preview is unlocked with the copy hint hidden.
pub fn load_state<S>(store: &mut S, config: &PickerConfig) -> PickerState
where
    S: KeyValueStore + ?Sized,
{
    match read_state(store, config) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "Stored picker state is unreadable, resetting to defaults");
            clear_state(store, &config.storage_keys);
            PickerState::new(config)
        }
    }
}

/// Remove every picker key. Failures are logged and skipped.
pub fn clear_state<S>(store: &mut S, keys: &StorageKeys)
where
    S: KeyValueStore + ?Sized,
{
    for key in [&keys.base_color, &keys.history, &keys.palette] {
        if let Err(e) = store.remove(key) {
            tracing::warn!(key = %key, error = %e, "Failed to clear stored picker state");
        }
    }
}

fn read_state<S>(store: &S, config: &PickerConfig) -> Result<PickerState>
where
    S: KeyValueStore + ?Sized,
{
    let keys = &config.storage_keys;
    let mut state = PickerState::new(config);

    if let Some(base) = store.get(&keys.base_color)? {
        match parse_hex(&base) {
            Ok(rgb) if base.starts_with('#') => {
                state.current = rgb;
                state.current_hsl = rgb_to_hsl(rgb);
                state.preview = rgb;
            }
            _ => tracing::debug!(base = %base, "Ignoring stored base color"),
        }
    }

    if let Some(json) = store.get(&keys.history)? {
        let entries: Vec<String> = serde_json::from_str(&json)?;
        state.history = History::from_entries(entries, config.history_capacity);
    }

    if let Some(json) = store.get(&keys.palette)? {
        let colors: Vec<String> = serde_json::from_str(&json)?;
        state.palette = Palette::from_hex_colors(colors)?;
        state.palette_visible = !state.palette.is_empty();
    }

    tracing::debug!(
        base = %state.current_hex(),
        history = state.history.len(),
        palette = state.palette.len(),
        "Restored picker state"
    );
    Ok(state)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::SwatchError;
    use crate::state::PickerEvent;

    /// Store whose reads always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(SwatchError::Storage("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(SwatchError::Storage("unavailable".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(SwatchError::Storage("unavailable".to_string()))
        }
    }

    fn keys() -> StorageKeys {
        StorageKeys::default()
    }

    fn seeded(base: &str, history: &str, palette: Option<&str>) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set("paletteMakerBaseColor", base).unwrap();
        store.set("paletteMakerHistory", history).unwrap();
        if let Some(palette) = palette {
            store.set("paletteMakerPalette", palette).unwrap();
        }
        store
    }

    #[test]
    fn test_save_then_load() {
        let config = PickerConfig::default();
        let state = PickerState::new(&config)
            .apply(&PickerEvent::SelectColor {
                hex: "#FF8800".to_string(),
            })
            .unwrap()
            .apply(&PickerEvent::Generate)
            .unwrap();

        let mut store = MemoryStore::new();
        save_state(&mut store, &state, &keys()).unwrap();
        assert_eq!(
            store.get("paletteMakerBaseColor").unwrap().as_deref(),
            Some("#ff8800")
        );
        assert_eq!(
            store.get("paletteMakerHistory").unwrap().as_deref(),
            Some(r##"["#ff8800"]"##)
        );

        let restored = load_state(&mut store, &config);
        assert_eq!(restored.current_hex(), "#ff8800");
        assert_eq!(restored.history, state.history);
        assert_eq!(restored.palette, state.palette);
        assert!(restored.palette_visible);
        assert!(!restored.locked);
        assert!(!restored.show_instruction);
    }

    #[test]
    fn test_hidden_palette_is_not_saved() {
        let config = PickerConfig::default();
        let state = PickerState::new(&config)
            .apply(&PickerEvent::Generate)
            .unwrap();
        let mut store = MemoryStore::new();
        save_state(&mut store, &state, &keys()).unwrap();
        assert!(store.get("paletteMakerPalette").unwrap().is_some());

        let closed = state.apply(&PickerEvent::ClosePalette).unwrap();
        save_state(&mut store, &closed, &keys()).unwrap();
        assert!(store.get("paletteMakerPalette").unwrap().is_none());
    }

    #[test]
    fn test_empty_store_gives_defaults() {
        let config = PickerConfig::default();
        let state = load_state(&mut MemoryStore::new(), &config);
        assert_eq!(state, PickerState::new(&config));
    }

    #[test]
    fn test_base_without_hash_is_ignored() {
        let mut store = seeded("ff0000", "[]", None);
        let state = load_state(&mut store, &PickerConfig::default());
        assert_eq!(state.current_hex(), "#3b82f6");
        // Not corruption: the other keys survive
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_corrupted_history_clears_everything() {
        let mut store = seeded("#ff0000", "[not json", Some(r##"["#00ff00"]"##));
        let state = load_state(&mut store, &PickerConfig::default());
        assert_eq!(state, PickerState::new(&PickerConfig::default()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupted_palette_entry_clears_everything() {
        let mut store = seeded("#ff0000", r##"["#ff0000"]"##, Some(r#"["red"]"#));
        let state = load_state(&mut store, &PickerConfig::default());
        assert_eq!(state.current_hex(), "#3b82f6");
        assert!(store.is_empty());
    }

    #[test]
    fn test_history_capacity_applies_on_load() {
        let config = PickerConfig {
            history_capacity: 2,
            ..PickerConfig::default()
        };
        let mut store = seeded("#ff0000", r##"["#111111", "#222222", "#333333"]"##, None);
        let state = load_state(&mut store, &config);
        assert_eq!(state.history.entries(), ["#111111", "#222222"]);
    }

    #[test]
    fn test_unavailable_store_falls_back() {
        let config = PickerConfig::default();
        let state = load_state(&mut BrokenStore, &config);
        assert_eq!(state, PickerState::new(&config));
        assert!(save_state(&mut BrokenStore, &state, &keys()).is_err());
    }
}
