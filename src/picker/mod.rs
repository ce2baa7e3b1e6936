//! Main `ColorPicker` struct - the primary entry point for the browser UI.
//!
//! This module provides the WASM-exported `ColorPicker` that:
//! - Owns the picker state and applies UI events to it
//! - Persists the selection, history and palette after each change
//! - Hands render-ready views back to JavaScript
//! - Copies colors to the clipboard and downloads the palette as text
//!
//! The DOM itself (gradient surface, sliders, swatches) stays in JavaScript;
//! it forwards events here and draws whatever `view()` returns.

#[cfg(target_arch = "wasm32")]
mod clipboard;
#[cfg(target_arch = "wasm32")]
mod export;

use wasm_bindgen::prelude::*;

use crate::config::PickerConfig;
use crate::error::Result;
use crate::state::{PickerEvent, PickerState};
use crate::storage::{load_state, save_state, KeyValueStore};

#[cfg(target_arch = "wasm32")]
use crate::storage::{BrowserStorage, MemoryStore};

/// The picker exported to JavaScript.
#[wasm_bindgen]
pub struct ColorPicker {
    config: PickerConfig,
    state: PickerState,
    store: Box<dyn KeyValueStore>,
}

impl ColorPicker {
    /// Restore a picker from `store`.
    #[must_use]
    pub fn with_store(config: PickerConfig, mut store: Box<dyn KeyValueStore>) -> Self {
        let state = load_state(store.as_mut(), &config);
        Self {
            config,
            state,
            store,
        }
    }

    /// Apply an event and persist the result.
    ///
    /// Pointer hover/leave only move the preview and are not persisted.
    /// Storage failures are logged and otherwise ignored.
    ///
    /// # Errors
    /// Whatever [`PickerState::apply`] rejects; the state is left as it was.
    pub fn dispatch(&mut self, event: &PickerEvent) -> Result<&PickerState> {
        self.state = self.state.apply(event)?;
        if !matches!(
            event,
            PickerEvent::GradientHover { .. } | PickerEvent::GradientLeave
        ) {
            self.persist();
        }
        Ok(&self.state)
    }

    #[must_use]
    pub fn state(&self) -> &PickerState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Palette export text.
    ///
    /// # Errors
    /// [`crate::SwatchError::EmptyPalette`] before any palette exists.
    pub fn export_text(&self) -> Result<String> {
        self.state.export_text()
    }

    fn persist(&mut self) {
        if let Err(e) = save_state(
            self.store.as_mut(),
            &self.state,
            &self.config.storage_keys,
        ) {
            tracing::warn!(error = %e, "Failed to save picker state");
        }
    }
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ColorPicker {
    /// Create a picker backed by `localStorage`.
    ///
    /// `config` is an optional JSON object (see `PickerConfig`). Falls back
    /// to in-memory state when local storage is unavailable.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> std::result::Result<ColorPicker, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config {
            Some(json) => PickerConfig::from_json(&json)?,
            None => PickerConfig::default(),
        };
        let store: Box<dyn KeyValueStore> = match BrowserStorage::local() {
            Some(storage) => Box::new(storage),
            None => {
                tracing::warn!("localStorage unavailable, picker state will not persist");
                Box::new(MemoryStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    /// Apply a UI event (`{type: "generate"}`, `{type: "slider", h, s, l}`, ...)
    /// and return the new view.
    #[wasm_bindgen]
    pub fn handle(&mut self, event: JsValue) -> std::result::Result<JsValue, JsValue> {
        let event: PickerEvent = serde_wasm_bindgen::from_value(event)?;
        self.dispatch(&event)?;
        self.view()
    }

    /// Current render-ready view.
    #[wasm_bindgen]
    pub fn view(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.view())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Palette as newline-separated hex.
    #[wasm_bindgen(js_name = "exportText")]
    pub fn export_palette_text(&self) -> std::result::Result<String, JsValue> {
        Ok(self.state.export_text()?)
    }

    /// Download the palette as a text file.
    #[wasm_bindgen(js_name = "downloadPalette")]
    pub fn download_palette(&self) -> std::result::Result<(), JsValue> {
        let text = self.state.export_text()?;
        export::download_text(&self.config.export_file_name, &text)
    }

    /// Copy a color to the clipboard. Resolves to whether it worked.
    #[wasm_bindgen(js_name = "copyColor")]
    pub fn copy_color(&self, hex: String) -> js_sys::Promise {
        clipboard::copy_text(hex)
    }
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
    use crate::storage::MemoryStore;

    #[test]
    fn test_dispatch_persists_selection() {
        let mut picker = ColorPicker::with_store(
            PickerConfig::default(),
            Box::new(MemoryStore::new()),
        );
        picker
            .dispatch(&PickerEvent::SelectColor {
                hex: "#00ff00".to_string(),
            })
            .unwrap();
        assert_eq!(picker.state().current_hex(), "#00ff00");
        assert_eq!(
            picker.store.get("paletteMakerBaseColor").unwrap().as_deref(),
            Some("#00ff00")
        );
    }

    #[test]
    fn test_hover_is_not_persisted() {
        let mut picker = ColorPicker::with_store(
            PickerConfig::default(),
            Box::new(MemoryStore::new()),
        );
        picker
            .dispatch(&PickerEvent::GradientHover {
                x: 1.0,
                y: 1.0,
                width: 10.0,
                height: 10.0,
            })
            .unwrap();
        assert!(picker.store.get("paletteMakerBaseColor").unwrap().is_none());
    }

    #[test]
    fn test_rejected_event_keeps_state() {
        let mut picker = ColorPicker::with_store(
            PickerConfig::default(),
            Box::new(MemoryStore::new()),
        );
        let before = picker.state().clone();
        assert!(picker
            .dispatch(&PickerEvent::SelectHistory {
                hex: "bogus".to_string(),
            })
            .is_err());
        assert_eq!(picker.state(), &before);
        assert!(picker.export_text().is_err());
    }
}
