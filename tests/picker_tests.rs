//! End-to-end picker flows: events in, state and stored keys out.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use swatchbook::storage::{KeyValueStore, MemoryStore};
use swatchbook::{ColorPicker, HarmonyRule, PickerConfig, PickerEvent, SwatchError};

// ================================================================
// Test helpers
// ================================================================

/// A store that outlives the picker, like `localStorage` across reloads.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> swatchbook::Result<Option<String>> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> swatchbook::Result<()> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> swatchbook::Result<()> {
        self.0.borrow_mut().remove(key)
    }
}

impl SharedStore {
    fn value(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).unwrap()
    }
}

fn picker_with(store: &SharedStore) -> ColorPicker {
    ColorPicker::with_store(PickerConfig::default(), Box::new(store.clone()))
}

fn click(x: f64, y: f64) -> PickerEvent {
    PickerEvent::GradientClick {
        x,
        y,
        width: 360.0,
        height: 100.0,
    }
}

fn hover(x: f64, y: f64) -> PickerEvent {
    PickerEvent::GradientHover {
        x,
        y,
        width: 360.0,
        height: 100.0,
    }
}

fn select(hex: &str) -> PickerEvent {
    PickerEvent::SelectColor {
        hex: hex.to_string(),
    }
}

// ================================================================
// Gradient interaction
// ================================================================

#[test]
fn test_click_locks_preview_until_escape() {
    let store = SharedStore::default();
    let mut picker = picker_with(&store);

    picker.dispatch(&click(180.0, 50.0)).unwrap();
    assert_eq!(picker.state().current_hex(), "#00ffff");
    assert!(picker.state().locked);
    assert!(picker.state().show_instruction);
    assert_eq!(picker.state().history.latest(), Some("#00ffff"));

    // Locked: hovering elsewhere does not move the preview
    picker.dispatch(&hover(0.0, 50.0)).unwrap();
    assert_eq!(picker.state().preview.to_hex(), "#00ffff");

    picker.dispatch(&PickerEvent::Escape).unwrap();
    assert!(!picker.state().locked);
    assert!(!picker.state().show_instruction);

    picker.dispatch(&hover(0.0, 50.0)).unwrap();
    assert_eq!(picker.state().preview.to_hex(), "#ff0000");
    // Hover never changes the selection
    assert_eq!(picker.state().current_hex(), "#00ffff");

    picker.dispatch(&PickerEvent::GradientLeave).unwrap();
    assert_eq!(picker.state().preview.to_hex(), "#00ffff");
}

#[test]
fn test_click_in_upper_half_is_a_tint() {
    let mut picker = picker_with(&SharedStore::default());
    picker.dispatch(&click(0.0, 25.0)).unwrap();
    assert_eq!(picker.state().current_hex(), "#ff8080");
}

#[test]
fn test_slider_selects_without_history() {
    let mut picker = picker_with(&SharedStore::default());
    picker
        .dispatch(&PickerEvent::Slider {
            h: 120.0,
            s: 100.0,
            l: 50.0,
        })
        .unwrap();
    assert_eq!(picker.state().current_hex(), "#00ff00");
    assert_eq!(picker.state().current_hsl.h, 120.0);
    assert!(picker.state().history.is_empty());
    assert!(!picker.state().locked);
}

// ================================================================
// Palettes
// ================================================================

#[test]
fn test_generate_shows_palette_and_records_base() {
    let store = SharedStore::default();
    let mut picker = picker_with(&store);
    picker.dispatch(&select("#ff0000")).unwrap();
    picker
        .dispatch(&PickerEvent::SetRule {
            rule: HarmonyRule::Triadic,
        })
        .unwrap();
    picker.dispatch(&PickerEvent::SetSize { size: 3 }).unwrap();
    picker.dispatch(&PickerEvent::Generate).unwrap();

    let state = picker.state();
    assert!(state.palette_visible);
    assert_eq!(state.palette.colors(), ["#ff0000", "#00ff00", "#0000ff"]);
    assert_eq!(state.history.latest(), Some("#ff0000"));
    assert_eq!(
        picker.export_text().unwrap(),
        "#ff0000\n#00ff00\n#0000ff"
    );
    assert_eq!(
        store.value("paletteMakerPalette").as_deref(),
        Some(r##"["#ff0000","#00ff00","#0000ff"]"##)
    );
}

#[test]
fn test_size_input_is_clamped() {
    let mut picker = picker_with(&SharedStore::default());
    picker.dispatch(&PickerEvent::SetSize { size: 42 }).unwrap();
    assert_eq!(picker.state().size, 10);
    picker.dispatch(&PickerEvent::StepSize { up: true }).unwrap();
    assert_eq!(picker.state().size, 10);

    picker.dispatch(&PickerEvent::SetSize { size: -3 }).unwrap();
    assert_eq!(picker.state().size, 2);
    picker.dispatch(&PickerEvent::StepSize { up: false }).unwrap();
    assert_eq!(picker.state().size, 2);
    picker.dispatch(&PickerEvent::StepSize { up: true }).unwrap();
    assert_eq!(picker.state().size, 3);
}

#[test]
fn test_removing_every_color_hides_palette() {
    let mut picker = picker_with(&SharedStore::default());
    picker.dispatch(&PickerEvent::SetSize { size: 2 }).unwrap();
    picker.dispatch(&PickerEvent::Generate).unwrap();
    assert!(picker.state().locked);

    let colors = picker.state().palette.colors().to_vec();
    picker
        .dispatch(&PickerEvent::RemoveColor {
            hex: colors[0].to_uppercase(),
        })
        .unwrap();
    assert_eq!(picker.state().palette.len(), 1);
    assert!(picker.state().palette_visible);

    picker
        .dispatch(&PickerEvent::RemoveColor {
            hex: colors[1].clone(),
        })
        .unwrap();
    assert!(!picker.state().palette_visible);
    assert!(!picker.state().locked);
    assert!(matches!(
        picker.export_text(),
        Err(SwatchError::EmptyPalette)
    ));
}

#[test]
fn test_close_palette_hides_but_keeps_colors() {
    let store = SharedStore::default();
    let mut picker = picker_with(&store);
    picker.dispatch(&PickerEvent::Generate).unwrap();
    picker.dispatch(&PickerEvent::ClosePalette).unwrap();

    assert!(!picker.state().palette_visible);
    assert!(!picker.state().palette.is_empty());
    assert!(store.value("paletteMakerPalette").is_none());
    assert!(picker.state().view().palette.is_none());
}

// ================================================================
// History
// ================================================================

#[test]
fn test_history_is_bounded_and_deduplicated() {
    let mut picker = picker_with(&SharedStore::default());
    let colors = [
        "#111111", "#222222", "#333333", "#444444", "#555555", "#666666", "#777777", "#888888",
    ];
    for hex in colors {
        picker.dispatch(&select(hex)).unwrap();
    }
    let history = &picker.state().history;
    assert_eq!(history.len(), 7);
    assert_eq!(history.latest(), Some("#888888"));
    assert!(!history.contains("#111111"));

    picker
        .dispatch(&PickerEvent::SelectHistory {
            hex: "#444444".to_string(),
        })
        .unwrap();
    let history = &picker.state().history;
    assert_eq!(history.len(), 7);
    assert_eq!(history.latest(), Some("#444444"));
    assert_eq!(
        history.entries().iter().filter(|e| *e == "#444444").count(),
        1
    );
}

#[test]
fn test_invalid_selection_is_rejected() {
    let mut picker = picker_with(&SharedStore::default());
    let err = picker.dispatch(&select("#12345")).unwrap_err();
    assert!(matches!(err, SwatchError::InvalidHex(_)));
    assert!(picker.state().history.is_empty());
}

// ================================================================
// Persistence across reloads
// ================================================================

#[test]
fn test_state_survives_reload() {
    let store = SharedStore::default();
    {
        let mut picker = picker_with(&store);
        picker.dispatch(&select("#3B82F6")).unwrap();
        picker.dispatch(&click(180.0, 50.0)).unwrap();
        picker.dispatch(&PickerEvent::Generate).unwrap();
    }

    let picker = picker_with(&store);
    let state = picker.state();
    assert_eq!(state.current_hex(), "#00ffff");
    assert_eq!(state.history.entries(), ["#00ffff", "#3b82f6"]);
    assert!(state.palette_visible);
    assert_eq!(state.palette.first(), Some("#00ffff"));
    assert!(!state.locked);
}

#[test]
fn test_corrupted_storage_resets() {
    let store = SharedStore::default();
    store
        .0
        .borrow_mut()
        .set("paletteMakerHistory", "{\"not\": \"a list\"}")
        .unwrap();
    store
        .0
        .borrow_mut()
        .set("paletteMakerBaseColor", "#ff0000")
        .unwrap();

    let picker = picker_with(&store);
    assert_eq!(picker.state().current_hex(), "#3b82f6");
    assert!(store.0.borrow().is_empty());
}

#[test]
fn test_custom_storage_keys() {
    let config =
        PickerConfig::from_json(r##"{"storageKeys": {"baseColor": "mine"}, "defaultColor": "#ABC"}"##)
            .unwrap();
    let store = SharedStore::default();
    let mut picker = ColorPicker::with_store(config, Box::new(store.clone()));
    assert_eq!(picker.state().current_hex(), "#aabbcc");

    picker.dispatch(&select("#010203")).unwrap();
    assert_eq!(store.value("mine").as_deref(), Some("#010203"));
    assert!(store.value("paletteMakerBaseColor").is_none());
    assert!(store.value("paletteMakerHistory").is_some());
}

// ================================================================
// Wire format
// ================================================================

#[test]
fn test_events_from_json() {
    let event: PickerEvent = serde_json::from_str(
        r#"{"type": "gradientClick", "x": 90, "y": 50, "width": 360, "height": 100}"#,
    )
    .unwrap();
    assert_eq!(event, click(90.0, 50.0));

    let event: PickerEvent =
        serde_json::from_str(r#"{"type": "setRule", "rule": "monochromatic"}"#).unwrap();
    assert_eq!(
        event,
        PickerEvent::SetRule {
            rule: HarmonyRule::Monochromatic
        }
    );

    let event: PickerEvent = serde_json::from_str(r#"{"type": "stepSize", "up": false}"#).unwrap();
    assert_eq!(event, PickerEvent::StepSize { up: false });

    assert!(serde_json::from_str::<PickerEvent>(r#"{"type": "explode"}"#).is_err());
}

#[test]
fn test_view_json_shape() {
    let mut picker = picker_with(&SharedStore::default());
    picker.dispatch(&select("#000000")).unwrap();
    let view = serde_json::to_value(picker.state().view()).unwrap();

    assert_eq!(view["current"]["hex"], "#000000");
    assert_eq!(view["current"]["textColor"], "#f0f0f0");
    assert_eq!(view["labelColor"], "#1f2937");
    assert_eq!(view["instructionColor"], "#f0f0f0");
    assert_eq!(view["locked"], true);
    assert!(view["palette"].is_null());
    assert_eq!(view["history"].as_array().unwrap().len(), 1);
}
