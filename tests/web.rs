//! Browser tests for the exported JavaScript API.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

use swatchbook::{ColorPicker, PickerView};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_exported_conversions() {
    assert_eq!(swatchbook::rgb_to_hex(59, 130, 246), "#3b82f6");
    assert_eq!(swatchbook::hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
    assert_eq!(
        swatchbook::contrasting_text_color("#ffffff").unwrap(),
        "#1f2937"
    );
    assert!(swatchbook::hex_to_rgb("nope").is_err());
}

#[wasm_bindgen_test]
fn test_generate_palette_returns_array() {
    let value = swatchbook::generate_palette("#ff0000", "triadic", 3).unwrap();
    let colors: Vec<String> = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(colors, ["#ff0000", "#00ff00", "#0000ff"]);
}

#[wasm_bindgen_test]
fn test_picker_handles_js_events() {
    let mut picker = ColorPicker::new(Some(r#"{"storageKeys": {"baseColor": "webTestBase", "history": "webTestHistory", "palette": "webTestPalette"}}"#.to_string()))
        .unwrap();

    let event = js_sys::JSON::parse(r##"{"type": "selectColor", "hex": "#ff0000"}"##).unwrap();
    picker.handle(event).unwrap();

    let event = js_sys::JSON::parse(r#"{"type": "generate"}"#).unwrap();
    let view = picker.handle(event).unwrap();
    assert!(view.is_object());
    assert!(picker.export_palette_text().unwrap().starts_with("#ff0000"));

    let bad = JsValue::from_str("not an event");
    assert!(picker.handle(bad).is_err());
}

#[wasm_bindgen_test]
async fn test_copy_color_resolves_to_bool() {
    let picker = ColorPicker::new(None).unwrap();
    // Headless runners may deny clipboard access; the promise still resolves
    let copied = wasm_bindgen_futures::JsFuture::from(picker.copy_color("#3b82f6".to_string()))
        .await
        .expect("copyColor never rejects");
    assert!(copied.as_bool().is_some());
}

#[wasm_bindgen_test]
fn test_view_matches_state() {
    let picker = ColorPicker::new(None).unwrap();
    let view: PickerView = picker.state().view();
    assert_eq!(view.current.hex, picker.state().current_hex());
}
