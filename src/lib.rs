//! swatchbook - color picker and palette generator core for the web
//!
//! Pure color math and palette generation, plus the state machine and
//! persistence behind a browser color picker, compiled to WebAssembly:
//! - Hex / RGB / HSL conversion with lossless 8-bit round trips
//! - WCAG luminance and readable label colors
//! - Gradient position to color mapping
//! - Complementary, analogous, triadic and monochromatic palettes
//! - Selection history, `localStorage` persistence, clipboard and download
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ColorPicker, generatePalette } from 'swatchbook';
//! await init();
//! const picker = new ColorPicker();
//! let view = picker.handle({ type: 'gradientClick', x, y, width, height });
//! view = picker.handle({ type: 'generate' });
//! generatePalette('#3b82f6', 'triadic', 5); // ['#3b82f6', ...]
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod palette;
pub mod picker;
pub mod state;
pub mod storage;
pub mod swatch;

use wasm_bindgen::prelude::*;

pub use color::{Hsl, Rgb};
pub use config::PickerConfig;
pub use error::{Result, SwatchError};
pub use history::History;
pub use palette::{HarmonyRule, Palette};
pub use picker::ColorPicker;
pub use state::{PickerEvent, PickerState, PickerView};

fn to_js<T: serde::Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn js_error(e: &SwatchError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse a hex color into `{r, g, b}`.
///
/// # Errors
/// Returns an error for a malformed hex string.
#[wasm_bindgen(js_name = "hexToRgb")]
pub fn hex_to_rgb(hex: &str) -> std::result::Result<JsValue, JsValue> {
    let rgb = color::parse_hex(hex).map_err(|e| js_error(&e))?;
    to_js(&rgb)
}

/// Format channels as `#rrggbb`.
#[must_use]
#[wasm_bindgen(js_name = "rgbToHex")]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    color::rgb_to_hex(r, g, b)
}

/// Parse a hex color into `{h, s, l}`.
///
/// # Errors
/// Returns an error for a malformed hex string.
#[wasm_bindgen(js_name = "hexToHsl")]
pub fn hex_to_hsl(hex: &str) -> std::result::Result<JsValue, JsValue> {
    let hsl = color::hex_to_hsl(hex).map_err(|e| js_error(&e))?;
    to_js(&hsl)
}

/// Convert HSL (degrees, percent, percent) to `#rrggbb`.
#[must_use]
#[wasm_bindgen(js_name = "hslToHex")]
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    color::hsl_to_hex(Hsl::new(h, s, l))
}

/// Convert HSL to `{r, g, b}`.
///
/// # Errors
/// Returns an error if the result cannot be converted to a JS value.
#[wasm_bindgen(js_name = "hslToRgb")]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> std::result::Result<JsValue, JsValue> {
    to_js(&color::hsl_to_rgb(Hsl::new(h, s, l)))
}

/// Wrap a hue into [0, 360).
#[must_use]
#[wasm_bindgen(js_name = "normalizeHue")]
pub fn normalize_hue(hue: f64) -> f64 {
    color::normalize_hue(hue)
}

/// WCAG relative luminance in [0, 1].
#[must_use]
#[wasm_bindgen(js_name = "relativeLuminance")]
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    color::relative_luminance(Rgb::new(r, g, b))
}

/// Readable label color on a background.
///
/// # Errors
/// Returns an error for a malformed hex string.
#[wasm_bindgen(js_name = "contrastingTextColor")]
pub fn contrasting_text_color(hex: &str) -> std::result::Result<String, JsValue> {
    color::contrasting_text_color_for_hex(hex)
        .map(str::to_string)
        .map_err(|e| js_error(&e))
}

/// Color under a pointer position on the picker gradient, as `{h, s, l}`.
///
/// # Errors
/// Returns an error if the result cannot be converted to a JS value.
#[wasm_bindgen(js_name = "gradientPositionToHsl")]
pub fn gradient_position_to_hsl(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> std::result::Result<JsValue, JsValue> {
    to_js(&color::gradient_position_to_hsl(x, y, width, height))
}

/// Generate a palette as an array of `#rrggbb` strings.
///
/// An unknown rule yields just the base color.
///
/// # Errors
/// Returns an error for a malformed base color.
#[wasm_bindgen(js_name = "generatePalette")]
pub fn generate_palette(
    hex: &str,
    rule: &str,
    size: u32,
) -> std::result::Result<JsValue, JsValue> {
    let size = usize::try_from(size).unwrap_or(palette::MAX_PALETTE_SIZE);
    let palette = palette::generate_palette_for_tag(hex, rule, size).map_err(|e| js_error(&e))?;
    to_js(&palette)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
