//! Color space conversions
//!
//! Handles hex, RGB and HSL representations of an sRGB color, and the
//! derived quantities the picker needs (luminance, label contrast, glow,
//! gradient mapping).
//!
//! Hex is the interchange form: input is case-insensitive with an optional
//! leading `#` and accepts 3-digit shorthand; output is always lowercase
//! `#rrggbb`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwatchError};

/// Label color used on light backgrounds.
pub const DARK_LABEL: &str = "#1f2937";
/// Label color used on dark backgrounds.
pub const LIGHT_LABEL: &str = "#f0f0f0";
/// Backgrounds brighter than this get the dark label.
pub const LABEL_LUMINANCE_THRESHOLD: f64 = 0.2;

/// Glow used around bright swatches.
pub const DARK_GLOW: &str = "rgba(0, 0, 0, 0.3)";
/// Glow used around dark swatches.
pub const LIGHT_GLOW: &str = "rgba(255, 255, 255, 0.5)";
/// Swatches brighter than this get the dark glow.
pub const GLOW_LUMINANCE_THRESHOLD: f64 = 0.5;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#RRGGBB`, used for display labels.
    #[must_use]
    pub fn to_hex_upper(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }
}

impl FromStr for Rgb {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Hue in degrees [0, 360), saturation and lightness in percent [0, 100].
///
/// Components are kept unrounded so that a hex -> HSL -> hex round trip
/// reproduces the original channels exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        hsl_to_hex(self)
    }

    /// Rotate the hue, wrapping into [0, 360).
    #[must_use]
    pub fn rotated(self, degrees: f64) -> Self {
        Self {
            h: normalize_hue(self.h + degrees),
            ..self
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSL({}, {}%, {}%)",
            self.h.round(),
            self.s.round(),
            self.l.round()
        )
    }
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (any case).
pub fn parse_hex(hex: &str) -> Result<Rgb> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let invalid = || SwatchError::InvalidHex(hex.to_string());

    // from_str_radix would also accept a sign
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |start: usize, len: usize| -> Result<u8> {
        let value = digits
            .get(start..start + len)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(invalid)?;
        // Shorthand digits expand to a doubled nibble: "a" -> "aa"
        Ok(if len == 1 { value * 17 } else { value })
    };

    match digits.len() {
        6 => Ok(Rgb::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        3 => Ok(Rgb::new(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
        _ => Err(invalid()),
    }
}

/// Format three channels as `#rrggbb`.
#[must_use]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    Rgb::new(r, g, b).to_hex()
}

/// Parse any accepted hex form and return its canonical `#rrggbb`.
pub fn normalize_hex(hex: &str) -> Result<String> {
    parse_hex(hex).map(Rgb::to_hex)
}

/// Convert a hex string to HSL.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl> {
    parse_hex(hex).map(rgb_to_hsl)
}

/// Convert HSL to a `#rrggbb` string.
#[must_use]
pub fn hsl_to_hex(hsl: Hsl) -> String {
    hsl_to_rgb(hsl).to_hex()
}

/// Convert RGB to HSL
#[allow(clippy::many_single_char_names)]
#[must_use]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);

    let r = unit(rgb.r);
    let g = unit(rgb.g);
    let b = unit(rgb.b);
    let max_n = unit(max);
    let min_n = unit(min);
    let l = f64::midpoint(max_n, min_n);

    // Achromatic: no hue, no saturation
    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max_n - min_n;
    let s = if l > 0.5 {
        d / (2.0 - max_n - min_n)
    } else {
        d / (max_n + min_n)
    };

    let sector = if max == rgb.r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == rgb.g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(normalize_hue(sector * 60.0), s * 100.0, l * 100.0)
}

/// Convert HSL to RGB
///
/// Uses the `k(n)` chroma formulation; out-of-range hue wraps and
/// saturation/lightness are clamped to [0, 100] first.
#[allow(clippy::many_single_char_names)]
#[must_use]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = normalize_hue(hsl.h);
    let s = hsl.s.clamp(0.0, 100.0) / 100.0;
    let l = hsl.l.clamp(0.0, 100.0) / 100.0;
    let a = s * l.min(1.0 - l);

    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let t = (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        to_channel(a.mul_add(-t, l))
    };

    Rgb::new(channel(0.0), channel(8.0), channel(4.0))
}

/// Wrap any hue offset into [0, 360).
#[must_use]
pub fn normalize_hue(hue: f64) -> f64 {
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// WCAG relative luminance in [0, 1].
#[must_use]
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |c: u8| {
        let v = unit(c);
        if v <= 0.039_28 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126f64.mul_add(
        linear(rgb.r),
        0.7152f64.mul_add(linear(rgb.g), 0.0722 * linear(rgb.b)),
    )
}

/// Pick the label color that stays readable on `background`.
#[must_use]
pub fn contrasting_text_color(background: Rgb) -> &'static str {
    if relative_luminance(background) > LABEL_LUMINANCE_THRESHOLD {
        DARK_LABEL
    } else {
        LIGHT_LABEL
    }
}

/// [`contrasting_text_color`] for a hex string.
pub fn contrasting_text_color_for_hex(hex: &str) -> Result<&'static str> {
    parse_hex(hex).map(contrasting_text_color)
}

/// Glow color drawn around a swatch after it is copied.
#[must_use]
pub fn glow_color(background: Rgb) -> &'static str {
    if relative_luminance(background) > GLOW_LUMINANCE_THRESHOLD {
        DARK_GLOW
    } else {
        LIGHT_GLOW
    }
}

/// Map a pointer position on the picker gradient to a color.
///
/// Hue runs left to right across the full circle. Lightness runs top to
/// bottom from white (100) through the pure hue (50) to black (0), which is
/// what a white -> hue -> black gradient shows. Saturation is always 100.
/// Coordinates outside the surface are clamped to its edges.
#[must_use]
pub fn gradient_position_to_hsl(x: f64, y: f64, width: f64, height: f64) -> Hsl {
    let x_ratio = axis_ratio(x, width);
    let y_ratio = axis_ratio(y, height);

    let lightness = if y_ratio < 0.5 {
        y_ratio.mul_add(-100.0, 100.0)
    } else {
        (y_ratio - 0.5).mul_add(-100.0, 50.0)
    };

    Hsl::new(
        normalize_hue(x_ratio * 360.0),
        100.0,
        lightness.clamp(0.0, 100.0),
    )
}

fn axis_ratio(position: f64, extent: f64) -> f64 {
    if extent.is_nan() || extent <= 0.0 || position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, extent) / extent
}

fn unit(channel: u8) -> f64 {
    f64::from(channel) / 255.0
}

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    // =========================================================================
    // Hex parsing
    // =========================================================================

    #[test]
    fn test_parse_hex_with_hash() {
        assert_eq!(parse_hex("#3b82f6").unwrap(), Rgb::new(59, 130, 246));
    }

    #[test]
    fn test_parse_hex_without_hash_and_uppercase() {
        assert_eq!(parse_hex("3B82F6").unwrap(), Rgb::new(59, 130, 246));
    }

    #[test]
    fn test_parse_hex_shorthand() {
        assert_eq!(parse_hex("#abc").unwrap(), Rgb::new(0xaa, 0xbb, 0xcc));
        assert_eq!(parse_hex("f00").unwrap(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_parse_hex_trims_whitespace() {
        assert_eq!(parse_hex("  #ffffff\n").unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        for input in ["", "#", "#12345", "#1234567", "#gg0000", "+f0000", "#+f0000", "##ffffff"] {
            let err = parse_hex(input).unwrap_err();
            assert!(
                matches!(err, SwatchError::InvalidHex(ref s) if s == input),
                "input {input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_rgb_to_hex_zero_pads() {
        assert_eq!(rgb_to_hex(0, 10, 255), "#000aff");
        assert_eq!(Rgb::new(0, 10, 255).to_hex_upper(), "#000AFF");
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#ABC").unwrap(), "#aabbcc");
        assert_eq!(normalize_hex("3B82F6").unwrap(), "#3b82f6");
    }

    #[test]
    fn test_rgb_from_str() {
        let rgb: Rgb = "#000000".parse().unwrap();
        assert_eq!(rgb, Rgb::new(0, 0, 0));
        assert!("nope".parse::<Rgb>().is_err());
    }

    // =========================================================================
    // HSL conversion
    // =========================================================================

    #[test]
    fn test_hex_to_hsl_reference_blue() {
        let hsl = hex_to_hsl("#3b82f6").unwrap();
        assert_close(hsl.h, 217.0, 1.0);
        assert_close(hsl.s, 91.0, 1.0);
        assert_close(hsl.l, 60.0, 1.0);
    }

    #[test]
    fn test_hsl_to_hex_reference_blue() {
        let rgb = hsl_to_rgb(Hsl::new(217.0, 91.0, 60.0));
        assert!((i16::from(rgb.r) - 0x3b).abs() <= 1, "r = {}", rgb.r);
        assert!((i16::from(rgb.g) - 0x82).abs() <= 1, "g = {}", rgb.g);
        assert!((i16::from(rgb.b) - 0xf6).abs() <= 1, "b = {}", rgb.b);
    }

    #[test]
    fn test_primaries() {
        assert_eq!(hsl_to_hex(Hsl::new(0.0, 100.0, 50.0)), "#ff0000");
        assert_eq!(hsl_to_hex(Hsl::new(120.0, 100.0, 50.0)), "#00ff00");
        assert_eq!(hsl_to_hex(Hsl::new(240.0, 100.0, 50.0)), "#0000ff");
        assert_close(hex_to_hsl("#00ff00").unwrap().h, 120.0, 1e-9);
        assert_close(hex_to_hsl("#0000ff").unwrap().h, 240.0, 1e-9);
        assert_close(hex_to_hsl("#ff00ff").unwrap().h, 300.0, 1e-9);
    }

    #[test]
    fn test_achromatic_has_no_saturation() {
        for hex in ["#808080", "#000000", "#ffffff"] {
            let hsl = hex_to_hsl(hex).unwrap();
            assert_eq!(hsl.s, 0.0, "{hex}");
            assert_eq!(hsl.h, 0.0, "{hex}");
        }
        assert_eq!(hex_to_hsl("#ffffff").unwrap().l, 100.0);
        assert_eq!(hex_to_hsl("#000000").unwrap().l, 0.0);
    }

    #[test]
    fn test_hex_hsl_round_trip_is_exact() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let rgb = Rgb::new(r, g, b);
                    assert_eq!(hsl_to_rgb(rgb_to_hsl(rgb)), rgb, "{}", rgb.to_hex());
                }
            }
        }
    }

    #[test]
    fn test_hsl_to_rgb_clamps_out_of_range_inputs() {
        assert_eq!(hsl_to_hex(Hsl::new(0.0, 150.0, 120.0)), "#ffffff");
        assert_eq!(hsl_to_hex(Hsl::new(0.0, -5.0, -10.0)), "#000000");
        assert_eq!(
            hsl_to_hex(Hsl::new(-120.0, 100.0, 50.0)),
            hsl_to_hex(Hsl::new(240.0, 100.0, 50.0))
        );
    }

    #[test]
    fn test_rotated_wraps() {
        let hsl = Hsl::new(300.0, 50.0, 50.0).rotated(120.0);
        assert_close(hsl.h, 60.0, 1e-9);
        assert_eq!(hsl.s, 50.0);
    }

    #[test]
    fn test_display_labels() {
        let rgb = parse_hex("#3b82f6").unwrap();
        assert_eq!(rgb.to_string(), "RGB(59, 130, 246)");
        assert_eq!(rgb.to_hsl().to_string(), "HSL(217, 91%, 60%)");
    }

    // =========================================================================
    // Hue arithmetic
    // =========================================================================

    #[test]
    fn test_normalize_hue() {
        assert_eq!(normalize_hue(0.0), 0.0);
        assert_eq!(normalize_hue(360.0), 0.0);
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(725.0), 5.0);
        assert_eq!(normalize_hue(-1e-20), 0.0);
    }

    #[test]
    fn test_normalize_hue_is_periodic() {
        for h in [-400.0, -180.0, -0.5, 0.0, 37.25, 180.0, 359.9, 1000.0] {
            assert_close(normalize_hue(h + 360.0), normalize_hue(h), 1e-9);
        }
    }

    // =========================================================================
    // Luminance and contrast
    // =========================================================================

    #[test]
    fn test_relative_luminance_extremes() {
        assert_close(relative_luminance(Rgb::new(255, 255, 255)), 1.0, 1e-9);
        assert_eq!(relative_luminance(Rgb::new(0, 0, 0)), 0.0);
        let green = relative_luminance(Rgb::new(0, 255, 0));
        assert_close(green, 0.7152, 1e-9);
    }

    #[test]
    fn test_contrasting_text_color() {
        assert_eq!(contrasting_text_color_for_hex("#ffffff").unwrap(), DARK_LABEL);
        assert_eq!(contrasting_text_color_for_hex("#000000").unwrap(), LIGHT_LABEL);
        assert_eq!(contrasting_text_color_for_hex("#ffff00").unwrap(), DARK_LABEL);
        assert_eq!(contrasting_text_color_for_hex("#000080").unwrap(), LIGHT_LABEL);
        assert!(contrasting_text_color_for_hex("#12").is_err());
    }

    #[test]
    fn test_glow_color() {
        assert_eq!(glow_color(Rgb::new(255, 255, 255)), DARK_GLOW);
        assert_eq!(glow_color(Rgb::new(0, 0, 0)), LIGHT_GLOW);
    }

    // =========================================================================
    // Gradient mapping
    // =========================================================================

    #[test]
    fn test_gradient_top_left_is_white() {
        let hsl = gradient_position_to_hsl(0.0, 0.0, 100.0, 100.0);
        assert_eq!(hsl, Hsl::new(0.0, 100.0, 100.0));
        assert_eq!(hsl.to_hex(), "#ffffff");
    }

    #[test]
    fn test_gradient_bottom_middle_is_black() {
        let hsl = gradient_position_to_hsl(50.0, 100.0, 100.0, 100.0);
        assert_eq!(hsl, Hsl::new(180.0, 100.0, 0.0));
    }

    #[test]
    fn test_gradient_midline_is_pure_hue() {
        let hsl = gradient_position_to_hsl(0.0, 50.0, 100.0, 100.0);
        assert_eq!(hsl.l, 50.0);
        assert_eq!(hsl.to_hex(), "#ff0000");
        assert_eq!(gradient_position_to_hsl(0.0, 25.0, 100.0, 100.0).l, 75.0);
        assert_eq!(gradient_position_to_hsl(0.0, 75.0, 200.0, 100.0).l, 25.0);
    }

    #[test]
    fn test_gradient_clamps_coordinates() {
        let hsl = gradient_position_to_hsl(-20.0, 250.0, 100.0, 200.0);
        assert_eq!(hsl, Hsl::new(0.0, 100.0, 0.0));
        // Right edge wraps to hue 0, which is the same color as hue 360
        let edge = gradient_position_to_hsl(150.0, 0.0, 100.0, 100.0);
        assert_eq!(edge.h, 0.0);
    }

    #[test]
    fn test_gradient_degenerate_surface() {
        let hsl = gradient_position_to_hsl(10.0, 10.0, 0.0, f64::NAN);
        assert_eq!(hsl, Hsl::new(0.0, 100.0, 100.0));
    }
}
