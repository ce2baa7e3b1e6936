//! Harmony-based palette generation
//!
//! Given a base color, a harmony rule and a size, produces an ordered list
//! of related colors. Generation is deterministic and never fails: size is
//! clamped into range and every lightness/saturation adjustment is clamped
//! back into a visible band (pure black and white carry no hue).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{normalize_hex, parse_hex, rgb_to_hsl, Hsl, Rgb};
use crate::error::{Result, SwatchError};

/// Smallest palette the picker generates.
pub const MIN_PALETTE_SIZE: usize = 2;
/// Largest palette the picker generates.
pub const MAX_PALETTE_SIZE: usize = 10;

/// Lightness band for tints and shades.
const SHADE_LIGHTNESS: (f64, f64) = (5.0, 95.0);
/// Lightness step between successive tints/shades.
const SHADE_STEP: f64 = 15.0;

const ANALOGOUS_ANGLE: f64 = 30.0;
const ANALOGOUS_JITTER: f64 = 8.0;
const ANALOGOUS_LIGHTNESS: (f64, f64) = (10.0, 90.0);
const ANALOGOUS_SATURATION: (f64, f64) = (20.0, 100.0);

/// Fraction of the even lightness split actually used, so the outermost
/// monochromatic steps stop short of white and black.
const MONOCHROMATIC_SPREAD: f64 = 0.8;

/// Strategy for choosing colors related to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyRule {
    /// Base, its opposite hue, then tints and shades of both.
    #[default]
    Complementary,
    /// Neighbouring hues 30° apart on either side of the base.
    Analogous,
    /// Three hues 120° apart, then tints and shades of each.
    Triadic,
    /// One hue, lightness only.
    Monochromatic,
}

impl HarmonyRule {
    pub const ALL: [Self; 4] = [
        Self::Complementary,
        Self::Analogous,
        Self::Triadic,
        Self::Monochromatic,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Analogous => "analogous",
            Self::Triadic => "triadic",
            Self::Monochromatic => "monochromatic",
        }
    }
}

impl FromStr for HarmonyRule {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complementary" => Ok(Self::Complementary),
            "analogous" => Ok(Self::Analogous),
            "triadic" => Ok(Self::Triadic),
            "monochromatic" => Ok(Self::Monochromatic),
            _ => Err(SwatchError::UnknownRule(s.to_string())),
        }
    }
}

impl fmt::Display for HarmonyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a user-supplied palette size.
///
/// # Errors
/// Returns [`SwatchError::InvalidSize`] outside `2..=10`.
pub fn validate_palette_size(size: i64) -> Result<usize> {
    usize::try_from(size)
        .ok()
        .filter(|n| (MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE).contains(n))
        .ok_or(SwatchError::InvalidSize {
            size,
            min: MIN_PALETTE_SIZE,
            max: MAX_PALETTE_SIZE,
        })
}

/// Force a palette size into `2..=10`.
#[must_use]
pub fn clamp_palette_size(size: i64) -> usize {
    usize::try_from(size.max(0))
        .unwrap_or(MAX_PALETTE_SIZE)
        .clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE)
}

/// An ordered list of colors in canonical `#rrggbb` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from hex strings in any accepted form.
    ///
    /// # Errors
    /// Fails on the first malformed entry.
    pub fn from_hex_colors<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|c| normalize_hex(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { colors })
    }

    fn from_rgb(colors: Vec<Rgb>) -> Self {
        Self {
            colors: colors.into_iter().map(Rgb::to_hex).collect(),
        }
    }

    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.colors.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, hex: &str) -> bool {
        self.position(hex).is_some()
    }

    /// Remove the first entry equal to `hex` (case-insensitive), keeping the
    /// order of the rest. Returns whether anything was removed.
    pub fn remove(&mut self, hex: &str) -> bool {
        match self.position(hex) {
            Some(index) => {
                self.colors.remove(index);
                true
            }
            None => false,
        }
    }

    /// Plain-text export: one color per line.
    #[must_use]
    pub fn export_text(&self) -> String {
        self.colors.join("\n")
    }

    fn position(&self, hex: &str) -> Option<usize> {
        let needle = hex.trim();
        self.colors
            .iter()
            .position(|c| c.eq_ignore_ascii_case(needle))
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Generate a palette of `size` colors around `base`.
///
/// The base color is the first entry, except for monochromatic palettes
/// which are sorted from lightest to darkest and carry the base wherever its
/// lightness puts it.
#[must_use]
pub fn generate_palette(base: Rgb, rule: HarmonyRule, size: usize) -> Palette {
    let size = size.clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE);
    let seed = rgb_to_hsl(base);

    let mut colors = match rule {
        HarmonyRule::Complementary => complementary(base, seed, size),
        HarmonyRule::Analogous => analogous(base, seed, size),
        HarmonyRule::Triadic => triadic(base, seed, size),
        HarmonyRule::Monochromatic => monochromatic(base, seed, size),
    };
    colors.truncate(size);

    tracing::debug!(base = %base.to_hex(), %rule, size, "Generated palette");
    Palette::from_rgb(colors)
}

/// String entry point used by the UI layer.
///
/// An unrecognised rule tag is not an error: the palette is just the base.
///
/// # Errors
/// Returns [`SwatchError::InvalidHex`] for a malformed base color.
pub fn generate_palette_for_tag(hex: &str, rule: &str, size: usize) -> Result<Palette> {
    let base = parse_hex(hex)?;
    match rule.parse::<HarmonyRule>() {
        Ok(rule) => Ok(generate_palette(base, rule, size)),
        Err(_) => {
            tracing::warn!(rule, "Unknown harmony rule, palette is the base color only");
            Ok(Palette::from_rgb(vec![base]))
        }
    }
}

fn complementary(base: Rgb, seed: Hsl, size: usize) -> Vec<Rgb> {
    let complement = seed.rotated(180.0);
    let mut colors = vec![base, complement.to_rgb()];

    // Remaining slots come in pairs (base hue, complement hue). Pairs
    // alternate tint/shade and the step grows every second pair:
    // +15, -15, +30, -30.
    for i in 2..size {
        let source = if i % 2 == 0 { seed } else { complement };
        let pair = (i - 2) / 2;
        let step = SHADE_STEP * (pair / 2 + 1) as f64;
        let lightness = if pair % 2 == 0 {
            source.l + step
        } else {
            source.l - step
        };
        colors.push(with_lightness(source, lightness, SHADE_LIGHTNESS).to_rgb());
    }
    colors
}

fn analogous(base: Rgb, seed: Hsl, size: usize) -> Vec<Rgb> {
    let mut colors = vec![base];

    for i in 1..size {
        // Odd slots go clockwise and come out a little darker and more
        // saturated; even slots go counter-clockwise, lighter and softer.
        let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
        let hsl = Hsl::new(
            seed.h + sign * ANALOGOUS_ANGLE * i.div_ceil(2) as f64,
            clamp(sign.mul_add(ANALOGOUS_JITTER, seed.s), ANALOGOUS_SATURATION),
            clamp((-sign).mul_add(ANALOGOUS_JITTER, seed.l), ANALOGOUS_LIGHTNESS),
        );
        colors.push(hsl.to_rgb());
    }
    colors
}

fn triadic(base: Rgb, seed: Hsl, size: usize) -> Vec<Rgb> {
    let mut colors = vec![base];

    for i in 1..size {
        let hue = seed.rotated(120.0 * (i % 3) as f64);
        // Past the first three, alternate lighter (odd) and darker (even)
        // with a step growing every two slots: 15, 15, 30, 30, ...
        let hsl = if i < 3 {
            hue
        } else {
            let step = SHADE_STEP * (i - 2).div_ceil(2) as f64;
            let lightness = if i % 2 == 1 {
                seed.l + step
            } else {
                seed.l - step
            };
            with_lightness(hue, lightness, SHADE_LIGHTNESS)
        };
        colors.push(hsl.to_rgb());
    }
    colors
}

fn monochromatic(base: Rgb, seed: Hsl, size: usize) -> Vec<Rgb> {
    let step = 100.0 / size as f64 * MONOCHROMATIC_SPREAD;
    let mut colors = vec![base];

    for i in 1..size {
        let offset = step * i.div_ceil(2) as f64;
        let lightness = if i % 2 == 1 {
            seed.l + offset
        } else {
            seed.l - offset
        };
        colors.push(with_lightness(seed, lightness, SHADE_LIGHTNESS).to_rgb());
    }

    // Lightest first. Compare the lightness of the rounded colors, not the
    // requested values, so the order holds for what is actually shown.
    colors.sort_by(|a, b| rgb_to_hsl(*b).l.total_cmp(&rgb_to_hsl(*a).l));
    colors
}

fn with_lightness(hsl: Hsl, lightness: f64, band: (f64, f64)) -> Hsl {
    Hsl {
        l: clamp(lightness, band),
        ..hsl
    }
}

fn clamp(value: f64, (min, max): (f64, f64)) -> f64 {
    value.clamp(min, max)
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
    use crate::color::hex_to_hsl;

    fn blue() -> Rgb {
        parse_hex("#3b82f6").unwrap()
    }

    fn hue_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % 360.0;
        d.min(360.0 - d)
    }

    // =========================================================================
    // Rule tags and sizes
    // =========================================================================

    #[test]
    fn test_rule_parse_and_display() {
        for rule in HarmonyRule::ALL {
            assert_eq!(rule.as_str().parse::<HarmonyRule>().unwrap(), rule);
            assert_eq!(rule.to_string(), rule.as_str());
        }
        assert_eq!(
            " Triadic ".parse::<HarmonyRule>().unwrap(),
            HarmonyRule::Triadic
        );
        assert!(matches!(
            "square".parse::<HarmonyRule>(),
            Err(SwatchError::UnknownRule(_))
        ));
    }

    #[test]
    fn test_rule_serde_tags() {
        let json = serde_json::to_string(&HarmonyRule::Monochromatic).unwrap();
        assert_eq!(json, "\"monochromatic\"");
        let rule: HarmonyRule = serde_json::from_str("\"analogous\"").unwrap();
        assert_eq!(rule, HarmonyRule::Analogous);
    }

    #[test]
    fn test_validate_palette_size() {
        assert_eq!(validate_palette_size(2).unwrap(), 2);
        assert_eq!(validate_palette_size(10).unwrap(), 10);
        for bad in [-3, 0, 1, 11, 1000] {
            let err = validate_palette_size(bad).unwrap_err();
            assert!(matches!(err, SwatchError::InvalidSize { size, .. } if size == bad));
        }
    }

    #[test]
    fn test_clamp_palette_size() {
        assert_eq!(clamp_palette_size(-5), MIN_PALETTE_SIZE);
        assert_eq!(clamp_palette_size(1), MIN_PALETTE_SIZE);
        assert_eq!(clamp_palette_size(6), 6);
        assert_eq!(clamp_palette_size(i64::MAX), MAX_PALETTE_SIZE);
    }

    // =========================================================================
    // Generation
    // =========================================================================

    #[test]
    fn test_every_rule_and_size_yields_exact_count() {
        for rule in HarmonyRule::ALL {
            for size in MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE {
                let palette = generate_palette(blue(), rule, size);
                assert_eq!(palette.len(), size, "{rule} x {size}");
                for hex in &palette {
                    assert_eq!(hex.len(), 7);
                    assert_eq!(normalize_hex(hex).unwrap(), *hex);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_size_is_clamped() {
        assert_eq!(generate_palette(blue(), HarmonyRule::Triadic, 0).len(), 2);
        assert_eq!(generate_palette(blue(), HarmonyRule::Analogous, 50).len(), 10);
    }

    #[test]
    fn test_base_comes_first() {
        for rule in [
            HarmonyRule::Complementary,
            HarmonyRule::Analogous,
            HarmonyRule::Triadic,
        ] {
            let palette = generate_palette(blue(), rule, 6);
            assert_eq!(palette.first(), Some("#3b82f6"), "{rule}");
        }
    }

    #[test]
    fn test_complementary_pair() {
        let palette = generate_palette(blue(), HarmonyRule::Complementary, 2);
        let seed = rgb_to_hsl(blue());
        assert_eq!(
            palette.colors(),
            ["#3b82f6".to_string(), seed.rotated(180.0).to_hex()]
        );
        let complement = hex_to_hsl(&palette.colors()[1]).unwrap();
        assert!(hue_distance(complement.h, 37.0) <= 1.0, "{}", complement.h);
    }

    #[test]
    fn test_complementary_tints_then_shades() {
        let palette = generate_palette(parse_hex("#ff0000").unwrap(), HarmonyRule::Complementary, 6);
        let l: Vec<f64> = palette.iter().map(|c| hex_to_hsl(c).unwrap().l).collect();
        assert_eq!(palette.colors()[1], "#00ffff");
        assert!(l[2] > 50.0 && l[3] > 50.0, "{l:?}");
        assert!(l[4] < 50.0 && l[5] < 50.0, "{l:?}");
        assert!(hue_distance(hex_to_hsl(&palette.colors()[3]).unwrap().h, 180.0) < 1.0);
    }

    #[test]
    fn test_analogous_alternates_around_base() {
        let palette = generate_palette(parse_hex("#ff0000").unwrap(), HarmonyRule::Analogous, 5);
        let hues: Vec<f64> = palette.iter().map(|c| hex_to_hsl(c).unwrap().h).collect();
        for (hue, expected) in hues.iter().zip([0.0, 30.0, 330.0, 60.0, 300.0]) {
            assert!(hue_distance(*hue, expected) <= 1.0, "{hues:?}");
        }
    }

    #[test]
    fn test_triadic_primaries() {
        let palette = generate_palette(parse_hex("#ff0000").unwrap(), HarmonyRule::Triadic, 3);
        assert_eq!(palette.colors(), ["#ff0000", "#00ff00", "#0000ff"]);
    }

    #[test]
    fn test_triadic_cycles_hues_with_shades() {
        let palette = generate_palette(parse_hex("#ff0000").unwrap(), HarmonyRule::Triadic, 6);
        let hsl: Vec<Hsl> = palette.iter().map(|c| hex_to_hsl(c).unwrap()).collect();
        assert!(hue_distance(hsl[3].h, 0.0) < 1.0);
        assert!(hsl[3].l > 50.0);
        assert!(hue_distance(hsl[4].h, 120.0) < 1.0);
        assert!(hsl[4].l < 50.0);
        assert!(hue_distance(hsl[5].h, 240.0) < 1.0);
        assert!(hsl[5].l > hsl[3].l);
    }

    #[test]
    fn test_monochromatic_sorted_and_keeps_hue() {
        for size in MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE {
            let palette = generate_palette(blue(), HarmonyRule::Monochromatic, size);
            let lightness: Vec<f64> = palette.iter().map(|c| hex_to_hsl(c).unwrap().l).collect();
            assert!(
                lightness.windows(2).all(|w| w[0] >= w[1]),
                "size {size}: {lightness:?}"
            );
            assert!(palette.contains("#3b82f6"));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        for rule in HarmonyRule::ALL {
            assert_eq!(
                generate_palette(blue(), rule, 7),
                generate_palette(blue(), rule, 7)
            );
        }
    }

    #[test]
    fn test_lightness_stays_in_visible_band() {
        let near_white = parse_hex("#fafafa").unwrap();
        let palette = generate_palette(near_white, HarmonyRule::Monochromatic, 10);
        for hex in palette.iter().filter(|c| c.as_str() != "#fafafa") {
            assert!(hex_to_hsl(hex).unwrap().l <= 95.5, "{hex}");
        }
    }

    #[test]
    fn test_unknown_tag_falls_back_to_base() {
        let palette = generate_palette_for_tag("#3B82F6", "tetradic", 5).unwrap();
        assert_eq!(palette.colors(), ["#3b82f6"]);
        assert!(generate_palette_for_tag("#zzz", "triadic", 5).is_err());
    }

    // =========================================================================
    // Palette editing
    // =========================================================================

    #[test]
    fn test_remove_first_match_only() {
        let mut palette = Palette::from_hex_colors(["#111111", "#AABBCC", "#222222", "#aabbcc"]).unwrap();
        assert!(palette.remove("#AaBbCc"));
        assert_eq!(palette.colors(), ["#111111", "#222222", "#aabbcc"]);
        assert!(!palette.remove("#333333"));
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_export_text() {
        let palette = Palette::from_hex_colors(["#FF0000", "0f0"]).unwrap();
        assert_eq!(palette.export_text(), "#ff0000\n#00ff00");
        assert_eq!(Palette::new().export_text(), "");
    }

    #[test]
    fn test_palette_serializes_as_array() {
        let palette = Palette::from_hex_colors(["#ff0000"]).unwrap();
        assert_eq!(serde_json::to_string(&palette).unwrap(), "[\"#ff0000\"]");
    }
}
