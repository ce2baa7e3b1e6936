//! Palette generation and color conversion through the public API.
//!
//! Tests cover:
//! 1. Palette length and canonical entries for every rule and size
//! 2. Base color placement (first, or sorted in for monochromatic)
//! 3. Hue relationships of complementary and triadic palettes
//! 4. Unknown rules and malformed base colors
//! 5. Hex/HSL round trips and label contrast
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use swatchbook::color::{
    contrasting_text_color_for_hex, hex_to_hsl, hsl_to_hex, normalize_hex, parse_hex, DARK_LABEL,
    LIGHT_LABEL,
};
use swatchbook::palette::{generate_palette, generate_palette_for_tag, HarmonyRule};
use swatchbook::{Hsl, Rgb};
use test_case::test_case;

const BLUE: &str = "#3b82f6";

fn is_canonical(hex: &str) -> bool {
    hex.len() == 7
        && hex.starts_with('#')
        && hex[1..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Shortest angular distance between two hues.
fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test_case(HarmonyRule::Complementary ; "complementary")]
#[test_case(HarmonyRule::Analogous ; "analogous")]
#[test_case(HarmonyRule::Triadic ; "triadic")]
#[test_case(HarmonyRule::Monochromatic ; "monochromatic")]
fn test_palette_has_requested_size(rule: HarmonyRule) {
    let base = parse_hex(BLUE).unwrap();
    for size in 2..=10 {
        let palette = generate_palette(base, rule, size);
        assert_eq!(palette.len(), size, "{rule} size {size}");
        for hex in &palette {
            assert!(is_canonical(hex), "{rule}: {hex}");
        }
    }
}

#[test_case(HarmonyRule::Complementary ; "complementary")]
#[test_case(HarmonyRule::Analogous ; "analogous")]
#[test_case(HarmonyRule::Triadic ; "triadic")]
fn test_base_is_first(rule: HarmonyRule) {
    for hex in [BLUE, "#ff0000", "#808080", "#000000", "#ffffff"] {
        let palette = generate_palette(parse_hex(hex).unwrap(), rule, 6);
        assert_eq!(palette.first(), Some(hex));
    }
}

#[test_case(1, 2 ; "below minimum")]
#[test_case(0, 2 ; "zero")]
#[test_case(11, 10 ; "above maximum")]
#[test_case(500, 10 ; "far above maximum")]
fn test_size_is_clamped(requested: usize, expected: usize) {
    let palette = generate_palette(Rgb::new(200, 40, 90), HarmonyRule::Analogous, requested);
    assert_eq!(palette.len(), expected);
}

#[test]
fn test_monochromatic_sorted_lightest_first() {
    for size in 2..=10 {
        let palette = generate_palette(parse_hex(BLUE).unwrap(), HarmonyRule::Monochromatic, size);
        assert!(palette.contains(BLUE));

        let lightness: Vec<f64> = palette.iter().map(|c| hex_to_hsl(c).unwrap().l).collect();
        for pair in lightness.windows(2) {
            assert!(pair[0] >= pair[1], "size {size}: {lightness:?}");
        }
    }
}

#[test]
fn test_monochromatic_keeps_hue() {
    let seed = hex_to_hsl(BLUE).unwrap();
    let palette = generate_palette(parse_hex(BLUE).unwrap(), HarmonyRule::Monochromatic, 5);
    for hex in &palette {
        let hsl = hex_to_hsl(hex).unwrap();
        // Near-white and near-black lose hue precision in 8 bits
        if hsl.l > 10.0 && hsl.l < 90.0 {
            assert!(hue_distance(hsl.h, seed.h) < 3.0, "{hex}");
        }
    }
}

#[test]
fn test_complementary_second_color_is_opposite() {
    let seed = hex_to_hsl(BLUE).unwrap();
    let palette = generate_palette(parse_hex(BLUE).unwrap(), HarmonyRule::Complementary, 2);
    let complement = hex_to_hsl(&palette.colors()[1]).unwrap();
    assert!(hue_distance(complement.h, seed.h + 180.0) < 2.0);
    assert!((complement.l - seed.l).abs() < 1.0);
}

#[test]
fn test_complementary_of_red() {
    let palette = generate_palette_for_tag("#ff0000", "complementary", 2).unwrap();
    assert_eq!(palette.colors(), ["#ff0000", "#00ffff"]);
}

#[test]
fn test_triadic_of_red() {
    let palette = generate_palette_for_tag("#f00", "triadic", 3).unwrap();
    assert_eq!(palette.colors(), ["#ff0000", "#00ff00", "#0000ff"]);
}

#[test]
fn test_triadic_hues_are_a_third_apart() {
    let seed = hex_to_hsl(BLUE).unwrap();
    let palette = generate_palette(parse_hex(BLUE).unwrap(), HarmonyRule::Triadic, 3);
    let second = hex_to_hsl(&palette.colors()[1]).unwrap();
    let third = hex_to_hsl(&palette.colors()[2]).unwrap();
    assert!(hue_distance(second.h, seed.h + 120.0) < 2.0);
    assert!(hue_distance(third.h, seed.h + 240.0) < 2.0);
}

#[test]
fn test_analogous_stays_near_base_hue() {
    let seed = hex_to_hsl(BLUE).unwrap();
    let palette = generate_palette(parse_hex(BLUE).unwrap(), HarmonyRule::Analogous, 5);
    for hex in palette.iter().skip(1) {
        let hsl = hex_to_hsl(hex).unwrap();
        let distance = hue_distance(hsl.h, seed.h);
        assert!(distance > 25.0 && distance < 65.0, "{hex}: {distance}");
    }
}

#[test]
fn test_complementary_pairs_alternate_tint_and_shade() {
    let base = hex_to_hsl("#808080").unwrap();
    let palette = generate_palette_for_tag("#808080", "complementary", 6).unwrap();
    let lightness: Vec<f64> = palette.iter().map(|c| hex_to_hsl(c).unwrap().l).collect();
    // First pair is lighter, second pair darker
    assert!(lightness[2] > base.l + 10.0 && lightness[3] > base.l + 10.0);
    assert!(lightness[4] < base.l - 10.0 && lightness[5] < base.l - 10.0);
}

#[test]
fn test_analogous_jitter_follows_direction() {
    let seed = hex_to_hsl(BLUE).unwrap();
    let palette = generate_palette_for_tag(BLUE, "analogous", 3).unwrap();
    let clockwise = hex_to_hsl(&palette.colors()[1]).unwrap();
    let counter = hex_to_hsl(&palette.colors()[2]).unwrap();
    assert!(clockwise.l < seed.l - 5.0);
    assert!(counter.l > seed.l + 5.0);
}

#[test_case("sepia" ; "unknown word")]
#[test_case("" ; "empty")]
#[test_case("pastel" ; "another unknown word")]
fn test_unknown_rule_returns_base(rule: &str) {
    let palette = generate_palette_for_tag("#3B82F6", rule, 5).unwrap();
    assert_eq!(palette.colors(), [BLUE]);
}

#[test_case("#3b82f" ; "five digits")]
#[test_case("#gggggg" ; "not hex")]
#[test_case("#" ; "hash only")]
#[test_case("" ; "empty")]
fn test_malformed_base_is_rejected(hex: &str) {
    assert!(generate_palette_for_tag(hex, "triadic", 3).is_err());
}

#[test]
fn test_rule_tags_ignore_case() {
    let palette = generate_palette_for_tag("3b82f6", " Triadic", 3).unwrap();
    assert_eq!(palette.len(), 3);
    assert_eq!(palette.first(), Some(BLUE));
}

#[test]
fn test_hex_round_trip_is_lossless() {
    for hex in [BLUE, "#000000", "#ffffff", "#808080", "#123456", "#fedcba", "#00ff7f"] {
        let hsl = hex_to_hsl(hex).unwrap();
        assert_eq!(hsl_to_hex(hsl), hex);
    }
}

#[test]
fn test_normalize_hex_forms() {
    assert_eq!(normalize_hex("#ABC").unwrap(), "#aabbcc");
    assert_eq!(normalize_hex("  #3B82F6 ").unwrap(), BLUE);
}

#[test]
fn test_hsl_extremes() {
    assert_eq!(hsl_to_hex(Hsl::new(0.0, 0.0, 100.0)), "#ffffff");
    assert_eq!(hsl_to_hex(Hsl::new(240.0, 100.0, 0.0)), "#000000");
    assert_eq!(hsl_to_hex(Hsl::new(360.0, 100.0, 50.0)), "#ff0000");
}

#[test_case("#ffffff", DARK_LABEL ; "white")]
#[test_case("#ffd700", DARK_LABEL ; "gold")]
#[test_case("#000000", LIGHT_LABEL ; "black")]
#[test_case("#1e3a8a", LIGHT_LABEL ; "navy")]
fn test_label_contrast(background: &str, expected: &str) {
    assert_eq!(contrasting_text_color_for_hex(background).unwrap(), expected);
}
