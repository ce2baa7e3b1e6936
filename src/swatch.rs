//! Display data for a single color swatch.

use serde::Serialize;

use crate::color::{contrasting_text_color, glow_color, parse_hex, Rgb};
use crate::error::Result;

/// Everything the UI shows on or around one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    /// Canonical `#rrggbb`, used as the background and the copied value.
    pub hex: String,
    /// `#RRGGBB`
    pub hex_label: String,
    /// `RGB(r, g, b)`
    pub rgb_label: String,
    /// `HSL(h, s%, l%)`
    pub hsl_label: String,
    /// Readable label color on this background.
    pub text_color: &'static str,
    /// Glow shown after copying.
    pub glow_color: &'static str,
}

impl Swatch {
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self {
            hex: rgb.to_hex(),
            hex_label: rgb.to_hex_upper(),
            rgb_label: rgb.to_string(),
            hsl_label: rgb.to_hsl().to_string(),
            text_color: contrasting_text_color(rgb),
            glow_color: glow_color(rgb),
        }
    }

    /// # Errors
    /// Returns [`crate::SwatchError::InvalidHex`] for a malformed color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        parse_hex(hex).map(Self::from_rgb)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::color::{DARK_LABEL, LIGHT_GLOW, LIGHT_LABEL};

    #[test]
    fn test_labels() {
        let swatch = Swatch::from_hex("3B82F6").unwrap();
        assert_eq!(swatch.hex, "#3b82f6");
        assert_eq!(swatch.hex_label, "#3B82F6");
        assert_eq!(swatch.rgb_label, "RGB(59, 130, 246)");
        assert_eq!(swatch.hsl_label, "HSL(217, 91%, 60%)");
        assert_eq!(swatch.text_color, DARK_LABEL);
        assert_eq!(swatch.glow_color, LIGHT_GLOW);
    }

    #[test]
    fn test_dark_swatch_gets_light_label() {
        let swatch = Swatch::from_hex("#101010").unwrap();
        assert_eq!(swatch.text_color, LIGHT_LABEL);
        assert!(Swatch::from_hex("#1010").is_err());
    }
}
