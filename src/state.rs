//! Picker state and its transitions.
//!
//! Every UI action (pointer move, click, slider input, button press) is a
//! [`PickerEvent`]; [`PickerState::apply`] maps the old state and an event to
//! a new state without touching the old one. Rendering, persistence and
//! clipboard work happen outside, driven by the returned state.

use serde::{Deserialize, Serialize};

use crate::color::{gradient_position_to_hsl, parse_hex, rgb_to_hsl, Hsl, Rgb, DARK_LABEL};
use crate::config::{PickerConfig, DEFAULT_COLOR};
use crate::error::{Result, SwatchError};
use crate::history::History;
use crate::palette::{
    clamp_palette_size, generate_palette, validate_palette_size, HarmonyRule, Palette,
    MAX_PALETTE_SIZE, MIN_PALETTE_SIZE,
};
use crate::swatch::Swatch;

/// A user action on the picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PickerEvent {
    /// Pointer moved over the gradient surface.
    GradientHover {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Pointer left the gradient surface.
    GradientLeave,
    /// Gradient surface clicked.
    GradientClick {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Any of the three HSL sliders moved.
    Slider { h: f64, s: f64, l: f64 },
    /// A typed or pasted color.
    SelectColor { hex: String },
    /// A history swatch picked.
    SelectHistory { hex: String },
    SetRule { rule: HarmonyRule },
    /// Raw size input; clamped into range.
    SetSize { size: i64 },
    /// Size arrow buttons.
    StepSize { up: bool },
    Generate,
    /// Remove button on a palette entry.
    RemoveColor { hex: String },
    ClosePalette,
    Escape,
}

/// The whole picker state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerState {
    /// Selected color.
    pub current: Rgb,
    /// HSL of the selection. Holds the slider values verbatim when the
    /// selection came from the sliders.
    pub current_hsl: Hsl,
    /// Color shown in the preview; follows the pointer while unlocked.
    pub preview: Rgb,
    /// Preview pinned to the selection.
    pub locked: bool,
    /// Show the "click a palette color to copy" hint.
    pub show_instruction: bool,
    pub history: History,
    pub palette: Palette,
    pub palette_visible: bool,
    pub rule: HarmonyRule,
    pub size: usize,
}

impl PickerState {
    /// Fresh state for `config`.
    #[must_use]
    pub fn new(config: &PickerConfig) -> Self {
        let current = parse_hex(&config.default_color)
            .or_else(|_| parse_hex(DEFAULT_COLOR))
            .unwrap_or(Rgb::new(0x3b, 0x82, 0xf6));
        Self {
            current,
            current_hsl: rgb_to_hsl(current),
            preview: current,
            locked: false,
            show_instruction: false,
            history: History::with_capacity(config.history_capacity),
            palette: Palette::new(),
            palette_visible: false,
            rule: config.default_rule,
            size: clamp_size(config.default_size),
        }
    }

    /// Selected color as `#rrggbb`.
    #[must_use]
    pub fn current_hex(&self) -> String {
        self.current.to_hex()
    }

    /// Apply one event.
    ///
    /// # Errors
    /// [`SwatchError::InvalidHex`] for a malformed selected color and
    /// [`SwatchError::InvalidSize`] when generating with an out-of-range
    /// size. The state is unchanged in both cases.
    pub fn apply(&self, event: &PickerEvent) -> Result<Self> {
        let mut next = self.clone();
        match event {
            PickerEvent::GradientHover {
                x,
                y,
                width,
                height,
            } => {
                if !next.locked {
                    next.preview = gradient_position_to_hsl(*x, *y, *width, *height).to_rgb();
                    next.show_instruction = false;
                }
            }
            PickerEvent::GradientLeave => {
                if !next.locked {
                    next.preview = next.current;
                    next.show_instruction = false;
                }
            }
            PickerEvent::GradientClick {
                x,
                y,
                width,
                height,
            } => {
                let rgb = gradient_position_to_hsl(*x, *y, *width, *height).to_rgb();
                next.pick(rgb)?;
            }
            PickerEvent::Slider { h, s, l } => {
                let hsl = Hsl::new(h.clamp(0.0, 360.0), s.clamp(0.0, 100.0), l.clamp(0.0, 100.0));
                next.current = hsl.to_rgb();
                next.current_hsl = hsl;
                next.unlock();
            }
            PickerEvent::SelectColor { hex } | PickerEvent::SelectHistory { hex } => {
                next.pick(parse_hex(hex)?)?;
            }
            PickerEvent::SetRule { rule } => next.rule = *rule,
            PickerEvent::SetSize { size } => next.size = clamp_palette_size(*size),
            PickerEvent::StepSize { up } => {
                next.size = if *up {
                    next.size.saturating_add(1)
                } else {
                    next.size.saturating_sub(1)
                }
                .clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE);
            }
            PickerEvent::Generate => {
                let size = validate_palette_size(i64::try_from(next.size).unwrap_or(i64::MAX))?;
                next.palette = generate_palette(next.current, next.rule, size);
                next.palette_visible = true;
                next.history.push(&next.current.to_hex())?;
                next.preview = next.current;
                next.locked = true;
                next.show_instruction = false;
            }
            PickerEvent::RemoveColor { hex } => {
                if next.palette.remove(hex) && next.palette.is_empty() {
                    next.palette_visible = false;
                    next.unlock();
                }
            }
            PickerEvent::ClosePalette => {
                if next.palette_visible {
                    next.palette_visible = false;
                    next.unlock();
                }
            }
            PickerEvent::Escape => {
                if next.palette_visible {
                    next.palette_visible = false;
                }
                next.unlock();
            }
        }
        Ok(next)
    }

    /// Palette as newline-separated hex, for download.
    ///
    /// # Errors
    /// [`SwatchError::EmptyPalette`] when there is nothing to export.
    pub fn export_text(&self) -> Result<String> {
        if self.palette.is_empty() {
            return Err(SwatchError::EmptyPalette);
        }
        Ok(self.palette.export_text())
    }

    /// Render-ready snapshot.
    #[must_use]
    pub fn view(&self) -> PickerView {
        let preview = Swatch::from_rgb(self.preview);
        let instruction_color = if self.show_instruction {
            Some(preview.text_color)
        } else {
            None
        };
        PickerView {
            current: Swatch::from_rgb(self.current),
            slider: self.current_hsl,
            preview,
            locked: self.locked,
            instruction_color,
            history: swatches(self.history.entries()),
            palette: self
                .palette_visible
                .then(|| swatches(self.palette.colors())),
            rule: self.rule,
            size: self.size,
            label_color: DARK_LABEL,
        }
    }

    /// Select a color with a click: record it, pin the preview, show the hint.
    fn pick(&mut self, rgb: Rgb) -> Result<()> {
        self.history.push(&rgb.to_hex())?;
        self.current = rgb;
        self.current_hsl = rgb_to_hsl(rgb);
        self.preview = rgb;
        self.locked = true;
        self.show_instruction = true;
        Ok(())
    }

    /// Release the preview back to the selection and hide the hint.
    fn unlock(&mut self) {
        self.preview = self.current;
        self.locked = false;
        self.show_instruction = false;
    }
}

/// What the UI draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerView {
    pub current: Swatch,
    /// Slider positions.
    pub slider: Hsl,
    pub preview: Swatch,
    pub locked: bool,
    /// Color of the copy hint, `None` while the hint is hidden.
    pub instruction_color: Option<&'static str>,
    pub history: Vec<Swatch>,
    /// `None` while the palette is hidden.
    pub palette: Option<Vec<Swatch>>,
    pub rule: HarmonyRule,
    pub size: usize,
    /// Color of the preview's hex/RGB/HSL text.
    pub label_color: &'static str,
}

fn swatches(colors: &[String]) -> Vec<Swatch> {
    colors
        .iter()
        .filter_map(|c| Swatch::from_hex(c).ok())
        .collect()
}

fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE)
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

    fn fresh() -> PickerState {
        PickerState::new(&PickerConfig::default())
    }

    fn click(x: f64, y: f64) -> PickerEvent {
        PickerEvent::GradientClick {
            x,
            y,
            width: 100.0,
            height: 100.0,
        }
    }

    #[test]
    fn test_new_uses_config_defaults() {
        let state = fresh();
        assert_eq!(state.current_hex(), "#3b82f6");
        assert_eq!(state.size, 5);
        assert_eq!(state.rule, HarmonyRule::Complementary);
        assert!(!state.locked);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let state = fresh();
        let next = state.apply(&click(0.0, 50.0)).unwrap();
        assert_eq!(state, fresh());
        assert_eq!(next.current_hex(), "#ff0000");
    }

    #[test]
    fn test_hover_only_while_unlocked() {
        let hover = PickerEvent::GradientHover {
            x: 0.0,
            y: 100.0,
            width: 100.0,
            height: 100.0,
        };
        let state = fresh().apply(&hover).unwrap();
        assert_eq!(state.preview.to_hex(), "#000000");
        assert_eq!(state.current_hex(), "#3b82f6");

        let state = state.apply(&PickerEvent::GradientLeave).unwrap();
        assert_eq!(state.preview.to_hex(), "#3b82f6");

        let locked = state.apply(&click(0.0, 50.0)).unwrap();
        let still = locked.apply(&hover).unwrap();
        assert_eq!(still.preview.to_hex(), "#ff0000");
    }

    #[test]
    fn test_click_selects_and_locks() {
        let state = fresh().apply(&click(0.0, 50.0)).unwrap();
        assert!(state.locked);
        assert!(state.show_instruction);
        assert_eq!(state.history.entries(), ["#ff0000"]);
        assert_eq!(state.current_hsl, Hsl::new(0.0, 100.0, 50.0));
    }

    #[test]
    fn test_slider_sets_color_and_unlocks() {
        let locked = fresh().apply(&click(0.0, 50.0)).unwrap();
        let state = locked
            .apply(&PickerEvent::Slider {
                h: 120.0,
                s: 100.0,
                l: 50.0,
            })
            .unwrap();
        assert_eq!(state.current_hex(), "#00ff00");
        assert_eq!(state.current_hsl.h, 120.0);
        assert!(!state.locked);
        assert!(!state.show_instruction);
        // Sliders do not record history
        assert_eq!(state.history.entries(), ["#ff0000"]);
    }

    #[test]
    fn test_select_rejects_malformed_hex() {
        let err = fresh()
            .apply(&PickerEvent::SelectColor {
                hex: "#12345".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, SwatchError::InvalidHex(_)));
    }

    #[test]
    fn test_size_events_stay_in_range() {
        let state = fresh().apply(&PickerEvent::SetSize { size: 99 }).unwrap();
        assert_eq!(state.size, 10);
        let state = state.apply(&PickerEvent::StepSize { up: true }).unwrap();
        assert_eq!(state.size, 10);
        let state = state.apply(&PickerEvent::SetSize { size: -1 }).unwrap();
        assert_eq!(state.size, 2);
        let state = state.apply(&PickerEvent::StepSize { up: false }).unwrap();
        assert_eq!(state.size, 2);
        let state = state.apply(&PickerEvent::StepSize { up: true }).unwrap();
        assert_eq!(state.size, 3);
    }

    #[test]
    fn test_generate_rejects_bad_size() {
        let mut state = fresh();
        state.size = 42;
        assert!(matches!(
            state.apply(&PickerEvent::Generate),
            Err(SwatchError::InvalidSize { size: 42, .. })
        ));
    }

    #[test]
    fn test_escape_unlocks_without_palette() {
        let state = fresh().apply(&click(10.0, 10.0)).unwrap();
        let state = state.apply(&PickerEvent::Escape).unwrap();
        assert!(!state.locked);
        assert!(!state.show_instruction);
    }

    #[test]
    fn test_closing_palette_returns_preview_to_selection() {
        let bottom_edge = PickerEvent::GradientHover {
            x: 50.0,
            y: 100.0,
            width: 100.0,
            height: 100.0,
        };
        let hovered = fresh()
            .apply(&PickerEvent::Generate)
            .unwrap()
            .apply(&PickerEvent::Slider {
                h: 120.0,
                s: 100.0,
                l: 50.0,
            })
            .unwrap()
            .apply(&bottom_edge)
            .unwrap();
        assert_eq!(hovered.preview.to_hex(), "#000000");
        assert!(hovered.palette_visible);

        for event in [PickerEvent::Escape, PickerEvent::ClosePalette] {
            let closed = hovered.apply(&event).unwrap();
            assert!(!closed.palette_visible);
            assert_eq!(closed.current_hex(), "#00ff00");
            assert_eq!(closed.preview, closed.current);
        }

        let mut emptied = hovered;
        for hex in emptied.palette.colors().to_vec() {
            emptied = emptied.apply(&PickerEvent::RemoveColor { hex }).unwrap();
        }
        assert!(!emptied.palette_visible);
        assert_eq!(emptied.preview, emptied.current);
    }

    #[test]
    fn test_event_json_shape() {
        let event: PickerEvent =
            serde_json::from_str(r#"{"type": "slider", "h": 10, "s": 20, "l": 30}"#).unwrap();
        assert_eq!(
            event,
            PickerEvent::Slider {
                h: 10.0,
                s: 20.0,
                l: 30.0
            }
        );
        let event: PickerEvent =
            serde_json::from_str(r#"{"type": "setRule", "rule": "triadic"}"#).unwrap();
        assert_eq!(
            event,
            PickerEvent::SetRule {
                rule: HarmonyRule::Triadic
            }
        );
        let event: PickerEvent = serde_json::from_str(r#"{"type": "gradientLeave"}"#).unwrap();
        assert_eq!(event, PickerEvent::GradientLeave);
    }

    #[test]
    fn test_view_hides_palette_until_generated() {
        let state = fresh();
        assert!(state.view().palette.is_none());
        assert!(state.view().instruction_color.is_none());
        let state = state.apply(&PickerEvent::Generate).unwrap();
        let view = state.view();
        assert_eq!(view.palette.map(|p| p.len()), Some(5));
        assert_eq!(view.history.len(), 1);
    }
}
