//! Structured error types for swatchbook.
//!
//! Every fallible path in the crate reports one of these; nothing here is
//! fatal to the picker, callers fall back to defaults.

/// All errors that can occur while parsing colors, generating palettes
/// or persisting picker state.
#[derive(Debug, thiserror::Error)]
pub enum SwatchError {
    /// Hex string of the wrong length or with non-hex characters.
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Palette size outside the supported range.
    #[error("Please select a palette size between {min} and {max} (got {size}).")]
    InvalidSize {
        /// Requested size.
        size: i64,
        /// Smallest accepted size.
        min: usize,
        /// Largest accepted size.
        max: usize,
    },

    /// Harmony rule tag outside the closed set.
    #[error("Unknown harmony rule: {0:?}")]
    UnknownRule(String),

    /// Export requested with nothing to export.
    #[error("Generate a palette first!")]
    EmptyPalette,

    /// Key-value store unavailable or rejected a write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted or supplied JSON that does not parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (CLI output, config files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SwatchError>;

#[cfg(target_arch = "wasm32")]
impl From<SwatchError> for wasm_bindgen::JsValue {
    fn from(e: SwatchError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
