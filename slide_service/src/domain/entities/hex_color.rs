use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::validation_error::ValidationError;

static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Failed to compile the hex color pattern")
});

/// A `#RRGGBB` color
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// # Arguments
    /// - `field`: name of the field holding the color, used in the validation error
    /// - `s`: the candidate color
    pub fn parse(field: &str, s: &str) -> Result<HexColor, ValidationError> {
        if HEX_COLOR_REGEX.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::new(
                field,
                "color must be in hex format with 7 characters including # (e.g. #1F4788)",
            )
            .with_detail("provided", s))
        }
    }

    /// The 6 hex digits, upper-cased, as expected by DrawingML `srgbClr` values
    pub fn rgb_hex(&self) -> String {
        self.0[1..].to_ascii_uppercase()
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
