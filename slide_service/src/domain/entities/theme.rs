use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{
    hex_color::HexColor,
    json_fields::{into_object, take_optional},
    validation_error::ValidationError,
};

pub const DEFAULT_PRIMARY_COLOR: &str = "#1F4788";
pub const DEFAULT_SECONDARY_COLOR: &str = "#FFFFFF";
pub const DEFAULT_FONT_NAME: &str = "Calibri";
pub const DEFAULT_FONT_SIZE_TITLE: u32 = 44;
pub const DEFAULT_FONT_SIZE_BODY: u32 = 18;

const FONT_SIZE_TITLE_RANGE: std::ops::RangeInclusive<i64> = 20..=72;
const FONT_SIZE_BODY_RANGE: std::ops::RangeInclusive<i64> = 10..=36;

/// Theme as received: every field is optional
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ThemeConfigBody {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_name: Option<String>,
    pub font_size_title: Option<i64>,
    pub font_size_body: Option<i64>,
}

impl TryFrom<JsonValue> for ThemeConfigBody {
    type Error = ValidationError;

    /// Reads the theme member by member: a wrongly typed field is named in the error
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let mut theme = into_object(value, "theme")?;

        Ok(Self {
            primary_color: take_optional(&mut theme, "primary_color")?,
            secondary_color: take_optional(&mut theme, "secondary_color")?,
            font_name: take_optional(&mut theme, "font_name")?,
            font_size_title: take_optional(&mut theme, "font_size_title")?,
            font_size_body: take_optional(&mut theme, "font_size_body")?,
        })
    }
}

/// Visual parameters applied to a whole presentation
///
/// - `primary_color`: titles and accents
/// - `secondary_color`: slide backgrounds
/// - `font_name`, font sizes (in points): every title and body text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeConfig {
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub font_name: String,
    pub font_size_title: u32,
    pub font_size_body: u32,
}

impl ThemeConfig {
    /// Validates the supplied fields and fills the missing ones with their defaults.
    ///
    /// An absent theme, or a theme with missing fields, is never an error.
    pub fn parse(body: Option<ThemeConfigBody>) -> Result<ThemeConfig, ValidationError> {
        let body = body.unwrap_or_default();
        let default = Self::default();

        let primary_color = match body.primary_color {
            Some(color) => HexColor::parse("primary_color", &color)?,
            None => default.primary_color,
        };

        let secondary_color = match body.secondary_color {
            Some(color) => HexColor::parse("secondary_color", &color)?,
            None => default.secondary_color,
        };

        let font_name = body.font_name.unwrap_or(default.font_name);

        let font_size_title = match body.font_size_title {
            Some(size) => parse_font_size("font_size_title", size, FONT_SIZE_TITLE_RANGE)?,
            None => default.font_size_title,
        };

        let font_size_body = match body.font_size_body {
            Some(size) => parse_font_size("font_size_body", size, FONT_SIZE_BODY_RANGE)?,
            None => default.font_size_body,
        };

        Ok(Self {
            primary_color,
            secondary_color,
            font_name,
            font_size_title,
            font_size_body,
        })
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: HexColor::parse("primary_color", DEFAULT_PRIMARY_COLOR)
                .expect("Default primary color is a valid hex color"),
            secondary_color: HexColor::parse("secondary_color", DEFAULT_SECONDARY_COLOR)
                .expect("Default secondary color is a valid hex color"),
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_size_title: DEFAULT_FONT_SIZE_TITLE,
            font_size_body: DEFAULT_FONT_SIZE_BODY,
        }
    }
}

fn parse_font_size(
    field: &str,
    size: i64,
    range: std::ops::RangeInclusive<i64>,
) -> Result<u32, ValidationError> {
    if !range.contains(&size) {
        return Err(ValidationError::new(
            field,
            format!(
                "font size must be between {} and {}",
                range.start(),
                range.end()
            ),
        )
        .with_detail("provided", size)
        .with_detail("required", format!("{}-{}", range.start(), range.end())));
    }

    // In range, so it fits
    Ok(size as u32)
}
