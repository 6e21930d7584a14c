use serde::{Deserialize, Serialize};

use super::validation_error::ValidationError;

/// English Metric Units per inch, the unit of every OOXML position and size
pub const EMU_PER_INCH: i64 = 914_400;

/// Page geometry of a whole presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum AspectRatio {
    /// 10in x 5.625in
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    /// 10in x 7.5in
    #[serde(rename = "4:3")]
    Standard,
}

impl AspectRatio {
    pub fn parse(s: &str) -> Result<AspectRatio, ValidationError> {
        match s {
            "16:9" => Ok(Self::Widescreen),
            "4:3" => Ok(Self::Standard),
            other => Err(ValidationError::new(
                "aspect_ratio",
                r#"aspect ratio must be either "16:9" or "4:3""#,
            )
            .with_detail("provided", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Widescreen => "16:9",
            Self::Standard => "4:3",
        }
    }

    /// Slide (width, height) in EMU
    pub fn slide_size_emu(&self) -> (i64, i64) {
        match self {
            Self::Widescreen => (10 * EMU_PER_INCH, 5_143_500),
            Self::Standard => (10 * EMU_PER_INCH, 7 * EMU_PER_INCH + EMU_PER_INCH / 2),
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
