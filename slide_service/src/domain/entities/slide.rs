use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::validate_length;

use super::{
    json_fields::{into_object, take_optional},
    validation_error::ValidationError,
};

pub const MAX_TITLE_LENGTH: u64 = 200;
pub const MIN_BULLET_POINTS: usize = 3;
pub const MAX_BULLET_POINTS: usize = 5;

/// The four supported slide shapes, as named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideLayout {
    Title,
    BulletPoints,
    TwoColumn,
    ContentWithImage,
}

impl SlideLayout {
    pub const ALL: [SlideLayout; 4] = [
        Self::Title,
        Self::BulletPoints,
        Self::TwoColumn,
        Self::ContentWithImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::BulletPoints => "bullet_points",
            Self::TwoColumn => "two_column",
            Self::ContentWithImage => "content_with_image",
        }
    }

    /// Variant-specific fields accepted with this layout, on top of `title` and `notes`
    fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Title => &["content"],
            Self::BulletPoints => &["bullet_points"],
            Self::TwoColumn => &["left_column", "right_column"],
            Self::ContentWithImage => &["content", "image_description", "image_url"],
        }
    }

    pub fn parse(s: &str) -> Result<SlideLayout, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new(
                    "layout",
                    "layout must be one of: title, bullet_points, two_column, content_with_image",
                )
                .with_detail("provided", s)
            })
    }
}

impl std::fmt::Display for SlideLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 3 to 5 non-blank bullet lines, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletPoints(Vec<String>);

impl BulletPoints {
    pub fn parse(bullet_points: Vec<String>) -> Result<BulletPoints, ValidationError> {
        let count = bullet_points.len();
        if !(MIN_BULLET_POINTS..=MAX_BULLET_POINTS).contains(&count) {
            return Err(ValidationError::new(
                "bullet_points",
                "bullet points layout requires 3-5 bullet points",
            )
            .with_detail("layout", SlideLayout::BulletPoints.as_str())
            .with_detail("provided", count)
            .with_detail(
                "required",
                format!("{}-{}", MIN_BULLET_POINTS, MAX_BULLET_POINTS),
            ));
        }

        if let Some(index) = bullet_points.iter().position(|b| b.trim().is_empty()) {
            return Err(
                ValidationError::new("bullet_points", "bullet points must not be empty")
                    .with_detail("layout", SlideLayout::BulletPoints.as_str())
                    .with_detail("index", index),
            );
        }

        Ok(Self(bullet_points))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Fixed-size arrays with an accepted length can be turned into bullet points without checking the count
macro_rules! bullet_points_from_array {
    ($($n:literal),*) => {
        $(
            impl From<[String; $n]> for BulletPoints {
                fn from(bullet_points: [String; $n]) -> Self {
                    Self(bullet_points.into())
                }
            }
        )*
    };
}

bullet_points_from_array!(3, 4, 5);

/// Layout-specific payload of a slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideBody {
    Title {
        subtitle: Option<String>,
    },
    BulletPoints(BulletPoints),
    TwoColumn {
        left_column: Option<String>,
        right_column: Option<String>,
    },
    /// The image is never fetched: `image_url` is kept as given and only `image_description`
    /// is shown, inside a placeholder
    ContentWithImage {
        content: Option<String>,
        image_description: Option<String>,
        image_url: Option<String>,
    },
}

impl SlideBody {
    pub fn layout(&self) -> SlideLayout {
        match self {
            Self::Title { .. } => SlideLayout::Title,
            Self::BulletPoints(_) => SlideLayout::BulletPoints,
            Self::TwoColumn { .. } => SlideLayout::TwoColumn,
            Self::ContentWithImage { .. } => SlideLayout::ContentWithImage,
        }
    }
}

/// A validated slide.
///
/// On the wire it is the flat `SlideContentDto` record: `layout` names the variant and
/// the fields of the other variants are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "SlideContentDto", into = "SlideContentDto")]
pub struct SlideContent {
    title: String,
    /// Speaker notes, never shown on the slide
    notes: Option<String>,
    body: SlideBody,
}

impl SlideContent {
    pub fn new(title: impl Into<String>, body: SlideBody) -> Self {
        Self {
            title: title.into(),
            notes: None,
            body,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn body(&self) -> &SlideBody {
        &self.body
    }

    pub fn layout(&self) -> SlideLayout {
        self.body.layout()
    }

    /// Applies every slide rule to a received record:
    /// - `layout` is required and known
    /// - `title` is required, 1 to 200 characters
    /// - fields belonging to another layout are rejected
    /// - a `bullet_points` slide has 3 to 5 non-blank bullets
    pub fn parse(dto: SlideContentDto) -> Result<SlideContent, ValidationError> {
        let layout = match dto.layout.as_deref() {
            Some(layout) => SlideLayout::parse(layout)?,
            None => return Err(ValidationError::new("layout", "field required")),
        };

        let title = match dto.title {
            Some(title) => title,
            None => {
                return Err(ValidationError::new("title", "field required")
                    .with_detail("layout", layout.as_str()))
            }
        };
        if !validate_length(title.as_str(), Some(1), Some(MAX_TITLE_LENGTH), None) {
            return Err(ValidationError::new(
                "title",
                format!("title must be between 1 and {} characters", MAX_TITLE_LENGTH),
            )
            .with_detail("layout", layout.as_str())
            .with_detail("provided", title.chars().count()));
        }

        let present_fields = [
            ("content", dto.content.is_some()),
            ("bullet_points", dto.bullet_points.is_some()),
            ("left_column", dto.left_column.is_some()),
            ("right_column", dto.right_column.is_some()),
            ("image_url", dto.image_url.is_some()),
            ("image_description", dto.image_description.is_some()),
        ];
        if let Some((field, _)) = present_fields
            .iter()
            .find(|(field, present)| *present && !layout.allowed_fields().contains(field))
        {
            return Err(ValidationError::new(
                *field,
                format!("field is not allowed for layout `{}`", layout),
            )
            .with_detail("layout", layout.as_str()));
        }

        let body = match layout {
            SlideLayout::Title => SlideBody::Title {
                subtitle: dto.content,
            },
            SlideLayout::BulletPoints => {
                let bullet_points = dto.bullet_points.unwrap_or_default();
                SlideBody::BulletPoints(BulletPoints::parse(bullet_points)?)
            }
            SlideLayout::TwoColumn => SlideBody::TwoColumn {
                left_column: dto.left_column,
                right_column: dto.right_column,
            },
            SlideLayout::ContentWithImage => SlideBody::ContentWithImage {
                content: dto.content,
                image_description: dto.image_description,
                image_url: dto.image_url,
            },
        };

        Ok(Self {
            title,
            notes: dto.notes,
            body,
        })
    }
}

impl TryFrom<SlideContentDto> for SlideContent {
    type Error = ValidationError;

    fn try_from(dto: SlideContentDto) -> Result<Self, Self::Error> {
        Self::parse(dto)
    }
}

/// Flat wire shape of a slide, shared by requests, responses and the generation model output
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlideContentDto {
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub bullet_points: Option<Vec<String>>,
    #[serde(default)]
    pub left_column: Option<String>,
    #[serde(default)]
    pub right_column: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<JsonValue> for SlideContentDto {
    type Error = ValidationError;

    /// Reads a received slide member by member: a wrongly typed field is named in the error
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let mut slide = into_object(value, "slide")?;

        Ok(Self {
            layout: take_optional(&mut slide, "layout")?,
            title: take_optional(&mut slide, "title")?,
            content: take_optional(&mut slide, "content")?,
            bullet_points: take_optional(&mut slide, "bullet_points")?,
            left_column: take_optional(&mut slide, "left_column")?,
            right_column: take_optional(&mut slide, "right_column")?,
            image_url: take_optional(&mut slide, "image_url")?,
            image_description: take_optional(&mut slide, "image_description")?,
            notes: take_optional(&mut slide, "notes")?,
        })
    }
}

impl From<SlideContent> for SlideContentDto {
    fn from(slide: SlideContent) -> Self {
        let mut dto = SlideContentDto {
            layout: Some(slide.layout().as_str().to_string()),
            title: Some(slide.title),
            notes: slide.notes,
            ..Default::default()
        };

        match slide.body {
            SlideBody::Title { subtitle } => dto.content = subtitle,
            SlideBody::BulletPoints(bullet_points) => dto.bullet_points = Some(bullet_points.0),
            SlideBody::TwoColumn {
                left_column,
                right_column,
            } => {
                dto.left_column = left_column;
                dto.right_column = right_column;
            }
            SlideBody::ContentWithImage {
                content,
                image_description,
                image_url,
            } => {
                dto.content = content;
                dto.image_description = image_description;
                dto.image_url = image_url;
            }
        }

        dto
    }
}
