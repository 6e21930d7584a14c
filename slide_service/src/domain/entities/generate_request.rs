use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::validate_length;

use super::{
    aspect_ratio::AspectRatio,
    json_fields::{into_object, take_optional},
    slide::{SlideContent, SlideContentDto},
    theme::{ThemeConfig, ThemeConfigBody},
    validation_error::ValidationError,
};

pub const MIN_TOPIC_LENGTH: u64 = 3;
pub const MAX_TOPIC_LENGTH: u64 = 500;
pub const MIN_SLIDES: i64 = 1;
pub const MAX_SLIDES: i64 = 20;
pub const DEFAULT_SLIDES: u8 = 5;

/// Body of a generation request, as received
///
/// Every field is optional at this stage so that a missing or out-of-range value is reported
/// as a `ValidationError` naming it, rather than as a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateRequestBody {
    pub topic: Option<String>,
    pub num_slides: Option<i64>,
    pub custom_content: Option<Vec<SlideContentDto>>,
    pub theme: Option<ThemeConfigBody>,
    pub include_citations: Option<bool>,
    pub aspect_ratio: Option<String>,
}

impl TryFrom<JsonValue> for GenerateRequestBody {
    type Error = ValidationError;

    /// Reads a received body member by member.
    ///
    /// A member of the wrong JSON type is reported as a `ValidationError` naming that member,
    /// with `custom_content_index` when it belongs to a custom slide. Unknown members are ignored.
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let mut body = into_object(value, "body")?;

        let topic = take_optional(&mut body, "topic")?;
        let num_slides = take_optional(&mut body, "num_slides")?;

        let custom_content = take_optional::<Vec<JsonValue>>(&mut body, "custom_content")?
            .map(|slides| {
                slides
                    .into_iter()
                    .enumerate()
                    .map(|(index, slide)| {
                        SlideContentDto::try_from(slide)
                            .map_err(|error| error.with_detail("custom_content_index", index))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let theme = take_optional::<JsonValue>(&mut body, "theme")?
            .map(ThemeConfigBody::try_from)
            .transpose()?;

        Ok(Self {
            topic,
            num_slides,
            custom_content,
            theme,
            include_citations: take_optional(&mut body, "include_citations")?,
            aspect_ratio: take_optional(&mut body, "aspect_ratio")?,
        })
    }
}

/// A fully validated generation request, defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub topic: String,
    /// Advisory when `custom_content` is set: the number of custom slides wins
    pub num_slides: u8,
    /// `None` when absent or empty: content will be generated
    pub custom_content: Option<Vec<SlideContent>>,
    pub theme: ThemeConfig,
    pub include_citations: bool,
    pub aspect_ratio: AspectRatio,
}

impl GenerateRequest {
    /// Checks the fields in order and stops at the first broken rule.
    ///
    /// No partial acceptance: one invalid custom slide rejects the whole request,
    /// the error then carries its position as `custom_content_index`.
    #[tracing::instrument(name = "Validating generation request", skip(body))]
    pub fn parse(body: GenerateRequestBody) -> Result<GenerateRequest, ValidationError> {
        let topic = parse_topic(body.topic)?;
        let num_slides = parse_num_slides(body.num_slides)?;

        let custom_content = match body.custom_content {
            Some(slides) if !slides.is_empty() => Some(
                slides
                    .into_iter()
                    .enumerate()
                    .map(|(index, slide)| {
                        SlideContent::parse(slide)
                            .map_err(|error| error.with_detail("custom_content_index", index))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => None,
        };

        let theme = ThemeConfig::parse(body.theme)?;

        let aspect_ratio = match body.aspect_ratio {
            Some(aspect_ratio) => AspectRatio::parse(&aspect_ratio)?,
            None => AspectRatio::default(),
        };

        Ok(Self {
            topic,
            num_slides,
            custom_content,
            theme,
            include_citations: body.include_citations.unwrap_or(true),
            aspect_ratio,
        })
    }

    /// Number of slides the presentation will actually have
    pub fn slide_count(&self) -> usize {
        match &self.custom_content {
            Some(slides) => slides.len(),
            None => usize::from(self.num_slides),
        }
    }
}

impl TryFrom<GenerateRequestBody> for GenerateRequest {
    type Error = ValidationError;

    fn try_from(body: GenerateRequestBody) -> Result<Self, Self::Error> {
        Self::parse(body)
    }
}

fn parse_topic(topic: Option<String>) -> Result<String, ValidationError> {
    let topic = topic.ok_or_else(|| ValidationError::new("topic", "field required"))?;

    if !validate_length(
        topic.as_str(),
        Some(MIN_TOPIC_LENGTH),
        Some(MAX_TOPIC_LENGTH),
        None,
    ) {
        return Err(ValidationError::new(
            "topic",
            format!(
                "topic must be between {} and {} characters",
                MIN_TOPIC_LENGTH, MAX_TOPIC_LENGTH
            ),
        )
        .with_detail("provided", topic.chars().count())
        .with_detail(
            "required",
            format!("{}-{}", MIN_TOPIC_LENGTH, MAX_TOPIC_LENGTH),
        ));
    }

    Ok(topic)
}

fn parse_num_slides(num_slides: Option<i64>) -> Result<u8, ValidationError> {
    let num_slides = match num_slides {
        Some(num_slides) => num_slides,
        None => return Ok(DEFAULT_SLIDES),
    };

    if !(MIN_SLIDES..=MAX_SLIDES).contains(&num_slides) {
        return Err(ValidationError::new(
            "num_slides",
            format!(
                "number of slides must be between {} and {}",
                MIN_SLIDES, MAX_SLIDES
            ),
        )
        .with_detail("provided", num_slides)
        .with_detail("required", format!("{}-{}", MIN_SLIDES, MAX_SLIDES)));
    }

    // In range, so it fits
    Ok(num_slides as u8)
}
