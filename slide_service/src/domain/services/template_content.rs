use async_trait::async_trait;

use crate::{
    domain::entities::slide::{BulletPoints, SlideBody, SlideContent, SlideLayout, MAX_TITLE_LENGTH},
    ports::content_generator::{ContentGenerator, ContentGeneratorError, GeneratedContent},
};

/// Layouts given to the slides following the title slide, in turn
const BODY_LAYOUT_CYCLE: [SlideLayout; 4] = [
    SlideLayout::BulletPoints,
    SlideLayout::TwoColumn,
    SlideLayout::ContentWithImage,
    SlideLayout::BulletPoints,
];

/// Produces placeholder slides from the topic alone, without any external service.
///
/// The output only depends on its inputs: the same topic and count always give the same
/// slides, and no citations.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateContentGenerator;

impl TemplateContentGenerator {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(name = "Generating template content", skip(self))]
    pub fn generate(&self, topic: &str, num_slides: u8) -> Vec<SlideContent> {
        (0..usize::from(num_slides))
            .map(|index| match index {
                0 => SlideContent::new(
                    bounded_title(topic.to_string()),
                    SlideBody::Title {
                        subtitle: Some(format!("A comprehensive overview of {}", topic)),
                    },
                ),
                _ => body_slide(topic, index),
            })
            .collect()
    }
}

fn body_slide(topic: &str, index: usize) -> SlideContent {
    match BODY_LAYOUT_CYCLE[(index - 1) % BODY_LAYOUT_CYCLE.len()] {
        SlideLayout::TwoColumn => SlideContent::new(
            bounded_title(format!("Comparing Aspects of {}", topic)),
            SlideBody::TwoColumn {
                left_column: Some(format!(
                    "Traditional approaches to {} include established methods and proven techniques.",
                    topic
                )),
                right_column: Some(format!(
                    "Modern innovations in {} bring new perspectives and advanced solutions.",
                    topic
                )),
            },
        ),
        SlideLayout::ContentWithImage => SlideContent::new(
            bounded_title(format!("Visual Overview of {}", topic)),
            SlideBody::ContentWithImage {
                content: Some(format!(
                    "This section provides a detailed exploration of {}, highlighting its significance and practical applications.",
                    topic
                )),
                image_description: Some(format!("Illustration showing key concepts of {}", topic)),
                image_url: None,
            },
        ),
        SlideLayout::BulletPoints | SlideLayout::Title => SlideContent::new(
            bounded_title(format!("Key Points About {} ({})", topic, index)),
            SlideBody::BulletPoints(BulletPoints::from([
                format!("Important aspect {}.1 of {}", index, topic),
                format!("Critical consideration {}.2 for understanding", index),
                format!("Essential element {}.3 to remember", index),
                format!("Notable feature {}.4 worth exploring", index),
            ])),
        ),
    }
}

/// Topics may be longer than a slide title is allowed to be
fn bounded_title(title: String) -> String {
    let max = MAX_TITLE_LENGTH as usize;
    match title.char_indices().nth(max) {
        Some((cut, _)) => title[..cut].to_string(),
        None => title,
    }
}

#[async_trait]
impl ContentGenerator for TemplateContentGenerator {
    async fn generate_slides(
        &self,
        topic: &str,
        num_slides: u8,
        _include_citations: bool,
    ) -> Result<GeneratedContent, ContentGeneratorError> {
        Ok(GeneratedContent {
            slides: self.generate(topic, num_slides),
            citations: None,
        })
    }
}
