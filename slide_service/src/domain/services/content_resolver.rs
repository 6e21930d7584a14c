use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{
        entities::generate_request::GenerateRequest,
        services::template_content::TemplateContentGenerator,
    },
    ports::content_generator::{ContentGenerator, GeneratedContent},
};

/// Chooses where the slides of a presentation come from
///
/// 1. the caller's own `custom_content`, used as is, without citations
/// 2. the remote generator, when one is configured
/// 3. the deterministic template, whenever the remote generator is missing or fails
///
/// Resolution itself never fails.
pub struct ContentResolver {
    remote: Option<Arc<dyn ContentGenerator>>,
    fallback: TemplateContentGenerator,
}

impl ContentResolver {
    pub fn new(remote: Option<Arc<dyn ContentGenerator>>) -> Self {
        Self {
            remote,
            fallback: TemplateContentGenerator::new(),
        }
    }

    #[tracing::instrument(name = "Resolving presentation content", skip(self, request), fields(topic = %request.topic))]
    pub async fn resolve(&self, request: &GenerateRequest) -> GeneratedContent {
        if let Some(slides) = &request.custom_content {
            info!(num_slides = slides.len(), "Using custom content");
            return GeneratedContent {
                slides: slides.clone(),
                citations: None,
            };
        }

        if let Some(remote) = &self.remote {
            match remote
                .generate_slides(&request.topic, request.num_slides, request.include_citations)
                .await
            {
                Ok(mut content) => {
                    if !request.include_citations {
                        content.citations = None;
                    }
                    return content;
                }
                Err(error) => {
                    warn!(?error, "Content generation failed, using template content");
                }
            }
        }

        GeneratedContent {
            slides: self.fallback.generate(&request.topic, request.num_slides),
            citations: None,
        }
    }
}
