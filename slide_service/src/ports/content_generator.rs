use async_trait::async_trait;
use common::helper::error_chain_fmt;

use crate::domain::entities::{citation::Citation, slide::SlideContent};

/// Slides produced for a topic, with their optional sources
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub slides: Vec<SlideContent>,
    /// `None` when citations were not requested, or none could be produced
    pub citations: Option<Vec<Citation>>,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produces exactly `num_slides` valid slides about `topic`.
    ///
    /// Any failure is reported as an error: falling back to another generator is the caller's choice.
    async fn generate_slides(
        &self,
        topic: &str,
        num_slides: u8,
        include_citations: bool,
    ) -> Result<GeneratedContent, ContentGeneratorError>;
}

#[derive(thiserror::Error)]
pub enum ContentGeneratorError {
    #[error("The request to the language model failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("The language model answered with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("The language model answer could not be used: {0}")]
    InvalidAnswer(String),
    #[error("The language model returned {provided} slides, {required} were requested")]
    NotEnoughSlides { provided: usize, required: usize },
}

impl std::fmt::Debug for ContentGeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
