use common::helper::error_chain_fmt;

use crate::domain::entities::{
    aspect_ratio::AspectRatio, citation::Citation, presentation::PresentationArtifact,
    slide::SlideContent, theme::ThemeConfig,
};

/// Turns slides into a binary presentation document
///
/// Rendering is CPU-bound and synchronous: callers should run it off the async executor.
pub trait PresentationRenderer: Send + Sync {
    fn render(
        &self,
        slides: &[SlideContent],
        citations: Option<&[Citation]>,
        theme: &ThemeConfig,
        aspect_ratio: AspectRatio,
    ) -> Result<PresentationArtifact, RenderError>;
}

#[derive(thiserror::Error)]
pub enum RenderError {
    #[error("A presentation needs at least one slide")]
    NoSlides,
    #[error("Failed to write the presentation package: {0}")]
    Package(#[from] zip::result::ZipError),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl std::fmt::Debug for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
