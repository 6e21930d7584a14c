mod package_parts;
mod slide_xml;

use std::io::{Cursor, Write};

use chrono::Utc;
use tracing::debug;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use self::{
    package_parts::*,
    slide_xml::{Frame, SlideXml, TextStyle},
};
use crate::{
    domain::entities::{
        aspect_ratio::AspectRatio,
        citation::Citation,
        presentation::PresentationArtifact,
        slide::{SlideBody, SlideContent},
        theme::ThemeConfig,
    },
    ports::presentation_renderer::{PresentationRenderer, RenderError},
};

pub const REFERENCES_TITLE: &str = "References";

/// Fill of the rectangle standing in for images
const IMAGE_PLACEHOLDER_FILL: &str = "DCDCDC";
const IMAGE_CAPTION_SIZE_PT: u32 = 12;

/// Headings of content slides are smaller than the title slide's
const HEADING_SIZE_REDUCTION_PT: u32 = 8;
const REFERENCE_SIZE_REDUCTION_PT: u32 = 2;

/// Writes presentations as Office Open XML packages (`.pptx`)
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxRenderer;

impl PptxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationRenderer for PptxRenderer {
    #[tracing::instrument(
        name = "Rendering pptx presentation",
        skip(self, slides, citations, theme),
        fields(num_slides = slides.len())
    )]
    fn render(
        &self,
        slides: &[SlideContent],
        citations: Option<&[Citation]>,
        theme: &ThemeConfig,
        aspect_ratio: AspectRatio,
    ) -> Result<PresentationArtifact, RenderError> {
        let first_slide = slides.first().ok_or(RenderError::NoSlides)?;
        let geometry = Geometry::new(aspect_ratio);

        let mut slide_parts: Vec<String> = slides
            .iter()
            .map(|slide| render_slide(slide, theme, &geometry))
            .collect();

        if let Some(citations) = citations.filter(|citations| !citations.is_empty()) {
            slide_parts.push(render_references(citations, theme, &geometry));
        }

        let num_slides = slide_parts.len();
        let mut package = Package::new();

        package.add_part(CONTENT_TYPES_PATH, &content_types_xml(num_slides))?;
        package.add_part(ROOT_RELS_PATH, &root_rels_xml())?;
        package.add_part(CORE_PROPS_PATH, &core_props_xml(first_slide.title(), Utc::now()))?;
        package.add_part(APP_PROPS_PATH, &app_props_xml(num_slides))?;
        package.add_part(
            PRESENTATION_PATH,
            &presentation_xml(num_slides, aspect_ratio.slide_size_emu()),
        )?;
        package.add_part(PRESENTATION_RELS_PATH, &presentation_rels_xml(num_slides))?;
        package.add_part(SLIDE_MASTER_PATH, &slide_master_xml())?;
        package.add_part(SLIDE_MASTER_RELS_PATH, &slide_master_rels_xml())?;
        package.add_part(SLIDE_LAYOUT_PATH, &slide_layout_xml())?;
        package.add_part(SLIDE_LAYOUT_RELS_PATH, &slide_layout_rels_xml())?;
        package.add_part(THEME_PATH, &theme_xml(theme))?;

        for (index, slide_part) in slide_parts.iter().enumerate() {
            package.add_part(&slide_path(index + 1), slide_part)?;
            package.add_part(&slide_rels_path(index + 1), &slide_rels_xml())?;
        }

        let artifact = PresentationArtifact::new(package.finish()?);
        debug!(num_slides, size = artifact.len(), "Presentation rendered");
        Ok(artifact)
    }
}

/// In-memory zip archive of XML parts
struct Package {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
}

impl Package {
    fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn add_part(&mut self, path: &str, xml: &str) -> Result<(), RenderError> {
        self.writer.start_file(path, self.options)?;
        self.writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

/// Shape frames for one page size
///
/// Horizontal positions are the same for both aspect ratios, content boxes are kept
/// within the shorter 16:9 page.
struct Geometry {
    page_height: f64,
}

impl Geometry {
    fn new(aspect_ratio: AspectRatio) -> Self {
        let (_, height) = aspect_ratio.slide_size_emu();
        Self {
            page_height: height as f64 / slide_xml::inches(1.0) as f64,
        }
    }

    /// Title slides are vertically centered on the page
    fn title(&self) -> Frame {
        Frame::from_inches(1.0, self.page_height / 2.0 - 0.8, 8.0, 1.0)
    }

    fn subtitle(&self) -> Frame {
        Frame::from_inches(1.0, self.page_height / 2.0 + 0.4, 8.0, 0.8)
    }

    fn heading(&self) -> Frame {
        Frame::from_inches(0.5, 0.5, 9.0, 0.8)
    }

    fn content_height(&self) -> f64 {
        self.page_height - 1.8 - 0.3
    }

    fn bullet_points(&self) -> Frame {
        Frame::from_inches(1.0, 1.8, 8.0, self.content_height())
    }

    fn left_column(&self) -> Frame {
        Frame::from_inches(0.5, 1.8, 4.5, self.content_height())
    }

    fn right_column(&self) -> Frame {
        Frame::from_inches(5.2, 1.8, 4.5, self.content_height())
    }

    fn image_text(&self) -> Frame {
        Frame::from_inches(0.5, 1.8, 5.0, self.content_height())
    }

    fn image_placeholder(&self) -> Frame {
        Frame::from_inches(6.0, 1.8, 3.5, 3.0_f64.min(self.content_height()))
    }

    fn references(&self) -> Frame {
        Frame::from_inches(0.5, 1.8, 9.0, self.content_height())
    }
}

fn heading_style(theme: &ThemeConfig) -> TextStyle {
    TextStyle::new(
        &theme.font_name,
        theme.font_size_title.saturating_sub(HEADING_SIZE_REDUCTION_PT),
    )
    .bold()
    .color(theme.primary_color.rgb_hex())
}

fn body_style(theme: &ThemeConfig) -> TextStyle {
    TextStyle::new(&theme.font_name, theme.font_size_body)
}

/// Lines of a free text field, one paragraph each
fn paragraphs(text: &Option<String>) -> impl Iterator<Item = &str> {
    text.as_deref().into_iter().flat_map(str::lines)
}

fn render_slide(slide: &SlideContent, theme: &ThemeConfig, geometry: &Geometry) -> String {
    let mut xml = SlideXml::new(&theme.secondary_color.rgb_hex());

    match slide.body() {
        SlideBody::Title { subtitle } => {
            let title_style = TextStyle::new(&theme.font_name, theme.font_size_title)
                .bold()
                .color(theme.primary_color.rgb_hex())
                .centered();
            xml.add_text_box(geometry.title(), [slide.title()], &title_style);

            if subtitle.is_some() {
                xml.add_text_box(
                    geometry.subtitle(),
                    paragraphs(subtitle),
                    &body_style(theme).centered(),
                );
            }
        }
        SlideBody::BulletPoints(bullet_points) => {
            xml.add_text_box(geometry.heading(), [slide.title()], &heading_style(theme))
                .add_text_box(
                    geometry.bullet_points(),
                    bullet_points.iter(),
                    &body_style(theme).bulleted().space_before(12),
                );
        }
        SlideBody::TwoColumn {
            left_column,
            right_column,
        } => {
            xml.add_text_box(geometry.heading(), [slide.title()], &heading_style(theme))
                .add_text_box(
                    geometry.left_column(),
                    paragraphs(left_column),
                    &body_style(theme),
                )
                .add_text_box(
                    geometry.right_column(),
                    paragraphs(right_column),
                    &body_style(theme),
                );
        }
        SlideBody::ContentWithImage {
            content,
            image_description,
            ..
        } => {
            let caption = image_description
                .as_ref()
                .map(|description| format!("[Image: {}]", description));
            let caption_style = TextStyle::new(&theme.font_name, IMAGE_CAPTION_SIZE_PT)
                .italic()
                .centered();

            xml.add_text_box(geometry.heading(), [slide.title()], &heading_style(theme))
                .add_text_box(geometry.image_text(), paragraphs(content), &body_style(theme))
                .add_rectangle(
                    geometry.image_placeholder(),
                    IMAGE_PLACEHOLDER_FILL,
                    caption.as_deref(),
                    &caption_style,
                );
        }
    }

    xml.finish()
}

fn render_references(citations: &[Citation], theme: &ThemeConfig, geometry: &Geometry) -> String {
    let lines: Vec<String> = citations.iter().map(Citation::reference_line).collect();
    let reference_style = TextStyle::new(
        &theme.font_name,
        theme
            .font_size_body
            .saturating_sub(REFERENCE_SIZE_REDUCTION_PT),
    )
    .space_before(8);

    let mut xml = SlideXml::new(&theme.secondary_color.rgb_hex());
    xml.add_text_box(geometry.heading(), [REFERENCES_TITLE], &heading_style(theme))
        .add_text_box(
            geometry.references(),
            lines.iter().map(String::as_str),
            &reference_style,
        );
    xml.finish()
}
