//! Builds the XML of one slide part, shape by shape.
use quick_xml::escape::escape;
use std::borrow::Cow;

use crate::domain::entities::aspect_ratio::EMU_PER_INCH;

/// Converts inches to EMU
pub(super) fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape, in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: inches(x),
            y: inches(y),
            width: inches(width),
            height: inches(height),
        }
    }
}

/// Character and paragraph formatting shared by every paragraph of a text body
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TextStyle {
    pub font: String,
    pub size_pt: u32,
    pub bold: bool,
    pub italic: bool,
    /// `RRGGBB`, theme text color when `None`
    pub color: Option<String>,
    pub centered: bool,
    pub bulleted: bool,
    pub space_before_pt: Option<u32>,
}

impl TextStyle {
    pub fn new(font: &str, size_pt: u32) -> Self {
        Self {
            font: font.to_string(),
            size_pt,
            bold: false,
            italic: false,
            color: None,
            centered: false,
            bulleted: false,
            space_before_pt: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, rgb_hex: String) -> Self {
        self.color = Some(rgb_hex);
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn bulleted(mut self) -> Self {
        self.bulleted = true;
        self
    }

    pub fn space_before(mut self, points: u32) -> Self {
        self.space_before_pt = Some(points);
        self
    }
}

pub(super) struct SlideXml {
    xml: String,
    next_shape_id: u32,
}

impl SlideXml {
    /// Starts a slide filled with a solid `background` (`RRGGBB`)
    pub fn new(background: &str) -> Self {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld>");
        xml.push_str(&format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            background
        ));
        xml.push_str("<p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

        // Id 1 is the shape tree itself
        Self {
            xml,
            next_shape_id: 2,
        }
    }

    /// Adds a borderless, transparent text box with one paragraph per item of `paragraphs`
    pub fn add_text_box<'a>(
        &mut self,
        frame: Frame,
        paragraphs: impl IntoIterator<Item = &'a str>,
        style: &TextStyle,
    ) -> &mut Self {
        let id = self.take_shape_id();

        self.xml.push_str("<p:sp><p:nvSpPr>");
        self.xml.push_str(&format!(
            r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
            id, id
        ));
        self.xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
        self.push_shape_properties(frame, "<a:noFill/>");
        self.push_text_body(paragraphs, style, r#"wrap="square" rtlCol="0""#);
        self.xml.push_str("</p:sp>");
        self
    }

    /// Adds a filled rectangle, with an optional centered caption
    pub fn add_rectangle(
        &mut self,
        frame: Frame,
        fill: &str,
        caption: Option<&str>,
        style: &TextStyle,
    ) -> &mut Self {
        let id = self.take_shape_id();

        self.xml.push_str("<p:sp><p:nvSpPr>");
        self.xml.push_str(&format!(
            r#"<p:cNvPr id="{}" name="Rectangle {}"/>"#,
            id, id
        ));
        self.xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");
        self.push_shape_properties(
            frame,
            &format!(
                r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:ln><a:noFill/></a:ln>"#,
                fill
            ),
        );
        self.push_text_body(caption, style, r#"wrap="square" rtlCol="0" anchor="ctr""#);
        self.xml.push_str("</p:sp>");
        self
    }

    pub fn finish(mut self) -> String {
        self.xml.push_str("</p:spTree></p:cSld>");
        self.xml
            .push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#);
        self.xml
    }

    fn take_shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn push_shape_properties(&mut self, frame: Frame, fill: &str) {
        self.xml.push_str(&format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom>{}</p:spPr>"#,
            frame.x, frame.y, frame.width, frame.height, fill
        ));
    }

    fn push_text_body<'a>(
        &mut self,
        paragraphs: impl IntoIterator<Item = &'a str>,
        style: &TextStyle,
        body_attributes: &str,
    ) {
        self.xml.push_str(&format!(
            "<p:txBody><a:bodyPr {}><a:normAutofit/></a:bodyPr><a:lstStyle/>",
            body_attributes
        ));

        let mut is_empty = true;
        for text in paragraphs {
            is_empty = false;
            self.push_paragraph(text, style);
        }
        // A text body needs at least one paragraph
        if is_empty {
            self.xml.push_str("<a:p/>");
        }

        self.xml.push_str("</p:txBody>");
    }

    fn push_paragraph(&mut self, text: &str, style: &TextStyle) {
        self.xml.push_str("<a:p>");

        let mut paragraph_properties = String::new();
        if let Some(points) = style.space_before_pt {
            paragraph_properties.push_str(&format!(
                r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#,
                points * 100
            ));
        }
        if style.bulleted {
            paragraph_properties
                .push_str(r#"<a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#);
        }

        let mut attributes = String::new();
        if style.centered {
            attributes.push_str(r#" algn="ctr""#);
        }
        if style.bulleted {
            attributes.push_str(r#" marL="342900" indent="-342900""#);
        }

        if !attributes.is_empty() || !paragraph_properties.is_empty() {
            self.xml.push_str(&format!(
                "<a:pPr{}>{}</a:pPr>",
                attributes, paragraph_properties
            ));
        }

        let run_properties = run_properties(style);
        if text.is_empty() {
            self.xml
                .push_str(&format!("<a:endParaRPr{}</a:endParaRPr>", run_properties));
        } else {
            self.xml.push_str(&format!(
                "<a:r><a:rPr{}</a:rPr><a:t>{}</a:t></a:r>",
                run_properties,
                xml_text(text)
            ));
        }

        self.xml.push_str("</a:p>");
    }
}

/// Escapes `text` for an XML text node or attribute value.
///
/// Characters outside the XML 1.0 `Char` production (most C0 controls, U+FFFE, U+FFFF) are
/// not allowed in a part even when escaped: they are dropped.
pub(super) fn xml_text(text: &str) -> String {
    let allowed = if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect::<String>())
    };

    escape(&allowed).into_owned()
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Attributes and children of a run properties element, from after the tag name up to its closing tag
fn run_properties(style: &TextStyle) -> String {
    let mut properties = format!(r#" lang="en-US" sz="{}""#, style.size_pt * 100);
    if style.bold {
        properties.push_str(r#" b="1""#);
    }
    if style.italic {
        properties.push_str(r#" i="1""#);
    }
    properties.push_str(r#" dirty="0">"#);

    if let Some(color) = &style.color {
        properties.push_str(&format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color
        ));
    }
    properties.push_str(&format!(
        r#"<a:latin typeface="{}"/><a:cs typeface="{}"/>"#,
        xml_text(&style.font),
        xml_text(&style.font)
    ));

    properties
}
