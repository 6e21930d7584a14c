//! Parts of the package that do not depend on slide content.
//!
//! One slide master with one blank layout and one theme: every slide is drawn with explicit
//! shapes, nothing is inherited from placeholders.
use chrono::{DateTime, SecondsFormat, Utc};

use super::slide_xml::xml_text;
use crate::domain::entities::theme::ThemeConfig;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const RELATIONSHIP_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_DOCUMENT_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(super) const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
pub(super) const ROOT_RELS_PATH: &str = "_rels/.rels";
pub(super) const CORE_PROPS_PATH: &str = "docProps/core.xml";
pub(super) const APP_PROPS_PATH: &str = "docProps/app.xml";
pub(super) const PRESENTATION_PATH: &str = "ppt/presentation.xml";
pub(super) const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";
pub(super) const SLIDE_MASTER_PATH: &str = "ppt/slideMasters/slideMaster1.xml";
pub(super) const SLIDE_MASTER_RELS_PATH: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
pub(super) const SLIDE_LAYOUT_PATH: &str = "ppt/slideLayouts/slideLayout1.xml";
pub(super) const SLIDE_LAYOUT_RELS_PATH: &str = "ppt/slideLayouts/_rels/slideLayout1.xml.rels";
pub(super) const THEME_PATH: &str = "ppt/theme/theme1.xml";

/// Part name of the slide at 1-based `number`
pub(super) fn slide_path(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

pub(super) fn slide_rels_path(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

pub(super) fn content_types_xml(num_slides: usize) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let overrides = [
        (PRESENTATION_PATH, "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
        (SLIDE_MASTER_PATH, "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
        (SLIDE_LAYOUT_PATH, "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
        (THEME_PATH, "application/vnd.openxmlformats-officedocument.theme+xml"),
        (CORE_PROPS_PATH, "application/vnd.openxmlformats-package.core-properties+xml"),
        (APP_PROPS_PATH, "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
    ];
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            part, content_type
        ));
    }
    for number in 1..=num_slides {
        xml.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            slide_path(number)
        ));
    }

    xml.push_str("</Types>");
    xml
}

fn relationships_xml<'a>(relationships: impl IntoIterator<Item = (String, &'a str, String)>) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIP_NAMESPACE));
    for (id, kind, target) in relationships {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub(super) fn root_rels_xml() -> String {
    relationships_xml([
        (
            "rId1".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            PRESENTATION_PATH.to_string(),
        ),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            CORE_PROPS_PATH.to_string(),
        ),
        (
            "rId3".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties",
            APP_PROPS_PATH.to_string(),
        ),
    ])
}

/// Relationship id of the slide at 1-based `number` in the presentation part.
/// `rId1` is the master and `rId2` the theme.
fn slide_relationship_id(number: usize) -> String {
    format!("rId{}", number + 2)
}

pub(super) fn presentation_xml(num_slides: usize, (width, height): (i64, i64)) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{}" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#,
        OFFICE_DOCUMENT_RELATIONSHIP
    ));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    xml.push_str("<p:sldIdLst>");
    for number in 1..=num_slides {
        // Slide ids start at 256
        xml.push_str(&format!(
            r#"<p:sldId id="{}" r:id="{}"/>"#,
            255 + number,
            slide_relationship_id(number)
        ));
    }
    xml.push_str("</p:sldIdLst>");

    xml.push_str(&format!(r#"<p:sldSz cx="{}" cy="{}"/>"#, width, height));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

pub(super) fn presentation_rels_xml(num_slides: usize) -> String {
    let fixed = [
        (
            "rId1".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme",
            "theme/theme1.xml".to_string(),
        ),
    ];
    let slides = (1..=num_slides).map(|number| {
        (
            slide_relationship_id(number),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide",
            format!("slides/slide{}.xml", number),
        )
    });

    relationships_xml(fixed.into_iter().chain(slides))
}

pub(super) fn slide_rels_xml() -> String {
    relationships_xml([(
        "rId1".to_string(),
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
        "../slideLayouts/slideLayout1.xml".to_string(),
    )])
}

const EMPTY_SHAPE_TREE: &str = concat!(
    "<p:spTree>",
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    "</p:spTree>",
);

pub(super) fn slide_master_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{}" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
        OFFICE_DOCUMENT_RELATIONSHIP
    ));
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str(EMPTY_SHAPE_TREE);
    xml.push_str("</p:cSld>");
    xml.push_str(r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#);
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("<p:txStyles>");
    for style in ["titleStyle", "bodyStyle", "otherStyle"] {
        xml.push_str(&format!(
            r#"<p:{style}><a:lvl1pPr><a:defRPr><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:{style}>"#
        ));
    }
    xml.push_str("</p:txStyles>");
    xml.push_str("</p:sldMaster>");
    xml
}

pub(super) fn slide_master_rels_xml() -> String {
    relationships_xml([
        (
            "rId1".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
            "../slideLayouts/slideLayout1.xml".to_string(),
        ),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme",
            "../theme/theme1.xml".to_string(),
        ),
    ])
}

pub(super) fn slide_layout_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{}" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">"#,
        OFFICE_DOCUMENT_RELATIONSHIP
    ));
    xml.push_str(r#"<p:cSld name="Blank">"#);
    xml.push_str(EMPTY_SHAPE_TREE);
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

pub(super) fn slide_layout_rels_xml() -> String {
    relationships_xml([(
        "rId1".to_string(),
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
        "../slideMasters/slideMaster1.xml".to_string(),
    )])
}

/// The theme carries the presentation colors and font, so that text added later in an
/// editor matches the generated slides
pub(super) fn theme_xml(theme: &ThemeConfig) -> String {
    let primary = theme.primary_color.rgb_hex();
    let secondary = theme.secondary_color.rgb_hex();
    let font = xml_text(&theme.font_name);

    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Generated">"#);
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Generated">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    xml.push_str(&format!(r#"<a:dk2><a:srgbClr val="{}"/></a:dk2>"#, primary));
    xml.push_str(&format!(r#"<a:lt2><a:srgbClr val="{}"/></a:lt2>"#, secondary));
    xml.push_str(&format!(r#"<a:accent1><a:srgbClr val="{}"/></a:accent1>"#, primary));
    for (name, color) in [
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ] {
        xml.push_str(&format!(r#"<a:{name}><a:srgbClr val="{color}"/></a:{name}>"#));
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Generated">"#);
    for scheme in ["majorFont", "minorFont"] {
        xml.push_str(&format!(
            r#"<a:{scheme}><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:{scheme}>"#
        ));
    }
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Generated">"#);
    xml.push_str("<a:fillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        xml.push_str(&format!(
            r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#,
            width
        ));
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    xml.push_str("<a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("</a:theme>");
    xml
}

pub(super) fn core_props_xml(title: &str, created_at: DateTime<Utc>) -> String {
    let created_at = created_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    xml.push_str(&format!("<dc:title>{}</dc:title>", xml_text(title)));
    xml.push_str("<dc:creator>Slide Generator API</dc:creator>");
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        created_at
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        created_at
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

pub(super) fn app_props_xml(num_slides: usize) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    xml.push_str("<Application>Slide Generator API</Application>");
    xml.push_str(&format!("<Slides>{}</Slides>", num_slides));
    xml.push_str("</Properties>");
    xml
}
