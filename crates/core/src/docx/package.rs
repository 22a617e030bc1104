//! OOXML package access: the ZIP container and its auxiliary XML parts.
//!
//! Relationships are read with a streaming `quick-xml` reader; styles and
//! numbering definitions are small enough to load into a `roxmltree` DOM.

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use roxmltree::Node;
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const NUMBERING_PART: &str = "word/numbering.xml";

/// Failures while reading a part out of the package.
#[derive(Error, Debug)]
pub(crate) enum PackageError {
    #[error("not a valid .docx archive: {0}")]
    Zip(#[from] ZipError),

    #[error("part is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed relationships part: {0}")]
    Relationships(#[from] quick_xml::Error),
}

/// Source of embedded media bytes, keyed by part name (`word/media/image1.png`).
pub(crate) trait MediaLoader {
    fn load(&mut self, part: &str) -> Option<Vec<u8>>;
}

impl MediaLoader for HashMap<String, Vec<u8>> {
    fn load(&mut self, part: &str) -> Option<Vec<u8>> {
        self.get(part).cloned()
    }
}

/// An opened `.docx` container.
pub(crate) struct Package<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    pub(crate) fn open(reader: R) -> Result<Self, PackageError> {
        Ok(Self { archive: ZipArchive::new(reader)? })
    }

    /// Reads a part as bytes; `Ok(None)` when the part does not exist.
    pub(crate) fn read_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>, PackageError> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(ZipError::Io)?;
        Ok(Some(buf))
    }

    /// Reads a part as UTF-8 text with any byte-order mark removed.
    pub(crate) fn read_text(&mut self, name: &str) -> Result<Option<String>, PackageError> {
        match self.read_bytes(name)? {
            Some(bytes) => {
                let text = String::from_utf8(bytes)?;
                Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
            }
            None => Ok(None),
        }
    }
}

impl<R: Read + Seek> MediaLoader for Package<R> {
    fn load(&mut self, part: &str) -> Option<Vec<u8>> {
        self.read_bytes(part).ok().flatten()
    }
}

/// A target from `document.xml.rels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Part name of an internal target, resolved against the `word/` folder.
    pub(crate) fn part_name(&self) -> String {
        resolve_part_name(&self.target)
    }
}

pub(crate) type Relationships = HashMap<String, Relationship>;

/// Parse `word/_rels/document.xml.rels` into an id → target map.
pub(crate) fn parse_relationships(xml: &str) -> Result<Relationships, PackageError> {
    let mut relationships = HashMap::new();
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut external = false;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => external = value.eq_ignore_ascii_case("External"),
                        _ => {}
                    }
                }

                if let (Some(id), Some(target)) = (id, target) {
                    relationships.insert(id, Relationship { target, external });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(relationships)
}

/// Resolve a relationship target (`media/image1.png`, `../media/x.png`,
/// `/word/media/x.png`) to a part name inside the archive.
pub(crate) fn resolve_part_name(target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Paragraph style id → display name, from `word/styles.xml`.
pub(crate) fn parse_styles(xml: &str) -> Result<HashMap<String, String>, PackageError> {
    let doc = roxmltree::Document::parse(xml)?;
    let styles = doc
        .descendants()
        .filter(|n| n.has_tag_name_local("style"))
        .filter_map(|style| {
            let id = attr(style, "styleId")?;
            let name = child(style, "name").and_then(|n| attr(n, "val")).unwrap_or(id);
            Some((id.to_string(), name.to_string()))
        })
        .collect();
    Ok(styles)
}

/// Whether a numbered paragraph renders as `<ul>` or `<ol>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// List kinds per `(numId, level)`, from `word/numbering.xml`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Numbering {
    levels: HashMap<(String, u32), ListKind>,
}

impl Numbering {
    pub(crate) fn parse(xml: &str) -> Result<Self, PackageError> {
        let doc = roxmltree::Document::parse(xml)?;

        let mut abstract_levels: HashMap<String, Vec<(u32, ListKind)>> = HashMap::new();
        for abstract_num in doc.descendants().filter(|n| n.has_tag_name_local("abstractNum")) {
            let Some(id) = attr(abstract_num, "abstractNumId") else { continue };
            let levels = abstract_num
                .children()
                .filter(|n| n.has_tag_name_local("lvl"))
                .filter_map(|lvl| {
                    let level = attr(lvl, "ilvl")?.parse().ok()?;
                    let format = child(lvl, "numFmt").and_then(|n| attr(n, "val")).unwrap_or("bullet");
                    let kind = if format == "bullet" { ListKind::Unordered } else { ListKind::Ordered };
                    Some((level, kind))
                })
                .collect();
            abstract_levels.insert(id.to_string(), levels);
        }

        let mut levels = HashMap::new();
        for num in doc.descendants().filter(|n| n.has_tag_name_local("num")) {
            let Some(num_id) = attr(num, "numId") else { continue };
            let Some(abstract_id) = child(num, "abstractNumId").and_then(|n| attr(n, "val")) else { continue };
            if let Some(defs) = abstract_levels.get(abstract_id) {
                for (level, kind) in defs {
                    levels.insert((num_id.to_string(), *level), *kind);
                }
            }
        }

        Ok(Self { levels })
    }

    /// Unknown definitions fall back to a bulleted list.
    pub(crate) fn kind(&self, num_id: &str, level: u32) -> ListKind {
        self.levels
            .get(&(num_id.to_string(), level))
            .copied()
            .unwrap_or(ListKind::Unordered)
    }
}

/// Local-name matching; WordprocessingML prefixes vary between producers.
pub(crate) trait LocalName {
    fn has_tag_name_local(&self, name: &str) -> bool;
}

impl LocalName for Node<'_, '_> {
    fn has_tag_name_local(&self, name: &str) -> bool {
        self.is_element() && self.tag_name().name() == name
    }
}

pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes().find(|a| a.name() == name).map(|a| a.value())
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name_local(name))
}

/// Content type for an embedded image, from its file extension.
pub(crate) fn image_mime_type(part: &str) -> &'static str {
    let ext = part.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = parse_relationships(RELS).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels["rId5"].part_name(), "word/media/image1.png");
        assert!(!rels["rId5"].external);
        assert!(rels["rId9"].external);
        assert_eq!(rels["rId9"].target, "https://example.com/");
    }

    #[test]
    fn test_resolve_part_name() {
        assert_eq!(resolve_part_name("media/a.png"), "word/media/a.png");
        assert_eq!(resolve_part_name("../media/a.png"), "media/a.png");
        assert_eq!(resolve_part_name("/word/media/a.png"), "word/media/a.png");
        assert_eq!(resolve_part_name("./media/./a.png"), "word/media/a.png");
    }

    #[test]
    fn test_parse_styles() {
        let xml = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
            <w:style w:type="paragraph" w:styleId="Fancy"><w:name w:val="Fancy Style"/></w:style>
            <w:style w:type="paragraph" w:styleId="NoName"/>
        </w:styles>"#;
        let styles = parse_styles(xml).unwrap();
        assert_eq!(styles["Heading1"], "heading 1");
        assert_eq!(styles["Fancy"], "Fancy Style");
        assert_eq!(styles["NoName"], "NoName");
    }

    #[test]
    fn test_parse_numbering() {
        let xml = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:abstractNum w:abstractNumId="0">
                <w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl>
                <w:lvl w:ilvl="1"><w:numFmt w:val="decimal"/></w:lvl>
            </w:abstractNum>
            <w:abstractNum w:abstractNumId="1">
                <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl>
            </w:abstractNum>
            <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
            <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
        </w:numbering>"#;
        let numbering = Numbering::parse(xml).unwrap();
        assert_eq!(numbering.kind("1", 0), ListKind::Unordered);
        assert_eq!(numbering.kind("1", 1), ListKind::Ordered);
        assert_eq!(numbering.kind("2", 0), ListKind::Ordered);
        assert_eq!(numbering.kind("7", 0), ListKind::Unordered);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(matches!(parse_styles("<w:styles>"), Err(PackageError::Xml(_))));
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type("word/media/image1.PNG"), "image/png");
        assert_eq!(image_mime_type("word/media/photo.jpeg"), "image/jpeg");
        assert_eq!(image_mime_type("word/media/chart.emf"), "image/x-emf");
        assert_eq!(image_mime_type("word/media/blob"), "application/octet-stream");
    }
}
