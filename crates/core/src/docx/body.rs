//! Walks `word/document.xml` and writes semantic HTML.

use std::collections::{HashMap, HashSet};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::escape::escape;
use roxmltree::Node;

use super::package::{
    ListKind, LocalName, MediaLoader, Numbering, PackageError, Relationships, attr, child, image_mime_type,
};
use crate::extract::ConversionWarning;

const CODE_STYLES: &[&str] = &["code", "source code", "html preformatted", "plain text"];
const QUOTE_STYLES: &[&str] = &["quote", "intense quote"];
const PLAIN_STYLES: &[&str] = &["normal", "body text", "list paragraph", "no spacing", "normal (web)"];
const POOR_BROWSER_SUPPORT: &[&str] = &["image/x-emf", "image/x-wmf", "image/tiff"];
/// Deepest list level WordprocessingML defines (`w:ilvl` runs 0..=8).
const MAX_LIST_LEVEL: u32 = 8;

/// How a paragraph is emitted, derived from its style and numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Paragraph,
    Heading(u8),
    Code,
    Quote,
    ListItem { kind: ListKind, level: u32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RunFormat {
    bold: bool,
    italic: bool,
    strike: bool,
    superscript: bool,
    subscript: bool,
}

impl RunFormat {
    fn wrap(&self, text: &str) -> String {
        let mut out = text.to_string();
        if self.superscript {
            out = format!("<sup>{}</sup>", out);
        } else if self.subscript {
            out = format!("<sub>{}</sub>", out);
        }
        if self.strike {
            out = format!("<s>{}</s>", out);
        }
        if self.italic {
            out = format!("<em>{}</em>", out);
        }
        if self.bold {
            out = format!("<strong>{}</strong>", out);
        }
        out
    }
}

/// Inline output of a paragraph before formatting is applied. Adjacent text
/// segments with identical formatting are merged so `<strong>a</strong><strong>b</strong>`
/// never reaches the renderer.
enum Segment {
    Text(RunFormat, String),
    Raw(String),
}

#[derive(Default)]
struct Inline {
    segments: Vec<Segment>,
}

impl Inline {
    fn push_text(&mut self, format: RunFormat, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last_format, last_text)) = self.segments.last_mut()
            && *last_format == format
        {
            last_text.push_str(text);
            return;
        }
        self.segments.push(Segment::Text(format, text.to_string()));
    }

    fn push_raw(&mut self, html: String) {
        self.segments.push(Segment::Raw(html));
    }

    fn into_html(self) -> String {
        self.segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(format, text) => format.wrap(&text),
                Segment::Raw(html) => html,
            })
            .collect()
    }
}

struct ListFrame {
    kind: ListKind,
    item_open: bool,
}

/// Stateful HTML writer for one document body.
pub(crate) struct BodyWriter<'a, M: MediaLoader> {
    styles: &'a HashMap<String, String>,
    numbering: &'a Numbering,
    relationships: &'a Relationships,
    media: &'a mut M,
    html: String,
    lists: Vec<ListFrame>,
    code_lines: Vec<String>,
    warnings: Vec<ConversionWarning>,
    reported_styles: HashSet<String>,
}

impl<'a, M: MediaLoader> BodyWriter<'a, M> {
    pub(crate) fn new(
        styles: &'a HashMap<String, String>,
        numbering: &'a Numbering,
        relationships: &'a Relationships,
        media: &'a mut M,
    ) -> Self {
        Self {
            styles,
            numbering,
            relationships,
            media,
            html: String::new(),
            lists: Vec::new(),
            code_lines: Vec::new(),
            warnings: Vec::new(),
            reported_styles: HashSet::new(),
        }
    }

    /// Converts the whole document part, returning the HTML and collected warnings.
    pub(crate) fn write_document(mut self, xml: &str) -> Result<(String, Vec<ConversionWarning>), PackageError> {
        let doc = roxmltree::Document::parse(xml)?;
        if let Some(body) = doc.descendants().find(|n| n.has_tag_name_local("body")) {
            self.write_blocks(body);
        }
        self.flush_code();
        self.close_lists(0);
        Ok((self.html, self.warnings))
    }

    fn write_blocks(&mut self, parent: Node) {
        for node in parent.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "p" => self.write_paragraph(node),
                "tbl" => {
                    self.flush_code();
                    self.close_lists(0);
                    self.write_table(node);
                }
                "sdt" => {
                    if let Some(content) = child(node, "sdtContent") {
                        self.write_blocks(content);
                    }
                }
                "customXml" | "ins" => self.write_blocks(node),
                _ => {}
            }
        }
    }

    fn write_paragraph(&mut self, p: Node) {
        let block = self.classify(p);

        if block != Block::Code {
            self.flush_code();
        }
        if !matches!(block, Block::ListItem { .. }) {
            self.close_lists(0);
        }

        if block == Block::Code {
            self.code_lines.push(escape(plain_text(p).as_str()).into_owned());
            return;
        }

        let content = self.inline_html(p);
        if content.trim().is_empty() {
            return;
        }

        match block {
            Block::Paragraph => self.html.push_str(&format!("<p>{}</p>", content)),
            Block::Heading(level) => self.html.push_str(&format!("<h{0}>{1}</h{0}>", level, content)),
            Block::Quote => self.html.push_str(&format!("<blockquote><p>{}</p></blockquote>", content)),
            Block::ListItem { kind, level } => self.write_list_item(kind, level, &content),
            Block::Code => {}
        }
    }

    fn classify(&mut self, p: Node) -> Block {
        let props = child(p, "pPr");
        let style_id = props.and_then(|pr| child(pr, "pStyle")).and_then(|s| attr(s, "val"));
        let style_name = style_id
            .map(|id| self.styles.get(id).map(String::as_str).unwrap_or(id).to_string())
            .unwrap_or_default();
        let lowered = style_name.to_lowercase();

        let numbering = props.and_then(|pr| child(pr, "numPr"));
        if let Some(num_pr) = numbering {
            let num_id = child(num_pr, "numId").and_then(|n| attr(n, "val")).unwrap_or("0");
            if num_id != "0" {
                let level = child(num_pr, "ilvl")
                    .and_then(|n| attr(n, "val"))
                    .and_then(|v| v.parse::<u32>().ok())
                    .map_or(0, |level| level.min(MAX_LIST_LEVEL));
                return Block::ListItem { kind: self.numbering.kind(num_id, level), level };
            }
        }

        if let Some(level) = heading_level(&lowered) {
            return Block::Heading(level);
        }

        match lowered.as_str() {
            "" => Block::Paragraph,
            "title" => Block::Heading(1),
            "subtitle" => Block::Heading(2),
            "list bullet" => Block::ListItem { kind: ListKind::Unordered, level: 0 },
            "list number" => Block::ListItem { kind: ListKind::Ordered, level: 0 },
            s if CODE_STYLES.contains(&s) => Block::Code,
            s if QUOTE_STYLES.contains(&s) => Block::Quote,
            s if PLAIN_STYLES.contains(&s) => Block::Paragraph,
            _ => {
                let id = style_id.unwrap_or_default().to_string();
                if self.reported_styles.insert(id.clone()) {
                    self.warnings.push(ConversionWarning::new(format!(
                        "Unrecognised paragraph style: '{}' (Style ID: {})",
                        style_name, id
                    )));
                }
                Block::Paragraph
            }
        }
    }

    fn write_list_item(&mut self, kind: ListKind, level: u32, content: &str) {
        let depth = level as usize + 1;

        self.close_lists(depth);
        if self.lists.len() == depth && self.lists.last().is_some_and(|top| top.kind != kind) {
            self.close_lists(depth - 1);
        }
        while self.lists.len() < depth {
            self.html.push_str(&format!("<{}>", kind.tag()));
            self.lists.push(ListFrame { kind, item_open: false });
        }

        if let Some(top) = self.lists.last_mut() {
            if top.item_open {
                self.html.push_str("</li>");
            }
            top.item_open = true;
        }
        self.html.push_str("<li>");
        self.html.push_str(content);
    }

    /// Close open lists until at most `depth` remain.
    fn close_lists(&mut self, depth: usize) {
        while self.lists.len() > depth {
            if let Some(frame) = self.lists.pop() {
                if frame.item_open {
                    self.html.push_str("</li>");
                }
                self.html.push_str(&format!("</{}>", frame.kind.tag()));
            }
        }
    }

    fn flush_code(&mut self) {
        if self.code_lines.is_empty() {
            return;
        }
        let code = self.code_lines.join("\n");
        self.code_lines.clear();
        self.html.push_str(&format!("<pre><code>{}</code></pre>", code));
    }

    fn write_table(&mut self, table: Node) {
        let rows: Vec<(bool, Vec<String>)> = table
            .children()
            .filter(|n| n.has_tag_name_local("tr"))
            .map(|row| {
                let header = child(row, "trPr").and_then(|pr| child(pr, "tblHeader")).is_some_and(|h| !is_off(h));
                let cells = row
                    .children()
                    .filter(|n| n.has_tag_name_local("tc"))
                    .map(|cell| self.cell_html(cell))
                    .collect();
                (header, cells)
            })
            .collect();

        if rows.is_empty() {
            return;
        }

        let header_rows = rows.iter().take_while(|(header, _)| *header).count();
        let mut html = String::from("<table>");
        for (index, (header, cells)) in rows.iter().enumerate() {
            if index == 0 && header_rows > 0 {
                html.push_str("<thead>");
            }
            if index == header_rows {
                if header_rows > 0 {
                    html.push_str("</thead>");
                }
                html.push_str("<tbody>");
            }
            let tag = if *header { "th" } else { "td" };
            html.push_str("<tr>");
            for cell in cells {
                html.push_str(&format!("<{0}>{1}</{0}>", tag, cell));
            }
            html.push_str("</tr>");
        }
        html.push_str(if header_rows == rows.len() { "</thead>" } else { "</tbody>" });
        html.push_str("</table>");

        self.html.push_str(&html);
    }

    fn cell_html(&mut self, cell: Node) -> String {
        cell.descendants()
            .filter(|n| n.has_tag_name_local("p"))
            .map(|p| self.inline_html(p))
            .filter(|content| !content.trim().is_empty())
            .collect::<Vec<_>>()
            .join("<br />")
    }

    fn inline_html(&mut self, parent: Node) -> String {
        let mut inline = Inline::default();
        self.collect_inline(parent, &mut inline);
        inline.into_html()
    }

    fn collect_inline(&mut self, parent: Node, inline: &mut Inline) {
        for node in parent.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "r" => self.collect_run(node, inline),
                "hyperlink" => {
                    let content = self.inline_html(node);
                    match self.hyperlink_href(node) {
                        Some(href) if !content.is_empty() => {
                            inline.push_raw(format!("<a href=\"{}\">{}</a>", escape(href.as_str()), content))
                        }
                        _ => inline.push_raw(content),
                    }
                }
                "ins" | "smartTag" | "fldSimple" | "customXml" => self.collect_inline(node, inline),
                "sdt" => {
                    if let Some(content) = child(node, "sdtContent") {
                        self.collect_inline(content, inline);
                    }
                }
                _ => {}
            }
        }
    }

    fn hyperlink_href(&self, link: Node) -> Option<String> {
        let by_relationship = attr(link, "id")
            .and_then(|id| self.relationships.get(id))
            .map(|rel| rel.target.clone());
        let anchor = attr(link, "anchor").map(|anchor| format!("#{}", anchor));
        match (by_relationship, anchor) {
            (Some(target), Some(anchor)) => Some(format!("{}{}", target, anchor)),
            (Some(target), None) => Some(target),
            (None, anchor) => anchor,
        }
    }

    fn collect_run(&mut self, run: Node, inline: &mut Inline) {
        let format = run_format(run);
        for node in run.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "t" => inline.push_text(format, &escape(node.text().unwrap_or_default())),
                "tab" => inline.push_text(format, "\t"),
                "noBreakHyphen" => inline.push_text(format, "-"),
                "br" if attr(node, "type").is_none_or(|t| t == "textWrapping") => inline.push_raw("<br />".into()),
                "cr" => inline.push_raw("<br />".into()),
                "drawing" => {
                    if let Some(img) = self.drawing_image(node) {
                        inline.push_raw(img);
                    }
                }
                "pict" => {
                    if let Some(img) = self.vml_image(node) {
                        inline.push_raw(img);
                    }
                }
                _ => {}
            }
        }
    }

    fn drawing_image(&mut self, drawing: Node) -> Option<String> {
        let doc_pr = drawing.descendants().find(|n| n.has_tag_name_local("docPr"));
        let alt = doc_pr.and_then(|n| attr(n, "descr")).unwrap_or_default();
        let title = doc_pr.and_then(|n| attr(n, "title")).unwrap_or_default();
        let blip = drawing.descendants().find(|n| n.has_tag_name_local("blip"))?;

        if let Some(id) = attr(blip, "embed") {
            self.embedded_image(id, alt, title)
        } else {
            let id = attr(blip, "link")?;
            self.linked_image(id, alt, title)
        }
    }

    fn vml_image(&mut self, pict: Node) -> Option<String> {
        let data = pict.descendants().find(|n| n.has_tag_name_local("imagedata"))?;
        let alt = attr(data, "title").unwrap_or_default();
        let id = attr(data, "id")?;
        self.embedded_image(id, alt, "")
    }

    fn embedded_image(&mut self, id: &str, alt: &str, title: &str) -> Option<String> {
        let Some(relationship) = self.relationships.get(id) else {
            self.warnings.push(ConversionWarning::new(format!(
                "Could not find image file for relationship '{}'",
                id
            )));
            return None;
        };
        if relationship.external {
            return Some(img_tag(&relationship.target, alt, title));
        }

        let part = relationship.part_name();
        let Some(bytes) = self.media.load(&part) else {
            self.warnings.push(ConversionWarning::new(format!("Could not find image file '{}'", part)));
            return None;
        };

        let mime = image_mime_type(&part);
        if POOR_BROWSER_SUPPORT.contains(&mime) {
            self.warnings.push(ConversionWarning::new(format!(
                "Image of type {} is unlikely to display in web browsers",
                mime
            )));
        }

        let src = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
        Some(img_tag(&src, alt, title))
    }

    fn linked_image(&mut self, id: &str, alt: &str, title: &str) -> Option<String> {
        match self.relationships.get(id) {
            Some(relationship) => Some(img_tag(&relationship.target, alt, title)),
            None => {
                self.warnings.push(ConversionWarning::new(format!(
                    "Could not find linked image for relationship '{}'",
                    id
                )));
                None
            }
        }
    }
}

fn img_tag(src: &str, alt: &str, title: &str) -> String {
    let mut tag = format!("<img src=\"{}\" alt=\"{}\"", escape(src), escape(alt));
    if !title.is_empty() {
        tag.push_str(&format!(" title=\"{}\"", escape(title)));
    }
    tag.push_str(" />");
    tag
}

fn heading_level(style: &str) -> Option<u8> {
    let level: u8 = style.strip_prefix("heading")?.trim().parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn run_format(run: Node) -> RunFormat {
    let mut format = RunFormat::default();
    let Some(props) = child(run, "rPr") else { return format };

    for prop in props.children().filter(|n| n.is_element()) {
        match prop.tag_name().name() {
            "b" => format.bold = !is_off(prop),
            "i" => format.italic = !is_off(prop),
            "strike" | "dstrike" => format.strike = format.strike || !is_off(prop),
            "vertAlign" => match attr(prop, "val") {
                Some("superscript") => format.superscript = true,
                Some("subscript") => format.subscript = true,
                _ => {}
            },
            _ => {}
        }
    }
    format
}

/// Toggle properties are on unless `w:val` says otherwise.
fn is_off(prop: Node) -> bool {
    matches!(attr(prop, "val"), Some("0" | "false" | "off" | "none"))
}

fn plain_text(p: Node) -> String {
    p.descendants()
        .filter(|n| n.is_element())
        .filter_map(|n| match n.tag_name().name() {
            "t" => n.text().map(str::to_string),
            "tab" => Some("\t".to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::package::Relationship;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

    struct Fixture {
        styles: HashMap<String, String>,
        numbering: Numbering,
        relationships: Relationships,
        media: HashMap<String, Vec<u8>>,
    }

    impl Fixture {
        fn new() -> Self {
            let styles = [("Heading2", "heading 2"), ("Title", "Title"), ("Code", "Code"), ("Fancy", "Fancy Style")]
                .into_iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect();
            let numbering = Numbering::parse(&format!(
                r#"<w:numbering {W}>
                    <w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl><w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/></w:lvl></w:abstractNum>
                    <w:abstractNum w:abstractNumId="1"><w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl></w:abstractNum>
                    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
                    <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
                </w:numbering>"#
            ))
            .unwrap();
            let mut relationships = Relationships::new();
            relationships.insert(
                "rId5".to_string(),
                Relationship { target: "media/image1.png".to_string(), external: false },
            );
            relationships.insert(
                "rId6".to_string(),
                Relationship { target: "media/image2.emf".to_string(), external: false },
            );
            relationships.insert(
                "rId9".to_string(),
                Relationship { target: "https://example.com/".to_string(), external: true },
            );
            let mut media = HashMap::new();
            media.insert("word/media/image1.png".to_string(), vec![0x89, b'P', b'N', b'G']);
            media.insert("word/media/image2.emf".to_string(), vec![1, 2, 3]);
            Self { styles, numbering, relationships, media }
        }

        fn convert(&mut self, body: &str) -> (String, Vec<ConversionWarning>) {
            let xml = format!(r#"<w:document {W}><w:body>{body}</w:body></w:document>"#);
            BodyWriter::new(&self.styles, &self.numbering, &self.relationships, &mut self.media)
                .write_document(&xml)
                .unwrap()
        }
    }

    fn para(style: Option<&str>, runs: &str) -> String {
        let props = style.map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#)).unwrap_or_default();
        format!("<w:p>{props}{runs}</w:p>")
    }

    fn run(text: &str) -> String {
        format!(r#"<w:r><w:t xml:space="preserve">{text}</w:t></w:r>"#)
    }

    fn list_item(num_id: u32, level: u32, text: &str) -> String {
        format!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr>{}</w:p>"#,
            run(text)
        )
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let mut fixture = Fixture::new();
        let body = [para(Some("Title"), &run("Report")), para(Some("Heading2"), &run("Intro")), para(None, &run("Body"))]
            .concat();
        let (html, warnings) = fixture.convert(&body);
        assert_eq!(html, "<h1>Report</h1><h2>Intro</h2><p>Body</p>");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_empty_paragraphs_are_dropped() {
        let mut fixture = Fixture::new();
        let (html, _) = fixture.convert(&[para(None, ""), para(None, &run("x"))].concat());
        assert_eq!(html, "<p>x</p>");
    }

    #[test]
    fn test_run_formatting_is_merged() {
        let mut fixture = Fixture::new();
        let runs = r#"<w:r><w:rPr><w:b/></w:rPr><w:t>Hello </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r><w:r><w:rPr><w:strike/></w:rPr><w:t>gone</w:t></w:r><w:r><w:rPr><w:i w:val="0"/></w:rPr><w:t> plain</w:t></w:r>"#;
        let (html, _) = fixture.convert(&para(None, runs));
        assert_eq!(html, "<p><strong>Hello bold</strong><s>gone</s> plain</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut fixture = Fixture::new();
        let (html, _) = fixture.convert(&para(None, &run("a &lt; b &amp; c")));
        assert_eq!(html, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_nested_lists() {
        let mut fixture = Fixture::new();
        let body = [list_item(1, 0, "one"), list_item(1, 1, "nested"), list_item(1, 0, "two"), list_item(2, 0, "first")]
            .concat();
        let (html, _) = fixture.convert(&body);
        assert_eq!(
            html,
            "<ul><li>one<ul><li>nested</li></ul></li><li>two</li></ul><ol><li>first</li></ol>"
        );
    }

    #[test]
    fn test_list_level_is_clamped() {
        let mut fixture = Fixture::new();
        let (html, _) = fixture.convert(&[list_item(1, 20000, "deep"), list_item(1, 0, "top")].concat());
        assert_eq!(html.matches("<ul>").count(), (MAX_LIST_LEVEL + 1) as usize);
        assert!(html.len() < 200, "got {} bytes", html.len());
        assert!(html.ends_with("<li>top</li></ul>"));
    }

    #[test]
    fn test_code_paragraphs_merge() {
        let mut fixture = Fixture::new();
        let body = [para(Some("Code"), &run("fn main() {")), para(Some("Code"), &run("}")), para(None, &run("after"))]
            .concat();
        let (html, _) = fixture.convert(&body);
        assert_eq!(html, "<pre><code>fn main() {\n}</code></pre><p>after</p>");
    }

    #[test]
    fn test_unknown_style_warns_once() {
        let mut fixture = Fixture::new();
        let body = [para(Some("Fancy"), &run("a")), para(Some("Fancy"), &run("b"))].concat();
        let (html, warnings) = fixture.convert(&body);
        assert_eq!(html, "<p>a</p><p>b</p>");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("Fancy Style"));
        assert!(warnings[0].message.contains("Style ID: Fancy"));
    }

    #[test]
    fn test_hyperlinks() {
        let mut fixture = Fixture::new();
        let runs = format!(
            r#"<w:hyperlink r:id="rId9">{}</w:hyperlink><w:hyperlink w:anchor="intro">{}</w:hyperlink>"#,
            run("site"),
            run("jump")
        );
        let (html, _) = fixture.convert(&para(None, &runs));
        assert_eq!(html, r##"<p><a href="https://example.com/">site</a><a href="#intro">jump</a></p>"##);
    }

    #[test]
    fn test_table_with_header_row() {
        let mut fixture = Fixture::new();
        let table = format!(
            r#"<w:tbl><w:tr><w:trPr><w:tblHeader/></w:trPr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr><w:tr><w:tc>{}{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl>"#,
            para(None, &run("Name")),
            para(None, &run("Qty")),
            para(None, &run("Apple")),
            para(None, &run("Red")),
            para(None, &run("3"))
        );
        let (html, _) = fixture.convert(&table);
        assert_eq!(
            html,
            "<table><thead><tr><th>Name</th><th>Qty</th></tr></thead><tbody><tr><td>Apple<br />Red</td><td>3</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_embedded_image_becomes_data_uri() {
        let mut fixture = Fixture::new();
        let drawing = r#"<w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1" descr="A cat" title="Cat"/><a:graphic><a:graphicData><a:blip r:embed="rId5"/></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#;
        let (html, warnings) = fixture.convert(&para(None, drawing));
        assert!(html.starts_with("<p><img src=\"data:image/png;base64,"));
        assert!(html.contains("alt=\"A cat\" title=\"Cat\" />"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_image_warnings() {
        let mut fixture = Fixture::new();
        let emf = r#"<w:r><w:drawing><wp:inline><wp:docPr id="1" name="x"/><a:blip r:embed="rId6"/></wp:inline></w:drawing></w:r>"#;
        let missing = r#"<w:r><w:drawing><wp:inline><wp:docPr id="2" name="y"/><a:blip r:embed="rId404"/></wp:inline></w:drawing></w:r>"#;
        let (html, warnings) = fixture.convert(&[para(None, emf), para(None, missing)].concat());
        assert!(html.contains("data:image/x-emf;base64,"));
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("unlikely to display"));
        assert!(warnings[1].message.contains("rId404"));
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("heading 1"), Some(1));
        assert_eq!(heading_level("heading 6"), Some(6));
        assert_eq!(heading_level("heading 7"), None);
        assert_eq!(heading_level("headings"), None);
    }
}
