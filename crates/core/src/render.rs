//! HTML to Markdown rendering.
//!
//! The baseline conversion is delegated to [`htmd`] (atx headings, `-`
//! bullets, fenced code). Three [`RenderRule`]s are registered on top of it
//! when a [`MarkdownRenderer`] is built:
//!
//! - **strikethrough**: `<del>`, `<s>`, `<strike>` render as `~~text~~`
//! - **image**: data URIs render as `![alt](src "title")`, anything else as a
//!   literal `<img ... />` tag so its attributes survive
//! - **table**: the baseline table is wrapped in a styling container
//!
//! Rules are fixed once the renderer is built.

use htmd::element_handler::{HandlerResult, Handlers};
use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};
use tracing::warn;

/// Default class of the element wrapping rendered tables.
pub const DEFAULT_TABLE_CLASS: &str = "table-container";

/// The element kinds that get custom output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Strikethrough,
    Image,
    Table,
}

/// A named override registered on the baseline renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRule {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub kind: RuleKind,
}

/// The overrides every renderer registers, in registration order.
pub const RENDER_RULES: [RenderRule; 3] = [
    RenderRule { name: "strikethrough", tags: &["del", "s", "strike"], kind: RuleKind::Strikethrough },
    RenderRule { name: "image", tags: &["img"], kind: RuleKind::Image },
    RenderRule { name: "table", tags: &["table"], kind: RuleKind::Table },
];

/// Configuration for Markdown rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Class name of the container wrapped around tables
    pub table_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { table_class: DEFAULT_TABLE_CLASS.to_string() }
    }
}

/// HTML to Markdown converter with the custom rules applied.
pub struct MarkdownRenderer {
    converter: HtmlToMarkdown,
    rules: &'static [RenderRule],
}

impl MarkdownRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        let options = Options {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: BulletListMarker::Dash,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        };

        let mut builder = HtmlToMarkdown::builder().options(options);
        for rule in &RENDER_RULES {
            builder = match rule.kind {
                RuleKind::Strikethrough => builder.add_handler(rule.tags.to_vec(), strikethrough_handler),
                RuleKind::Image => builder.add_handler(rule.tags.to_vec(), image_handler),
                RuleKind::Table => {
                    let class = config.table_class.clone();
                    builder.add_handler(
                        rule.tags.to_vec(),
                        move |handlers: &dyn Handlers, element: Element| -> Option<HandlerResult> {
                            let table = handlers.fallback(element)?;
                            Some(wrap_table(&table.content, &class).into())
                        },
                    )
                }
            };
        }

        Self { converter: builder.build(), rules: &RENDER_RULES }
    }

    /// The overrides registered on this renderer.
    pub fn rules(&self) -> &[RenderRule] {
        self.rules
    }

    /// Render an HTML fragment to Markdown.
    ///
    /// Never fails: if the baseline converter reports an error the output is
    /// empty and the error is logged.
    pub fn render(&self, html: &str) -> String {
        let html = flatten_cell_paragraphs(html);
        match self.converter.convert(&html) {
            Ok(markdown) => markdown,
            Err(e) => {
                warn!(error = %e, "HTML to Markdown conversion failed");
                String::new()
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

fn strikethrough_handler(handlers: &dyn Handlers, element: Element) -> Option<HandlerResult> {
    let content = handlers.walk_children(element.node).content;
    Some(render_strikethrough(&content).into())
}

fn image_handler(_handlers: &dyn Handlers, element: Element) -> Option<HandlerResult> {
    let attr = |name: &str| {
        element
            .attrs
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string())
            .unwrap_or_default()
    };
    Some(render_image(&attr("src"), &attr("alt"), &attr("title")).into())
}

/// `~~content~~`, or nothing when the content is blank.
pub fn render_strikethrough(content: &str) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }
    format!("~~{}~~", content)
}

/// Render an image as Markdown (data URIs) or as a literal tag (everything else).
pub fn render_image(src: &str, alt: &str, title: &str) -> String {
    if is_data_uri(src) {
        if title.is_empty() {
            format!("![{}]({})", alt, src)
        } else {
            format!("![{}]({} \"{}\")", alt, src, title.replace('"', "\\\""))
        }
    } else {
        let mut tag = format!("<img src=\"{}\" alt=\"{}\"", escape_attr(src), escape_attr(alt));
        if !title.is_empty() {
            tag.push_str(&format!(" title=\"{}\"", escape_attr(title)));
        }
        tag.push_str(" />");
        tag
    }
}

/// Wrap rendered table Markdown in the styling container.
pub fn wrap_table(table: &str, class: &str) -> String {
    format!(
        "\n\n<div className=\"{}\">\n\n{}\n\n</div>\n\n",
        escape_attr(class),
        table.trim_matches('\n')
    )
}

fn is_data_uri(src: &str) -> bool {
    src.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Unwrap paragraphs sitting directly in table cells so each cell stays on one
/// Markdown table row.
fn flatten_cell_paragraphs(html: &str) -> String {
    let mut output = Vec::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("td > p, th > p", |el| {
                el.after(" ", lol_html::html_content::ContentType::Text);
                el.remove_and_keep_content();
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    match rewriter.end() {
        Ok(_) => String::from_utf8(output).unwrap_or_else(|_| html.to_string()),
        Err(_) => html.to_string(),
    }
}
