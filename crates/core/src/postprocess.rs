//! Markdown cleanup applied after rendering.
//!
//! Each rule is a pure `&str -> String` rewrite over the whole text. They run
//! in the order of [`POSTPROCESS_RULES`]; later rules assume earlier ones have
//! already run (the fence rule expects blank-line runs to be collapsed). The
//! pipeline is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named post-processing rule.
pub type Rule = (&'static str, fn(&str) -> String);

/// The rules, in application order.
pub const POSTPROCESS_RULES: [Rule; 6] = [
    ("trim_start", trim_start),
    ("collapse_blank_lines", collapse_blank_lines),
    ("strip_blank_after_fence", strip_blank_after_fence),
    ("normalize_bullets", normalize_bullets),
    ("normalize_headings", normalize_headings),
    ("trim", trim),
];

/// Apply every rule in order.
pub fn postprocess_markdown(markdown: &str) -> String {
    POSTPROCESS_RULES
        .iter()
        .fold(markdown.to_string(), |text, (_, rule)| rule(&text))
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ \t]*)([-*+])(?:[ \t]+|$)").expect("valid regex"));
static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( {0,3})(#{1,6})[ \t]*([^#\s].*)$").expect("valid regex"));

/// Leading whitespace goes before the line rules see the first line, so the
/// final [`trim`] never exposes a line they have not normalised.
pub fn trim_start(text: &str) -> String {
    text.trim_start().to_string()
}

/// At most one blank line between blocks.
pub fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

/// Drop blank lines directly after an opening code fence. Closing fences are
/// left alone.
pub fn strip_blank_after_fence(text: &str) -> String {
    let mut out = Vec::new();
    let mut fences = FenceTracker::default();
    let mut after_open = false;

    for line in text.split('\n') {
        if after_open && line.trim().is_empty() {
            continue;
        }
        after_open = fences.step(line) == LineKind::Open;
        out.push(line);
    }

    out.join("\n")
}

/// `-   item` → `- item`, and a bare `-` → `- `.
pub fn normalize_bullets(text: &str) -> String {
    map_prose_lines(text, |line| RE_BULLET.replace(line, "${1}${2} ").into_owned())
}

/// Exactly one space between the `#` run and the heading text.
pub fn normalize_headings(text: &str) -> String {
    map_prose_lines(text, |line| RE_HEADING.replace(line, "${1}${2} ${3}").into_owned())
}

pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Prose,
    Open,
    Code,
    Close,
}

/// Tracks fenced code blocks line by line. A fence closes only on a run of
/// the opening character at least as long as the opener, with nothing after it.
#[derive(Debug, Default)]
struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    fn step(&mut self, line: &str) -> LineKind {
        let marker = fence_marker(line);
        match (self.open, marker) {
            (None, Some((ch, len, _))) => {
                self.open = Some((ch, len));
                LineKind::Open
            }
            (None, None) => LineKind::Prose,
            (Some((open_ch, open_len)), Some((ch, len, rest)))
                if ch == open_ch && len >= open_len && rest.trim().is_empty() =>
            {
                self.open = None;
                LineKind::Close
            }
            (Some(_), _) => LineKind::Code,
        }
    }
}

/// The fence character, its run length and the rest of the line, when the
/// line starts with three or more backticks or tildes.
fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let line = line.trim_start();
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len, &line[len..]))
}

/// Rewrite every line outside fenced code blocks.
fn map_prose_lines(text: &str, rewrite: impl Fn(&str) -> String) -> String {
    let mut fences = FenceTracker::default();
    text.split('\n')
        .map(|line| match fences.step(line) {
            LineKind::Prose => rewrite(line),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
