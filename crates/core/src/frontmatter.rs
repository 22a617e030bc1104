//! Front-matter header composition.
//!
//! Documents start with a YAML-style block of double-quoted values:
//!
//! ```text
//! ---
//! title: "Quarterly Report"
//! description: "Converted from a Word document"
//! date: "2026-01-31"
//! ---
//!
//! # Body
//! ```

use time::{Date, OffsetDateTime};

/// Description used when none is configured.
pub const DEFAULT_DESCRIPTION: &str = "Converted from a Word document";

/// Delimiter line above and below the header.
pub const DELIMITER: &str = "---";

/// Header values for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub author: Option<String>,
    pub date: Date,
}

impl FrontMatter {
    /// Header for `title` dated today (UTC) with the default description.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            author: None,
            date: today_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    /// Render the header block, delimiters included, with a trailing newline.
    pub fn render(&self) -> String {
        let mut header = String::new();
        header.push_str(DELIMITER);
        header.push('\n');
        push_field(&mut header, "title", &self.title);
        push_field(&mut header, "description", &self.description);
        if let Some(author) = &self.author {
            push_field(&mut header, "author", author);
        }
        push_field(&mut header, "date", &format_date(self.date));
        header.push_str(DELIMITER);
        header.push('\n');
        header
    }

    /// Prepend the header to `body`, separated by exactly one blank line.
    pub fn compose(&self, body: &str) -> String {
        format!("{}\n{}", self.render(), body)
    }
}

/// The current calendar date in UTC.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// `YYYY-MM-DD`
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

fn push_field(header: &mut String, key: &str, value: &str) {
    header.push_str(&format!("{}: {}\n", key, quote(value)));
}

/// Double-quote a value, escaping anything that would end the string early.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
