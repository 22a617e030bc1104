//! Converter configuration.

use time::Date;

use crate::frontmatter::{DEFAULT_DESCRIPTION, FrontMatter};
use crate::render::RenderConfig;

/// Configuration for a [`crate::Converter`].
///
/// Immutable once built; every conversion reads it but never changes it.
///
/// # Example
///
/// ```rust
/// use docx2mdx_core::ConvertConfig;
///
/// let config = ConvertConfig::builder()
///     .description("Imported from the shared drive")
///     .author("Docs Team")
///     .table_class("wide-table")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Extension of eligible source files, without the dot (default: "docx").
    pub source_extension: String,

    /// Extension given to written documents, without the dot (default: "mdx").
    pub target_extension: String,

    /// Files whose name starts with this are skipped in batch mode (default: "~").
    pub temp_prefix: String,

    /// Front-matter description.
    pub description: String,

    /// Front-matter author, omitted from the header when `None`.
    pub author: Option<String>,

    /// Fixed front-matter date. `None` means today in UTC.
    pub date: Option<Date>,

    /// Markdown rendering options.
    pub render: RenderConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source_extension: "docx".to_string(),
            target_extension: "mdx".to_string(),
            temp_prefix: "~".to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            author: None,
            date: None,
            render: RenderConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Creates a new builder for ConvertConfig.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::new()
    }

    /// Whether a directory entry named `name` should be converted in batch mode.
    ///
    /// The extension comparison ignores case. A bare `.docx` has no stem to
    /// name the output after and is skipped.
    pub fn is_eligible(&self, name: &str) -> bool {
        if name.starts_with(&self.temp_prefix) {
            return false;
        }
        let suffix_len = self.source_extension.len() + 1;
        if name.len() <= suffix_len {
            return false;
        }
        match name.get(name.len() - suffix_len..) {
            Some(suffix) => suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(&self.source_extension),
            None => false,
        }
    }

    /// The front-matter header for a document titled `title`.
    pub fn front_matter(&self, title: &str) -> FrontMatter {
        let front_matter = FrontMatter::new(title)
            .with_description(self.description.clone())
            .with_author(self.author.clone());
        match self.date {
            Some(date) => front_matter.with_date(date),
            None => front_matter,
        }
    }
}

/// Builder for ConvertConfig.
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ConvertConfig::default() }
    }

    pub fn source_extension(mut self, value: impl Into<String>) -> Self {
        self.config.source_extension = value.into();
        self
    }

    pub fn target_extension(mut self, value: impl Into<String>) -> Self {
        self.config.target_extension = value.into();
        self
    }

    pub fn temp_prefix(mut self, value: impl Into<String>) -> Self {
        self.config.temp_prefix = value.into();
        self
    }

    /// Sets the front-matter description.
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.config.description = value.into();
        self
    }

    /// Sets the front-matter author.
    pub fn author(mut self, value: impl Into<String>) -> Self {
        self.config.author = Some(value.into());
        self
    }

    /// Pins the front-matter date instead of using today.
    pub fn date(mut self, value: Date) -> Self {
        self.config.date = Some(value);
        self
    }

    /// Sets the class of the container wrapped around tables.
    pub fn table_class(mut self, value: impl Into<String>) -> Self {
        self.config.render.table_class = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ConvertConfig {
        self.config
    }
}

impl Default for ConvertConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
