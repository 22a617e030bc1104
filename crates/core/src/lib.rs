pub mod config;
pub mod convert;
pub mod docx;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod postprocess;
pub mod render;
pub mod storage;

pub use config::{ConvertConfig, ConvertConfigBuilder};
pub use convert::{BatchReport, ConvertedDocument, Converter, FileOutcome, convert_html};
pub use docx::DocxExtractor;
pub use error::{ConvertError, Result};
pub use extract::{ConversionWarning, Extraction, Extractor};
pub use frontmatter::{DEFAULT_DESCRIPTION, FrontMatter};
#[doc(hidden)]
pub use postprocess::POSTPROCESS_RULES;
pub use postprocess::postprocess_markdown;
pub use render::{DEFAULT_TABLE_CLASS, MarkdownRenderer, RENDER_RULES, RenderConfig, RenderRule, RuleKind};
pub use storage::{LocalStorage, Storage};
