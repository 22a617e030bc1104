//! Conversion orchestration.
//!
//! A [`Converter`] sequences extraction, rendering, post-processing and
//! front-matter composition for one file ([`Converter::convert_file`]) or for
//! every eligible file in a directory ([`Converter::convert_directory`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use docx2mdx_core::{ConvertConfig, Converter};
//!
//! let converter = Converter::new(ConvertConfig::default());
//! let report = converter.convert_directory("docs".as_ref(), Some("site/content".as_ref()))?;
//! for path in report.converted() {
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), docx2mdx_core::ConvertError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ConvertConfig;
use crate::docx::DocxExtractor;
use crate::extract::{ConversionWarning, Extractor};
use crate::postprocess::postprocess_markdown;
use crate::render::MarkdownRenderer;
use crate::storage::{LocalStorage, Storage};
use crate::{ConvertError, Result};

/// A finished document and the warnings collected while producing it.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedDocument {
    pub content: String,
    pub warnings: Vec<ConversionWarning>,
}

/// What happened to one file in a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Converted { source: PathBuf, destination: PathBuf },
    Failed { source: PathBuf, reason: String },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Converted { source, .. } | FileOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, FileOutcome::Converted { .. })
    }
}

/// Per-file results of a directory conversion, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Destination paths of the files that converted.
    pub fn converted(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Converted { destination, .. } => Some(destination.as_path()),
            FileOutcome::Failed { .. } => None,
        })
    }

    /// `(source, reason)` for every file that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { source, reason } => Some((source.as_path(), reason.as_str())),
            FileOutcome::Converted { .. } => None,
        })
    }

    /// Number of files attempted.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when files were attempted and none converted.
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.outcomes.iter().all(|o| !o.is_converted())
    }
}

/// Runs the conversion pipeline.
///
/// Built from an immutable [`ConvertConfig`]; the renderer and its rules are
/// set up once here and reused for every file.
pub struct Converter {
    config: ConvertConfig,
    renderer: MarkdownRenderer,
    extractor: Box<dyn Extractor>,
    storage: Box<dyn Storage>,
}

impl Converter {
    /// A converter reading Word documents from, and writing to, the local filesystem.
    pub fn new(config: ConvertConfig) -> Self {
        let renderer = MarkdownRenderer::new(&config.render);
        Self { config, renderer, extractor: Box::new(DocxExtractor::new()), storage: Box::new(LocalStorage) }
    }

    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `source` without writing anything.
    ///
    /// The front-matter title is the file name without its extension.
    pub fn render_document(&self, source: &Path) -> Result<ConvertedDocument> {
        if !self.storage.exists(source) {
            return Err(ConvertError::NotFound(source.to_path_buf()));
        }

        let extraction = self.extractor.extract(source)?;
        for warning in &extraction.warnings {
            warn!(path = %source.display(), "{}", warning);
        }
        debug!(path = %source.display(), html_bytes = extraction.html.len(), "extracted html");

        let content = self.convert_html(&extraction.html, &title_of(source));
        Ok(ConvertedDocument { content, warnings: extraction.warnings })
    }

    /// Render, post-process and add front-matter to an HTML fragment.
    pub fn convert_html(&self, html: &str, title: &str) -> String {
        let markdown = self.renderer.render(html);
        let body = postprocess_markdown(&markdown);
        self.config.front_matter(title).compose(&body)
    }

    /// Convert one file and write the result.
    ///
    /// Without `destination` the document is written next to the source with
    /// the target extension. Returns the path written.
    pub fn convert_file(&self, source: &Path, destination: Option<&Path>) -> Result<PathBuf> {
        let document = self.render_document(source)?;

        let destination = match destination {
            Some(path) => path.to_path_buf(),
            None => source.with_extension(&self.config.target_extension),
        };
        self.storage.write_file(&destination, document.content.as_bytes())?;

        info!(
            source = %source.display(),
            destination = %destination.display(),
            warnings = document.warnings.len(),
            "converted"
        );
        Ok(destination)
    }

    /// Convert every eligible file in `source_dir`.
    ///
    /// Files are processed in name order. A failing file is logged and recorded
    /// in the report; it never stops the batch. Only a listing failure is
    /// returned as an error.
    pub fn convert_directory(&self, source_dir: &Path, destination_dir: Option<&Path>) -> Result<BatchReport> {
        let eligible: Vec<String> = self
            .storage
            .read_dir(source_dir)?
            .into_iter()
            .filter(|name| self.config.is_eligible(name))
            .collect();

        let mut report = BatchReport::default();
        if eligible.is_empty() {
            debug!(dir = %source_dir.display(), "no eligible files");
            return Ok(report);
        }

        if let Some(dir) = destination_dir {
            self.storage.create_dir_all(dir)?;
        }

        for name in eligible {
            let source = source_dir.join(&name);
            let destination = destination_dir.map(|dir| dir.join(&name).with_extension(&self.config.target_extension));

            let outcome = match self.convert_file(&source, destination.as_deref()) {
                Ok(destination) => FileOutcome::Converted { source, destination },
                Err(e) => {
                    error!(source = %source.display(), error = %e, "conversion failed");
                    FileOutcome::Failed { source, reason: e.to_string() }
                }
            };
            report.outcomes.push(outcome);
        }

        Ok(report)
    }
}

/// Standalone pipeline over an HTML string: render, post-process, front-matter.
pub fn convert_html(html: &str, title: &str, config: &ConvertConfig) -> String {
    let renderer = MarkdownRenderer::new(&config.render);
    let body = postprocess_markdown(&renderer.render(html));
    config.front_matter(title).compose(&body)
}

fn title_of(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extraction;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use time::{Date, Month};

    /// Returns fixed HTML, failing for names containing "bad".
    struct FakeExtractor {
        calls: Rc<RefCell<usize>>,
    }

    impl Extractor for FakeExtractor {
        fn extract(&self, path: &Path) -> Result<Extraction> {
            *self.calls.borrow_mut() += 1;
            if path.to_string_lossy().contains("bad") {
                return Err(ConvertError::extraction(path, "corrupt archive"));
            }
            Ok(Extraction::new("<h1>Doc</h1><p>text</p>").with_warnings(vec![ConversionWarning::new("odd style")]))
        }
    }

    /// In-memory storage keyed by path.
    #[derive(Clone, Default)]
    struct MemoryStorage {
        files: Rc<RefCell<BTreeMap<PathBuf, Vec<u8>>>>,
        dirs: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl MemoryStorage {
        fn with_files(names: &[&str]) -> Self {
            let storage = Self::default();
            for name in names {
                storage.files.borrow_mut().insert(PathBuf::from("in").join(name), Vec::new());
            }
            storage
        }

        fn read(&self, path: &str) -> String {
            String::from_utf8(self.files.borrow()[Path::new(path)].clone()).unwrap()
        }
    }

    impl Storage for MemoryStorage {
        fn exists(&self, path: &Path) -> bool {
            self.files.borrow().contains_key(path)
        }

        fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
            Ok(self
                .files
                .borrow()
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect())
        }

        fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
            self.files.borrow_mut().insert(path.to_path_buf(), contents.to_vec());
            Ok(())
        }

        fn create_dir_all(&self, dir: &Path) -> Result<()> {
            self.dirs.borrow_mut().push(dir.to_path_buf());
            Ok(())
        }
    }

    fn converter(storage: &MemoryStorage) -> (Converter, Rc<RefCell<usize>>) {
        let calls = Rc::new(RefCell::new(0));
        let config = ConvertConfig::builder()
            .date(Date::from_calendar_date(2024, Month::January, 2).unwrap())
            .build();
        let converter = Converter::new(config)
            .with_extractor(FakeExtractor { calls: calls.clone() })
            .with_storage(storage.clone());
        (converter, calls)
    }

    #[test]
    fn test_missing_file_fails_before_extraction() {
        let storage = MemoryStorage::default();
        let (converter, calls) = converter(&storage);
        let err = converter.convert_file(Path::new("in/none.docx"), None).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_convert_file_default_destination() {
        let storage = MemoryStorage::with_files(&["report.docx"]);
        let (converter, _) = converter(&storage);
        let written = converter.convert_file(Path::new("in/report.docx"), None).unwrap();
        assert_eq!(written, PathBuf::from("in/report.mdx"));

        let content = storage.read("in/report.mdx");
        assert!(content.starts_with("---\ntitle: \"report\"\n"), "got: {content}");
        assert!(content.contains("date: \"2024-01-02\""));
        assert!(content.ends_with("---\n\n# Doc\n\ntext"), "got: {content}");
    }

    #[test]
    fn test_convert_file_explicit_destination() {
        let storage = MemoryStorage::with_files(&["a.docx"]);
        let (converter, _) = converter(&storage);
        let written = converter.convert_file(Path::new("in/a.docx"), Some(Path::new("out/x.mdx"))).unwrap();
        assert_eq!(written, PathBuf::from("out/x.mdx"));
        assert!(storage.exists(Path::new("out/x.mdx")));
    }

    #[test]
    fn test_extraction_error_propagates() {
        let storage = MemoryStorage::with_files(&["bad.docx"]);
        let (converter, _) = converter(&storage);
        let err = converter.convert_file(Path::new("in/bad.docx"), None).unwrap_err();
        assert!(err.is_extraction());
    }

    #[test]
    fn test_render_document_returns_warnings_without_writing() {
        let storage = MemoryStorage::with_files(&["a.docx"]);
        let (converter, _) = converter(&storage);
        let document = converter.render_document(Path::new("in/a.docx")).unwrap();
        assert_eq!(document.warnings, vec![ConversionWarning::new("odd style")]);
        assert!(!storage.exists(Path::new("in/a.mdx")));
    }

    #[test]
    fn test_batch_filters_and_sorts() {
        let storage = MemoryStorage::with_files(&["b.docx", "~temp.docx", "a.DOCX", "c.txt"]);
        let (converter, calls) = converter(&storage);
        let report = converter.convert_directory(Path::new("in"), Some(Path::new("out"))).unwrap();

        let converted: Vec<_> = report.converted().collect();
        assert_eq!(converted, [Path::new("out/a.mdx"), Path::new("out/b.mdx")]);
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(*storage.dirs.borrow(), [PathBuf::from("out")]);
    }

    #[test]
    fn test_batch_without_eligible_files_creates_nothing() {
        let storage = MemoryStorage::with_files(&["~temp.docx", "notes.txt"]);
        let (converter, _) = converter(&storage);
        let report = converter.convert_directory(Path::new("in"), Some(Path::new("out"))).unwrap();
        assert!(report.is_empty());
        assert!(!report.all_failed());
        assert!(storage.dirs.borrow().is_empty());
    }

    #[test]
    fn test_batch_records_failures_and_continues() {
        let storage = MemoryStorage::with_files(&["a.docx", "bad.docx", "c.docx"]);
        let (converter, _) = converter(&storage);
        let report = converter.convert_directory(Path::new("in"), None).unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.converted().count(), 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("in/bad.docx"));
        assert!(failures[0].1.contains("corrupt archive"));
        assert!(!report.all_failed());
    }

    #[test]
    fn test_batch_report_serializes() {
        let report = BatchReport {
            outcomes: vec![
                FileOutcome::Converted { source: "a.docx".into(), destination: "a.mdx".into() },
                FileOutcome::Failed { source: "b.docx".into(), reason: "boom".into() },
            ],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "converted");
        assert_eq!(json["outcomes"][0]["destination"], "a.mdx");
        assert_eq!(json["outcomes"][1]["status"], "failed");
        assert_eq!(json["outcomes"][1]["reason"], "boom");
        assert!(report.failures().all(|(source, _)| source == Path::new("b.docx")));
    }

    #[test]
    fn test_convert_html_round_trip() {
        let config = ConvertConfig::builder()
            .date(Date::from_calendar_date(2024, Month::January, 2).unwrap())
            .build();
        let document = convert_html("<h1>Title</h1><p>Hello <strong>world</strong></p>", "my-notes", &config);
        let (header, body) = document.split_once("---\n\n").unwrap();
        assert_eq!(body, "# Title\n\nHello **world**");
        assert!(header.contains("title: \"my-notes\""));
    }

    #[test]
    fn test_title_of() {
        assert_eq!(title_of(Path::new("dir/Quarterly Report.docx")), "Quarterly Report");
        assert_eq!(title_of(Path::new("noext")), "noext");
    }
}
