//! Binary document extraction.
//!
//! An [`Extractor`] turns a source document into semantic HTML plus a list of
//! non-fatal [`ConversionWarning`]s. The orchestrator treats it as a black box;
//! [`crate::docx::DocxExtractor`] is the implementation for Word documents.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::Result;

/// An informational message surfaced during extraction.
///
/// Warnings never abort a conversion. They are logged by the orchestrator and
/// returned alongside the document by [`crate::Converter::render_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversionWarning {
    pub message: String,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Output of an [`Extractor`]: the document body as HTML and any warnings.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub html: String,
    pub warnings: Vec<ConversionWarning>,
}

impl Extraction {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into(), warnings: Vec::new() }
    }

    pub fn with_warnings(mut self, warnings: Vec<ConversionWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Converts a document on disk into HTML.
///
/// Implementations must not write anything. Unreadable or corrupt input is
/// reported as an error and propagated unchanged by the orchestrator.
pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<Extraction>;
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {
    fn extract(&self, path: &Path) -> Result<Extraction> {
        (**self).extract(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl Extractor for Fixed {
        fn extract(&self, _path: &Path) -> Result<Extraction> {
            Ok(Extraction::new(self.0).with_warnings(vec![ConversionWarning::new("note")]))
        }
    }

    #[test]
    fn test_boxed_extractor_delegates() {
        let extractor: Box<dyn Extractor> = Box::new(Fixed("<p>hi</p>"));
        let extraction = extractor.extract(Path::new("x.docx")).unwrap();
        assert_eq!(extraction.html, "<p>hi</p>");
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_warning_serializes_as_string() {
        let warning = ConversionWarning::new("Unrecognised paragraph style: 'Fancy'");
        let json = serde_json::to_string(&warning).unwrap();
        assert_eq!(json, "\"Unrecognised paragraph style: 'Fancy'\"");
        assert_eq!(warning.to_string(), "Unrecognised paragraph style: 'Fancy'");
    }
}
