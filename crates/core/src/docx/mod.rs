//! Word (`.docx`) extraction.
//!
//! Reads the main document part together with the styles, numbering, and
//! relationships parts and produces semantic HTML:
//!
//! | Word construct | HTML |
//! |----------------|------|
//! | `Heading 1`..`Heading 6`, `Title`, `Subtitle` | `<h1>`..`<h6>` |
//! | numbered / bulleted paragraphs | nested `<ul>` / `<ol>` |
//! | `Code`, `Source Code` paragraphs | `<pre><code>` |
//! | `Quote` paragraphs | `<blockquote>` |
//! | bold, italic, strikethrough, super/subscript | `<strong>`, `<em>`, `<s>`, `<sup>`, `<sub>` |
//! | tables | `<table>` (`<th>` for repeated header rows) |
//! | embedded images | `<img>` with a `data:` URI |
//!
//! Anything the walker does not understand is dropped; unrecognised paragraph
//! styles and unreadable images are reported as warnings.

mod body;
mod package;

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::extract::{ConversionWarning, Extraction, Extractor};
use crate::{ConvertError, Result};
use body::BodyWriter;
use package::{
    DOCUMENT_PART, NUMBERING_PART, Numbering, Package, PackageError, RELATIONSHIPS_PART, STYLES_PART,
    parse_relationships, parse_styles,
};

/// Extractor for Office Open XML word-processing documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<Extraction> {
        let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        let mut package = Package::open(BufReader::new(file)).map_err(|e| ConvertError::extraction(path, e))?;
        let wrap = |e: PackageError| ConvertError::extraction(path, e);

        let document = package
            .read_text(DOCUMENT_PART)
            .map_err(wrap)?
            .ok_or_else(|| ConvertError::extraction(path, format!("missing {}", DOCUMENT_PART)))?;

        let mut warnings = Vec::new();

        let relationships = match package.read_text(RELATIONSHIPS_PART).map_err(wrap)? {
            Some(xml) => parse_relationships(&xml).map_err(wrap)?,
            None => HashMap::new(),
        };

        let styles = match package.read_text(STYLES_PART).map_err(wrap)? {
            Some(xml) => parse_styles(&xml).unwrap_or_else(|e| {
                warnings.push(ConversionWarning::new(format!("Ignoring unreadable styles part: {}", e)));
                HashMap::new()
            }),
            None => HashMap::new(),
        };

        let numbering = match package.read_text(NUMBERING_PART).map_err(wrap)? {
            Some(xml) => Numbering::parse(&xml).unwrap_or_else(|e| {
                warnings.push(ConversionWarning::new(format!("Ignoring unreadable numbering part: {}", e)));
                Numbering::default()
            }),
            None => Numbering::default(),
        };

        debug!(
            path = %path.display(),
            relationships = relationships.len(),
            styles = styles.len(),
            "opened docx package"
        );

        let (html, body_warnings) = BodyWriter::new(&styles, &numbering, &relationships, &mut package)
            .write_document(&document)
            .map_err(wrap)?;
        warnings.extend(body_warnings);

        Ok(Extraction::new(html).with_warnings(warnings))
    }
}
