//! Error types for docx2mdx operations.
//!
//! This module defines the main error type [`ConvertError`] which represents
//! every way a single-file conversion can fail. Extraction warnings are not
//! errors; see [`crate::extract::ConversionWarning`].
//!
//! # Example
//!
//! ```rust
//! use docx2mdx_core::{ConvertError, Converter, ConvertConfig};
//!
//! let converter = Converter::new(ConvertConfig::default());
//! match converter.convert_file("missing.docx".as_ref(), None) {
//!     Ok(path) => println!("Wrote {}", path.display()),
//!     Err(ConvertError::NotFound(path)) => println!("No such file: {}", path.display()),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for conversion operations.
///
/// Every variant is fatal to the single-file operation it occurs in. Batch
/// conversion catches these per file and records them in the
/// [`crate::BatchReport`].
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Source path does not exist.
    ///
    /// Checked before any extraction is attempted.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The binary document could not be parsed.
    ///
    /// Returned for corrupt archives, missing document parts, and malformed
    /// XML inside the package.
    #[error("Failed to extract '{path}': {reason}")]
    Extraction { path: PathBuf, reason: String },

    /// Reading, writing, or creating a file or directory failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn extraction(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConvertError::Extraction { path: path.into(), reason: reason.to_string() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io { path: path.into(), source }
    }

    /// Whether this error came from the extraction step.
    pub fn is_extraction(&self) -> bool {
        matches!(self, ConvertError::Extraction { .. })
    }
}

/// Result type alias for ConvertError.
///
/// This is a convenience alias for `std::result::Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;
