//! Filesystem access used by the converter.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{ConvertError, Result};

/// Where converted documents are read from and written to.
pub trait Storage {
    fn exists(&self, path: &Path) -> bool;

    /// Entry names in `dir`, sorted.
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>>;

    /// Write `contents` to `path`. Readers never observe a partial file.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn create_dir_all(&self, dir: &Path) -> Result<()>;
}

/// [`Storage`] on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(dir).map_err(|e| ConvertError::io(dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConvertError::io(dir, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let parent = parent_dir(path);
        let mut file = NamedTempFile::new_in(&parent).map_err(|e| ConvertError::io(&parent, e))?;
        file.write_all(contents).map_err(|e| ConvertError::io(path, e))?;
        file.persist(path).map_err(|e| ConvertError::io(path, e.error))?;
        Ok(())
    }

    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
