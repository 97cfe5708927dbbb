//! Download targets: where an exported data URI ends up.

use std::fs;
use std::path::{Path, PathBuf};

use crate::datauri::decode_data_uri;
use crate::error::ExportError;

/// Saves a data URI under a file name.
pub trait Download {
    /// Persist the decoded payload of `data_uri` as `filename`.
    ///
    /// Returns the location written.
    ///
    /// # Errors
    ///
    /// Any [`ExportError`] from decoding or writing.
    fn save(&mut self, data_uri: &str, filename: &str) -> Result<PathBuf, ExportError>;
}

/// Writes downloads into a directory, creating it if needed.
///
/// Only the final component of `filename` is used, so a name can never
/// escape the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Download for DirectoryDownload {
    fn save(&mut self, data_uri: &str, filename: &str) -> Result<PathBuf, ExportError> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| ExportError::InvalidFilename(filename.to_owned()))?;
        let bytes = decode_data_uri(data_uri)?;

        fs::create_dir_all(&self.dir).map_err(|e| ExportError::io("create", &self.dir, e))?;
        let path = self.dir.join(name);
        fs::write(&path, &bytes).map_err(|e| ExportError::io("write", &path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "download written");
        Ok(path)
    }
}
