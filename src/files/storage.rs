use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores uploaded bytes flat in the data directory as `<id>_<filename>`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Write `data` for `file_id` and return the absolute path written.
    pub async fn store(&self, file_id: &str, filename: &str, data: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir).await?;
        let path = self.base_dir.join(format!("{file_id}_{filename}"));
        fs::write(&path, data).await?;
        Ok(path)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn delete(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
