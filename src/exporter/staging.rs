// file: src/exporter/staging.rs
// description: write-then-rename staging so a failed run leaves no output behind
// reference: https://docs.rs/tempfile

use crate::error::{MigrationError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// File contents written to a temporary file next to the target, moved into
/// place only by `commit`. Dropping an uncommitted file removes it.
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    pub fn stage(target: &Path, contents: &[u8]) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| MigrationError::file(dir, e))?;
        temp.write_all(contents)
            .and_then(|_| temp.flush())
            .map_err(|e| MigrationError::file(target, e))?;

        debug!("Staged {} bytes for {}", contents.len(), target.display());

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| MigrationError::file(&target, e.error))?;
        Ok(target)
    }
}

/// Commits every staged file in order, stopping at the first failure.
///
/// Each commit is an atomic rename, but the batch is not: files committed
/// before a failing one stay in place, and the rest are removed uncommitted.
pub fn commit_all(files: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    files.into_iter().map(StagedFile::commit).collect()
}
