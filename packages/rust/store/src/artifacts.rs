//! Artifact store: persists conversion output as Markdown files.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use pagemark_shared::{PagemarkError, Result};

/// Writes conversion artifacts into a fixed output directory.
///
/// Writes are whole-content, single pass; a file is never partially written.
/// An existing file with the same name is silently replaced.
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `output_dir`, creating the directory if
    /// absent (idempotent).
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            PagemarkError::Storage(format!(
                "failed to create output directory {}: {e}",
                output_dir.display()
            ))
        })?;
        debug!(dir = %output_dir.display(), "artifact store ready");
        Ok(Self { output_dir })
    }

    /// The directory artifacts are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `content` to `filename` inside the output directory, UTF-8.
    ///
    /// Returns the full path of the written file. Last write wins when the
    /// filename already exists.
    pub fn save(&self, content: &str, filename: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        std::fs::write(&path, content).map_err(|e| {
            PagemarkError::Storage(format!("failed to write {}: {e}", path.display()))
        })?;
        info!(path = %path.display(), bytes = content.len(), "artifact saved");
        Ok(path)
    }
}
