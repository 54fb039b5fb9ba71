use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use report_core::ReportManifest;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("manifest serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Make sure `dir` can receive the manifest, creating it (and its parents) if it
/// does not exist yet. An existing non-directory at that path is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::OutputDir(format!(
            "{} exists and is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir)
            .map_err(|err| PersistError::OutputDir(format!("creating {}: {err}", dir.display()))),
        Err(err) => Err(PersistError::OutputDir(format!("{}: {err}", dir.display()))),
    }
}

/// Writes the manifest as pretty JSON through a temp file in the same
/// directory, so readers never observe a half-written artifact.
pub struct ManifestWriter {
    dir: PathBuf,
}

impl ManifestWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, manifest: &ReportManifest) -> Result<PathBuf, PersistError> {
        let content = serde_json::to_string_pretty(manifest)?;
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
