//! Writing exported images to disk.

use crate::config::ExportConfig;
use crate::engine::RasterFormat;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while saving an export.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("refusing to write an empty image")]
    EmptyImage,

    #[error("export path {0} has no file name")]
    NoFileName(PathBuf),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where an exported image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub directory: PathBuf,
    pub file_name: String,
}

impl ExportTarget {
    /// Target described by the `[export]` config section.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            directory: expand_tilde(&config.directory),
            file_name: config.file_name.clone(),
        }
    }

    /// Target for an explicit output path, e.g. from `--output`.
    pub fn from_path(path: &Path) -> Result<Self, SaveError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SaveError::NoFileName(path.to_path_buf()))?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                expand_tilde(&parent.to_string_lossy())
            }
            _ => PathBuf::from("."),
        };
        Ok(Self {
            directory,
            file_name: file_name.to_string(),
        })
    }

    /// Full output path; a file name without an extension gets the one
    /// matching `format`.
    pub fn file_path(&self, format: RasterFormat) -> PathBuf {
        let mut path = self.directory.join(&self.file_name);
        if path.extension().is_none() {
            path.set_extension(format.extension());
        }
        path
    }
}

/// Ensure the export directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, SaveError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory).map_err(|source| SaveError::Io {
            path: directory.to_path_buf(),
            source,
        })?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes encoded image bytes to the target and returns the written path.
///
/// An existing file at that path is replaced.
pub fn save_export(
    image_data: &[u8],
    target: &ExportTarget,
    format: RasterFormat,
) -> Result<PathBuf, SaveError> {
    if image_data.is_empty() {
        return Err(SaveError::EmptyImage);
    }

    let directory = ensure_directory_exists(&target.directory)?;
    let file_path = ExportTarget {
        directory,
        file_name: target.file_name.clone(),
    }
    .file_path(format);

    log::info!(
        "Saving export to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );

    fs::write(&file_path, image_data).map_err(|source| SaveError::Io {
        path: file_path.clone(),
        source,
    })?;

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
