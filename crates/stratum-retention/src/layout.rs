//! Project directory layout and the tier directory manager
//!
//! ```text
//! <folder>/<project>/
//!   daily/    <name>_<YYYY-MM-DD>.<ext>
//!   weekly/   <name>_<YYYY-MM-DD>.<ext>
//!   monthly/  <name>_<YYYY-MM-DD>.<ext>
//! ```

use crate::RetentionError;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use stratum_domain::Horizon;

/// What occupies a name inside a horizon directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Owns the bytes
    Real,
    /// Symbolic link, owns nothing
    Link,
}

/// Paths of one project's horizon tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

/// Directories created by [`ProjectLayout::ensure`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnsureReport {
    /// Newly created directories, root first
    pub created: Vec<PathBuf>,
}

impl EnsureReport {
    /// True when the tree was already complete
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

impl ProjectLayout {
    /// Layout rooted at a project directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one horizon
    pub fn horizon_dir(&self, horizon: Horizon) -> PathBuf {
        self.root.join(horizon.dir_name())
    }

    /// Path of an artifact name inside a horizon
    pub fn entry_path(&self, horizon: Horizon, file_name: &str) -> PathBuf {
        self.horizon_dir(horizon).join(file_name)
    }

    /// Create the project root and its three horizon directories if absent
    ///
    /// Existing directories are left alone, so repeat calls on a complete
    /// tree touch nothing. The parent of the root must already exist.
    ///
    /// # Errors
    ///
    /// [`RetentionError::Config`] when a path is occupied by something other
    /// than a directory, [`RetentionError::Io`] when creation or stat fails.
    pub fn ensure(&self) -> Result<EnsureReport, RetentionError> {
        let mut report = EnsureReport::default();

        if ensure_dir(&self.root, "project root")? {
            report.created.push(self.root.clone());
        }
        for horizon in Horizon::SLOWEST_FIRST {
            let dir = self.horizon_dir(horizon);
            if ensure_dir(&dir, horizon.as_str())? {
                report.created.push(dir);
            }
        }

        Ok(report)
    }
}

/// Returns true when the directory had to be created
fn ensure_dir(path: &Path, label: &str) -> Result<bool, RetentionError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(not_a_directory(path, label)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match fs::create_dir(path) {
            Ok(()) => {
                tracing::info!("Created {} directory: {}", label, path.display());
                Ok(true)
            }
            // Lost a race with another creator; accept it only if it is a directory
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if path.is_dir() {
                    Ok(false)
                } else {
                    Err(not_a_directory(path, label))
                }
            }
            Err(e) => Err(RetentionError::io("create directory", path)(e)),
        },
        Err(e) => Err(RetentionError::io("stat", path)(e)),
    }
}

fn not_a_directory(path: &Path, label: &str) -> RetentionError {
    RetentionError::Config(format!("'{}' isn't a directory: {}", label, path.display()))
}

/// Inspect a directory entry without following links
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>, RetentionError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => Ok(Some(EntryKind::Link)),
        Ok(_) => Ok(Some(EntryKind::Real)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RetentionError::io("stat", path)(e)),
    }
}

#[cfg(unix)]
pub(crate) fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
pub(crate) fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
