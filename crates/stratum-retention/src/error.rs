//! Error types for retention operations

use std::io;
use std::path::{Path, PathBuf};
use stratum_domain::Horizon;
use thiserror::Error;

/// Errors that can occur while ensuring, placing or purging artifacts
#[derive(Error, Debug)]
pub enum RetentionError {
    /// Impossible directory state or unusable retention settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem call failed
    #[error("I/O error while trying to {op} {}: {source}", .path.display())]
    Io {
        /// Operation that failed (list, stat, move, link, delete, ...)
        op: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The horizon chain holds something it never should
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Placement failed after some horizons were already written
    #[error("Placement aborted after writing {placed:?}, nothing was rolled back: {source}")]
    PartialPlacement {
        /// Horizons that already hold the real file or a link
        placed: Vec<Horizon>,
        /// Failure that stopped placement
        #[source]
        source: Box<RetentionError>,
    },

    /// The external artifact producer reported a failure
    #[error("Producer failed for project {project}: {message}")]
    Producer {
        /// Project whose artifact could not be produced
        project: String,
        /// Producer's error message
        message: String,
    },
}

/// Coarse classification for routing alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Directory collision or unusable keep-counts
    Configuration,
    /// Listing, stat, rename, link or delete failure
    Io,
    /// Chain invariant violated
    Integrity,
    /// Artifact content could not be produced
    Producer,
}

impl RetentionError {
    /// Classify this error
    ///
    /// A partial placement reports the kind of the failure that stopped it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RetentionError::Config(_) => ErrorKind::Configuration,
            RetentionError::Io { .. } => ErrorKind::Io,
            RetentionError::Integrity(_) => ErrorKind::Integrity,
            RetentionError::PartialPlacement { source, .. } => source.kind(),
            RetentionError::Producer { .. } => ErrorKind::Producer,
        }
    }

    pub(crate) fn io(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> RetentionError {
        let path = path.to_path_buf();
        move |source| RetentionError::Io { op, path, source }
    }
}
