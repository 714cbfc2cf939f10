//! Placement engine: one real file, links everywhere else
//!
//! Due horizons are visited slowest first. The first one receives the
//! artifact itself; every later one gets a relative link pointing one hop
//! back, at the horizon placed just before it:
//!
//! ```text
//! monthly/db_2024-03-01.sql                       (real)
//! weekly/db_2024-03-01.sql  -> ../monthly/db_2024-03-01.sql
//! daily/db_2024-03-01.sql   -> ../weekly/db_2024-03-01.sql
//! ```

use crate::layout::{entry_kind, symlink, ProjectLayout};
use crate::RetentionError;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use stratum_domain::{DueSet, Horizon};

/// A link written during placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedLink {
    /// Horizon holding the link
    pub horizon: Horizon,
    /// Relative link target, `../<dir>/<file>`
    pub target: PathBuf,
}

/// Where an artifact ended up
#[derive(Debug, Clone, Serialize)]
pub struct PlacementReport {
    /// Canonical artifact file name
    pub file_name: String,
    /// Horizon owning the real file
    pub owner: Horizon,
    /// Links, in the order they were created
    pub links: Vec<PlacedLink>,
}

impl PlacementReport {
    /// Every horizon now holding the artifact, owner first
    pub fn horizons(&self) -> Vec<Horizon> {
        std::iter::once(self.owner)
            .chain(self.links.iter().map(|l| l.horizon))
            .collect()
    }
}

/// Move a produced artifact into every due horizon of a project
///
/// The artifact file is consumed: on success it lives on inside the slowest
/// due horizon under its own file name. Moving is a rename, so the artifact
/// should be produced on the same filesystem as the project tree.
///
/// # Errors
///
/// [`RetentionError::Config`] when nothing is due (the artifact is left where
/// it is) or the path has no usable file name. A move or link failure stops
/// placement immediately; if some horizons were written already the error is
/// [`RetentionError::PartialPlacement`] listing them. Nothing is rolled back.
pub fn place(
    artifact: &Path,
    layout: &ProjectLayout,
    due: &DueSet,
) -> Result<PlacementReport, RetentionError> {
    let file_name = artifact
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            RetentionError::Config(format!("Artifact path has no file name: {}", artifact.display()))
        })?
        .to_string();

    if !due.any() {
        return Err(RetentionError::Config(format!(
            "No horizon is due, {} was left in place",
            artifact.display()
        )));
    }

    let mut placed: Vec<Horizon> = Vec::new();
    let mut links = Vec::new();

    for horizon in due.due_horizons() {
        let destination = layout.entry_path(horizon, &file_name);

        let result = match placed.last() {
            None => move_artifact(artifact, &destination),
            Some(previous) => {
                let target = Path::new("..").join(previous.dir_name()).join(&file_name);
                link_artifact(&target, &destination).map(|()| {
                    links.push(PlacedLink {
                        horizon,
                        target,
                    })
                })
            }
        };

        if let Err(source) = result {
            return Err(if placed.is_empty() {
                source
            } else {
                RetentionError::PartialPlacement {
                    placed,
                    source: Box::new(source),
                }
            });
        }
        placed.push(horizon);
    }

    Ok(PlacementReport {
        file_name,
        owner: placed[0],
        links,
    })
}

fn move_artifact(artifact: &Path, destination: &Path) -> Result<(), RetentionError> {
    ensure_vacant(destination)?;
    match fs::rename(artifact, destination) {
        Ok(()) => {}
        // Artifact handed over from another filesystem
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(artifact, destination)?,
        Err(e) => return Err(RetentionError::io("move artifact to", destination)(e)),
    }
    tracing::info!("Moved {} to {}", artifact.display(), destination.display());
    Ok(())
}

fn copy_then_remove(artifact: &Path, destination: &Path) -> Result<(), RetentionError> {
    tracing::debug!("{} is on another filesystem, copying", artifact.display());
    if let Err(e) = fs::copy(artifact, destination) {
        // Never leave a truncated copy behind
        let _ = fs::remove_file(destination);
        return Err(RetentionError::io("copy artifact to", destination)(e));
    }
    fs::remove_file(artifact).map_err(RetentionError::io("remove copied artifact", artifact))
}

fn link_artifact(target: &Path, destination: &Path) -> Result<(), RetentionError> {
    symlink(target, destination).map_err(RetentionError::io("link", destination))?;
    tracing::info!("Linked {} -> {}", destination.display(), target.display());
    Ok(())
}

// rename() would silently replace an existing entry
fn ensure_vacant(destination: &Path) -> Result<(), RetentionError> {
    match entry_kind(destination)? {
        None => Ok(()),
        Some(_) => Err(RetentionError::io("move artifact to", destination)(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already holds an entry",
        ))),
    }
}
