//! History reader: dated artifacts present in one horizon directory

use crate::RetentionError;
use std::fs;
use std::path::Path;
use stratum_domain::ArtifactName;

/// List dated artifacts in a horizon directory
///
/// Real files and links are both listed; subdirectories and names without a
/// `_YYYY-MM-DD.` token are ignored. No order is guaranteed, see
/// [`list_oldest_first`].
pub fn list(dir: &Path) -> Result<Vec<ArtifactName>, RetentionError> {
    let entries = fs::read_dir(dir).map_err(RetentionError::io("list", dir))?;

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(RetentionError::io("list", dir))?;
        let file_type = entry
            .file_type()
            .map_err(RetentionError::io("stat", &entry.path()))?;
        if file_type.is_dir() {
            continue;
        }

        // non UTF-8 names can never carry a date token
        let name = entry.file_name();
        if let Some(artifact) = name.to_str().and_then(ArtifactName::parse) {
            artifacts.push(artifact);
        }
    }

    tracing::debug!("Found {} artifacts in {}", artifacts.len(), dir.display());
    Ok(artifacts)
}

/// List dated artifacts sorted by embedded date, oldest first
pub fn list_oldest_first(dir: &Path) -> Result<Vec<ArtifactName>, RetentionError> {
    let mut artifacts = list(dir)?;
    artifacts.sort();
    Ok(artifacts)
}
