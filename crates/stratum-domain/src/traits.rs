//! Trait definitions for external collaborators
//!
//! The retention engine never produces backup content itself. Producing a
//! database dump or a file archive is delegated through these traits.

use std::path::Path;

/// Produces the content of one backup artifact
///
/// Implemented outside the engine (database dumpers, archivers, test fakes).
pub trait ArtifactProducer {
    /// Error type for production failures
    type Error;

    /// Write a complete artifact for `project` at `target`
    ///
    /// `target` is the canonical artifact path inside the project root. On
    /// success the file must exist at exactly that path; its ownership then
    /// passes to the engine.
    fn produce(&mut self, project: &str, target: &Path) -> Result<(), Self::Error>;
}
