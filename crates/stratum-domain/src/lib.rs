//! Stratum Domain Layer
//!
//! Core concepts of tiered backup retention, free of any filesystem access.
//!
//! ## Key Concepts
//!
//! - **Horizon**: a retention bucket (daily → weekly → monthly) with its own keep-count
//! - **Horizon chain**: slowest to fastest; faster horizons may link into slower ones
//! - **Artifact name**: identity recovered from a `<name>_<YYYY-MM-DD>.<ext>` file name
//! - **Due set**: which horizons need a new artifact on the current run
//!
//! ## Architecture
//!
//! - Pure logic and value types only
//! - The filesystem engine lives in `stratum-retention`
//! - Trait definitions for collaborators that produce artifact content

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod horizon;
pub mod policy;
pub mod traits;

// Re-exports for convenience
pub use artifact::ArtifactName;
pub use horizon::Horizon;
pub use policy::{DueSet, KeepCounts};
pub use traits::ArtifactProducer;
