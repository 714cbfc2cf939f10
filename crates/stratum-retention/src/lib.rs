//! Stratum Retention
//!
//! Tiered backup placement, deduplication and retention for dated artifacts.
//!
//! # Overview
//!
//! Each project gets a directory under the configured backup folder, holding
//! one sub-directory per retention horizon:
//!
//! ```text
//! <folder>/<project>/
//! ├── daily/     # short horizon
//! ├── weekly/    # medium horizon
//! └── monthly/   # long horizon
//! ```
//!
//! A run for one project goes through these steps, in order:
//!
//! 1. **Ensure**: create the project root and horizon directories if missing
//! 2. **Evaluate**: decide which horizons need today's artifact
//! 3. **Produce**: hand the target path to an [`ArtifactProducer`]
//! 4. **Place**: move the artifact into the slowest due horizon and link it
//!    from every faster due horizon
//! 5. **Purge**: drop the oldest entries beyond each keep-count, handing a
//!    real file over to the faster horizon still linking to it
//!
//! ## Storage invariant
//!
//! Every artifact exists as exactly one real file. All other appearances are
//! relative symlinks (`../<horizon>/<file>`) pointing at a slower horizon, so a
//! whole project tree can be moved or mounted elsewhere.
//!
//! # Usage
//!
//! ```no_run
//! use stratum_retention::{RetentionConfig, Rotator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RetentionConfig::from_file("stratum.toml")?;
//! let mut rotator = Rotator::new(config);
//!
//! let project = rotator.config().projects[0].clone();
//! let today = chrono::Local::now().date_naive();
//! let (_, due) = rotator.plan_project(&project, today)?;
//! println!("due today: {:?}", due.due_horizons());
//! # Ok(())
//! # }
//! ```
//!
//! [`ArtifactProducer`]: stratum_domain::ArtifactProducer

#![warn(missing_docs)]

mod config;
mod due;
mod error;
pub mod history;
mod layout;
mod metrics;
mod placement;
mod purge;
mod rotator;

pub use config::{ConfigError, ProjectConfig, RetentionConfig};
pub use due::DueEvaluator;
pub use error::{ErrorKind, RetentionError};
pub use layout::{entry_kind, EnsureReport, EntryKind, ProjectLayout};
pub use metrics::RotationMetrics;
pub use placement::{place, PlacedLink, PlacementReport};
pub use purge::{PurgeAction, PurgeReport, Purger};
pub use rotator::{ProjectOutcome, ProjectResult, Rotator, RunReport};
