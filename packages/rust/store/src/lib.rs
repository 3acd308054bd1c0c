//! Artifact persistence and activity logging for pagemark.
//!
//! Two file-backed components with deliberately small contracts:
//! - [`ArtifactStore`] — whole-file Markdown writes into the output directory
//! - [`ActivityLog`] — append-only `converter.log` with tail-by-recency reads

mod artifacts;
mod log;

pub use artifacts::ArtifactStore;
pub use log::{ActivityLog, LogLevel};
