//! Build outcomes and errors.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::manifest::ManifestError;

/// Why one target failed to build. Never fatal to the whole run.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The build command could not be started.
  #[error("failed to spawn `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  /// The build command exited unsuccessfully.
  #[error("`{command}` failed with exit code {code:?}")]
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The command succeeded but left no artifact where the toolchain puts it.
  #[error("build produced no artifact at {}", .path.display())]
  ArtifactNotProduced { path: PathBuf },

  /// Copying the artifact into the native directory failed.
  #[error("failed to install artifact to {}: {source}", .path.display())]
  Install {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug)]
pub enum TargetStatus {
  Built { artifact: PathBuf },
  /// The current host cannot build this target.
  Skipped { reason: String },
  Failed { error: BuildError },
}

/// What happened to one registry target.
#[derive(Debug)]
pub struct TargetOutcome {
  pub name: String,
  pub triple: String,
  pub status: TargetStatus,
  pub duration: Duration,
}

impl TargetOutcome {
  pub fn is_failed(&self) -> bool {
    matches!(self.status, TargetStatus::Failed { .. })
  }
}

/// Per-target results of an orchestrator run, in registry order.
#[derive(Debug, Default)]
pub struct BuildSummary {
  pub outcomes: Vec<TargetOutcome>,
  /// Set when the native manifest could not be written.
  pub manifest_error: Option<ManifestError>,
}

impl BuildSummary {
  pub fn built(&self) -> impl Iterator<Item = &TargetOutcome> {
    self
      .outcomes
      .iter()
      .filter(|outcome| matches!(outcome.status, TargetStatus::Built { .. }))
  }

  pub fn skipped(&self) -> impl Iterator<Item = &TargetOutcome> {
    self
      .outcomes
      .iter()
      .filter(|outcome| matches!(outcome.status, TargetStatus::Skipped { .. }))
  }

  pub fn failed(&self) -> impl Iterator<Item = &TargetOutcome> {
    self.outcomes.iter().filter(|outcome| outcome.is_failed())
  }

  /// True when no attempted target failed and the manifest was written.
  pub fn is_success(&self) -> bool {
    self.failed().next().is_none() && self.manifest_error.is_none()
  }
}
