//! Resolution errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::probe::ProbeResult;

/// Why a native artifact could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
  /// The dynamic loader rejected the library.
  #[error(transparent)]
  Library(#[from] libloading::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A loader-specific failure without an underlying error value.
  #[error("{0}")]
  Rejected(String),
}

/// Errors raised while resolving the native binding for a host.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// No target in the registry is built for the host's OS.
  #[error("unsupported platform: no native artifacts are built for {probe} (os '{}')", .probe.os)]
  UnsupportedPlatform { probe: ProbeResult },

  /// The OS is known but no target matches the architecture and libc.
  #[error("unsupported architecture: no native artifact is built for {probe}")]
  UnsupportedArchitecture { probe: ProbeResult },

  /// The registry has a target but nothing was installed for it.
  #[error("native artifact missing for {target}: expected {}", .path.display())]
  ArtifactMissing { target: String, path: PathBuf },

  /// The artifact exists but the loader refused it.
  #[error("failed to load native artifact {}: {source}", .path.display())]
  LoadFailure {
    path: PathBuf,
    #[source]
    source: LoadError,
  },

  /// The manifest in the native directory could not be used.
  #[error("cannot use native manifest: {0}")]
  InvalidManifest(#[from] ManifestError),
}
