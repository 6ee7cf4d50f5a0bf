//! Native directory manifest.
//!
//! Every build records the binary file name and target table it installed
//! with in `<native_dir>/nbind-manifest.json`. The runtime resolver reads it
//! back, so a project's `binary_name` and `targets` settings reach the process
//! that loads the artifacts.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::registry::{RegistryError, TargetDescriptor, TargetRegistry};
use crate::util::fs::write_atomic;

pub const MANIFEST_FILENAME: &str = "nbind-manifest.json";
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid manifest {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("unsupported manifest version {0}")]
  UnsupportedVersion(u32),

  #[error("invalid target table in manifest: {0}")]
  Registry(#[from] RegistryError),

  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write manifest {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NativeManifest {
  pub version: u32,
  pub binary_name: String,
  pub targets: Vec<TargetDescriptor>,
}

impl NativeManifest {
  pub fn new(binary_name: impl Into<String>, registry: &TargetRegistry) -> Self {
    Self {
      version: MANIFEST_VERSION,
      binary_name: binary_name.into(),
      targets: registry.targets().to_vec(),
    }
  }

  pub fn path(native_dir: &Path) -> PathBuf {
    native_dir.join(MANIFEST_FILENAME)
  }

  /// Load the manifest in `native_dir`. `Ok(None)` when no build wrote one.
  pub fn load(native_dir: &Path) -> Result<Option<Self>, ManifestError> {
    let path = Self::path(native_dir);
    let content = match std::fs::read_to_string(&path) {
      Ok(content) => content,
      Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(ManifestError::Read { path, source }),
    };

    let manifest: Self = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.clone(),
      source,
    })?;
    if manifest.version != MANIFEST_VERSION {
      return Err(ManifestError::UnsupportedVersion(manifest.version));
    }
    manifest.registry()?;

    debug!(path = ?path, targets = manifest.targets.len(), "loaded native manifest");
    Ok(Some(manifest))
  }

  /// The validated registry recorded in this manifest.
  pub fn registry(&self) -> Result<TargetRegistry, ManifestError> {
    let registry = TargetRegistry::new(self.targets.clone());
    registry.validate()?;
    Ok(registry)
  }

  /// Keep targets from an earlier build that this one did not cover.
  ///
  /// A changed binary name orphans everything installed before, so the
  /// earlier targets are dropped in that case.
  pub fn merge_previous(mut self, previous: Self) -> Self {
    if previous.binary_name != self.binary_name {
      return self;
    }

    let covered: HashSet<_> = self.targets.iter().map(TargetDescriptor::key).collect();
    self
      .targets
      .extend(previous.targets.into_iter().filter(|target| !covered.contains(&target.key())));
    self
  }

  /// Write the manifest into `native_dir`, replacing any previous one.
  pub fn store(&self, native_dir: &Path) -> Result<PathBuf, ManifestError> {
    let path = Self::path(native_dir);
    let content = serde_json::to_string_pretty(self).map_err(ManifestError::Serialize)?;
    write_atomic(&path, content.as_bytes()).map_err(|source| ManifestError::Write {
      path: path.clone(),
      source,
    })?;
    Ok(path)
  }
}
