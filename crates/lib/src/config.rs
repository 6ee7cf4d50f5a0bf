//! Project configuration.
//!
//! Packaging settings live in `nbind.json` next to the crate being packaged.
//! Every field is optional; a missing file means defaults.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_ENV, CONFIG_FILENAME, NATIVE_DIR_ENV};
use crate::orchestrator::BuildOptions;
use crate::registry::{RegistryError, TargetDescriptor, TargetRegistry};

pub const DEFAULT_NATIVE_DIR: &str = "native";
pub const DEFAULT_BINARY_NAME: &str = "index.node";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid config {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid target registry: {0}")]
  Registry(#[from] RegistryError),

  #[error("cannot determine crate name for {}; set \"crate_name\" in nbind.json", .project_dir.display())]
  MissingCrateName { project_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
  /// Cargo package whose cdylib is packaged. Defaults to the project directory name.
  pub crate_name: Option<String>,
  pub native_dir: PathBuf,
  pub binary_name: String,
  pub target_dir: PathBuf,
  pub profile: String,
  pub clean_intermediate: bool,
  /// Directory prepended to `PATH` for every build, e.g. a musl cross toolchain.
  pub toolchain_path: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
  /// Replaces the built-in target table.
  pub targets: Option<Vec<TargetDescriptor>>,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      crate_name: None,
      native_dir: PathBuf::from(DEFAULT_NATIVE_DIR),
      binary_name: DEFAULT_BINARY_NAME.to_string(),
      target_dir: PathBuf::from("target"),
      profile: "release".to_string(),
      clean_intermediate: true,
      toolchain_path: None,
      env: BTreeMap::new(),
      targets: None,
    }
  }
}

impl ProjectConfig {
  /// Load and validate a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.registry()?;
    debug!(path = ?path, "loaded project config");
    Ok(config)
  }

  /// Load the config for `project_dir`, honouring `NBIND_CONFIG`.
  ///
  /// An explicitly named file must exist; the default `nbind.json` may be absent.
  pub fn discover(project_dir: &Path) -> Result<Self, ConfigError> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
      return Self::load(&project_dir.join(explicit));
    }

    let path = project_dir.join(CONFIG_FILENAME);
    if path.exists() {
      Self::load(&path)
    } else {
      debug!(project = ?project_dir, "no config file, using defaults");
      Ok(Self::default())
    }
  }

  /// The validated target registry this config describes.
  pub fn registry(&self) -> Result<TargetRegistry, ConfigError> {
    let registry = match &self.targets {
      Some(targets) => TargetRegistry::new(targets.clone()),
      None => TargetRegistry::builtin(),
    };
    registry.validate()?;
    Ok(registry)
  }

  /// Artifact directory for `project_dir`. `NBIND_NATIVE_DIR` wins when set.
  pub fn native_dir(&self, project_dir: &Path) -> PathBuf {
    native_dir_override().unwrap_or_else(|| project_dir.join(&self.native_dir))
  }

  /// Orchestrator settings with paths anchored at `project_dir`.
  pub fn build_options(&self, project_dir: &Path) -> Result<BuildOptions, ConfigError> {
    let crate_name = self
      .crate_name
      .clone()
      .or_else(|| project_dir.file_name().map(|name| name.to_string_lossy().into_owned()))
      .ok_or_else(|| ConfigError::MissingCrateName {
        project_dir: project_dir.to_path_buf(),
      })?;

    Ok(BuildOptions {
      crate_name,
      project_dir: project_dir.to_path_buf(),
      native_dir: self.native_dir(project_dir),
      binary_name: self.binary_name.clone(),
      target_dir: project_dir.join(&self.target_dir),
      profile: self.profile.clone(),
      clean_intermediate: self.clean_intermediate,
      toolchain_path: self.toolchain_path.as_ref().map(|dir| project_dir.join(dir)),
      env: self.env.clone(),
    })
  }
}

/// `NBIND_NATIVE_DIR`, if set and non-empty.
pub fn native_dir_override() -> Option<PathBuf> {
  std::env::var_os(NATIVE_DIR_ENV)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
}

/// Directory the process-global resolver loads from.
///
/// `NBIND_NATIVE_DIR` when set, otherwise `native/` next to the executable.
pub fn runtime_native_dir() -> PathBuf {
  if let Some(dir) = native_dir_override() {
    return dir;
  }

  std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_NATIVE_DIR)))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_NATIVE_DIR))
}
