//! Build orchestrator.
//!
//! Builds every registry target the host can build, one after another, and
//! installs each artifact at the path the resolver will look for it. A failing
//! target is recorded and the run moves on; the summary reports the overall
//! status. The run ends by recording the installed targets in the native
//! manifest.

mod artifact;
mod runner;
mod types;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

pub use artifact::{library_file_name, profile_dir, raw_artifact_path};
pub use runner::{CommandRunner, ExitStatus, SystemRunner};
pub use types::{BuildError, BuildSummary, TargetOutcome, TargetStatus};

use crate::manifest::{ManifestError, NativeManifest};
use crate::platform::os::Os;
use crate::registry::{RegistryError, TargetDescriptor, TargetRegistry};
use crate::util::fs::copy_atomic;

/// Flag variables a target extends rather than replaces.
const APPENDED_VARS: &[&str] = &["RUSTFLAGS"];

/// Resolved packaging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  pub crate_name: String,
  pub project_dir: PathBuf,
  pub native_dir: PathBuf,
  pub binary_name: String,
  pub target_dir: PathBuf,
  pub profile: String,
  pub clean_intermediate: bool,
  pub toolchain_path: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
}

pub struct Orchestrator<R: CommandRunner> {
  registry: TargetRegistry,
  options: BuildOptions,
  runner: R,
  host: Option<Os>,
}

impl<R: CommandRunner> Orchestrator<R> {
  /// Fails if the registry contains duplicate targets.
  pub fn new(registry: TargetRegistry, options: BuildOptions, runner: R) -> Result<Self, RegistryError> {
    registry.validate()?;
    Ok(Self {
      registry,
      options,
      runner,
      host: Os::current(),
    })
  }

  /// Pretend to run on `host` when deciding which targets are buildable.
  pub fn with_host(mut self, host: Option<Os>) -> Self {
    self.host = host;
    self
  }

  pub fn registry(&self) -> &TargetRegistry {
    &self.registry
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Attempt every target in registry order.
  pub fn run(&self) -> BuildSummary {
    let mut summary = BuildSummary::default();

    for target in self.registry.iter() {
      let start = Instant::now();
      let status = if target.buildable_on(self.host) {
        info!(name = %target.name(), triple = %target.triple, "building target");
        match self.build_target(target) {
          Ok(artifact) => {
            info!(name = %target.name(), artifact = ?artifact, "artifact installed");
            TargetStatus::Built { artifact }
          }
          Err(error) => {
            warn!(name = %target.name(), error = %error, "build failed");
            TargetStatus::Failed { error }
          }
        }
      } else {
        let reason = format!("not buildable on {}", self.host.map_or("this host", |os| os.as_str()));
        debug!(name = %target.name(), %reason, "skipping target");
        TargetStatus::Skipped { reason }
      };

      summary.outcomes.push(TargetOutcome {
        name: target.name(),
        triple: target.triple.clone(),
        status,
        duration: start.elapsed(),
      });
    }

    if let Err(err) = self.write_manifest() {
      warn!(error = %err, "failed to write native manifest");
      summary.manifest_error = Some(err);
    }

    info!(
      built = summary.built().count(),
      failed = summary.failed().count(),
      skipped = summary.skipped().count(),
      "build finished"
    );
    summary
  }

  /// Build one target and install its artifact.
  pub fn build_target(&self, target: &TargetDescriptor) -> Result<PathBuf, BuildError> {
    let command = target.build_command(&self.options.profile);
    let env = self.build_env(target);

    let status = self.runner.run(&command, &env).map_err(|source| BuildError::Spawn {
      command: command.to_string(),
      source,
    })?;
    if !status.is_success() {
      return Err(BuildError::CommandFailed {
        command: command.to_string(),
        code: status.code,
        stderr: status.stderr,
      });
    }

    let raw = self.raw_artifact_path(target);
    if !raw.is_file() {
      return Err(BuildError::ArtifactNotProduced { path: raw });
    }

    let installed = target.artifact_path(&self.options.native_dir, &self.options.binary_name);
    copy_atomic(&raw, &installed).map_err(|source| BuildError::Install {
      path: installed.clone(),
      source,
    })?;

    if self.options.clean_intermediate {
      if let Err(err) = std::fs::remove_file(&raw) {
        warn!(path = ?raw, error = %err, "failed to remove intermediate artifact");
      }
    }

    Ok(installed)
  }

  /// Where the toolchain leaves `target`'s library.
  pub fn raw_artifact_path(&self, target: &TargetDescriptor) -> PathBuf {
    raw_artifact_path(
      &self.options.target_dir,
      target,
      &self.options.profile,
      &self.options.crate_name,
    )
  }

  /// Record this run's targets and binary name for the runtime resolver.
  ///
  /// Targets from earlier builds into the same directory stay listed unless
  /// the binary name changed.
  pub fn write_manifest(&self) -> Result<PathBuf, ManifestError> {
    let mut manifest = NativeManifest::new(&self.options.binary_name, &self.registry);
    match NativeManifest::load(&self.options.native_dir) {
      Ok(Some(previous)) => manifest = manifest.merge_previous(previous),
      Ok(None) => {}
      Err(err) => warn!(error = %err, "replacing unreadable native manifest"),
    }

    let path = manifest.store(&self.options.native_dir)?;
    debug!(path = ?path, targets = manifest.targets.len(), "native manifest written");
    Ok(path)
  }

  /// Project env, then target env, with the toolchain directory prepended to `PATH`.
  ///
  /// Target values for flag variables such as `RUSTFLAGS` are appended to the
  /// project or inherited value.
  pub fn build_env(&self, target: &TargetDescriptor) -> BTreeMap<String, String> {
    let mut env = self.options.env.clone();
    for (key, value) in &target.env {
      let existing = APPENDED_VARS
        .contains(&key.as_str())
        .then(|| env.get(key).cloned().or_else(|| std::env::var(key).ok()))
        .flatten()
        .filter(|existing| !existing.trim().is_empty());
      let merged = match existing {
        Some(existing) => format!("{existing} {value}"),
        None => value.clone(),
      };
      env.insert(key.clone(), merged);
    }

    if let Some(toolchain) = &self.options.toolchain_path {
      let inherited = env
        .get("PATH")
        .cloned()
        .or_else(|| std::env::var("PATH").ok())
        .unwrap_or_default();
      let paths = std::iter::once(toolchain.clone()).chain(std::env::split_paths(&inherited));
      match std::env::join_paths(paths) {
        Ok(joined) => {
          env.insert("PATH".to_string(), joined.to_string_lossy().into_owned());
        }
        Err(err) => warn!(toolchain = ?toolchain, error = %err, "cannot prepend toolchain to PATH"),
      }
    }

    env
  }
}
