//! Binding resolver.
//!
//! Maps a [`ProbeResult`] onto a registry target, checks that its artifact is
//! installed and loads it. Loading is irreversible and process-global, so a
//! resolver makes at most one attempt: the first outcome, success or failure,
//! is kept and handed back on every later call.

mod loader;
mod types;

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

pub use loader::{BindingLoader, LibraryLoader, NativeBinding};
pub use types::{LoadError, ResolveError};

use crate::config::{DEFAULT_BINARY_NAME, runtime_native_dir};
use crate::manifest::NativeManifest;
use crate::platform::arch::Arch;
use crate::platform::os::Os;
use crate::probe::{self, ProbeResult};
use crate::registry::{TargetDescriptor, TargetRegistry};

/// The memoized outcome of a resolution. Clones share the same allocation.
pub type Resolution<B> = Result<Arc<B>, Arc<ResolveError>>;

pub struct BindingResolver<L: BindingLoader> {
  registry: TargetRegistry,
  base_dir: PathBuf,
  binary_name: String,
  loader: L,
  outcome: OnceLock<Resolution<L::Binding>>,
}

impl<L: BindingLoader> BindingResolver<L> {
  pub fn new(registry: TargetRegistry, base_dir: impl Into<PathBuf>, binary_name: impl Into<String>, loader: L) -> Self {
    Self {
      registry,
      base_dir: base_dir.into(),
      binary_name: binary_name.into(),
      loader,
      outcome: OnceLock::new(),
    }
  }

  /// Resolver for the artifacts a build installed under `native_dir`.
  ///
  /// Uses the binary name and target table recorded in the directory's
  /// manifest. Without a manifest the built-in table and default binary name
  /// apply.
  pub fn installed(native_dir: impl Into<PathBuf>, loader: L) -> Result<Self, ResolveError> {
    let native_dir = native_dir.into();
    let resolver = match NativeManifest::load(&native_dir)? {
      Some(manifest) => Self::new(manifest.registry()?, native_dir, manifest.binary_name, loader),
      None => Self::new(TargetRegistry::builtin(), native_dir, DEFAULT_BINARY_NAME, loader),
    };
    Ok(resolver)
  }

  pub fn binary_name(&self) -> &str {
    &self.binary_name
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  pub fn loader(&self) -> &L {
    &self.loader
  }

  /// Find the registry target for `probe` without touching the filesystem.
  pub fn locate(&self, probe: &ProbeResult) -> Result<&TargetDescriptor, ResolveError> {
    let Some(os) = Os::parse(&probe.os).filter(|os| self.registry.supports_os(*os)) else {
      return Err(ResolveError::UnsupportedPlatform { probe: probe.clone() });
    };

    Arch::parse(&probe.arch)
      .and_then(|arch| self.registry.lookup(os, arch, probe.libc))
      .ok_or_else(|| ResolveError::UnsupportedArchitecture { probe: probe.clone() })
  }

  /// Expected artifact path for `target`.
  pub fn artifact_path(&self, target: &TargetDescriptor) -> PathBuf {
    target.artifact_path(&self.base_dir, &self.binary_name)
  }

  /// Resolve and load the binding for `probe`.
  ///
  /// Only the first call does any work. Later calls return the same outcome
  /// regardless of their argument until [`BindingResolver::reset`].
  pub fn resolve(&self, probe: &ProbeResult) -> Resolution<L::Binding> {
    self
      .outcome
      .get_or_init(|| self.attempt(probe).map(Arc::new).map_err(Arc::new))
      .clone()
  }

  /// Whether a resolution has already been attempted.
  pub fn is_resolved(&self) -> bool {
    self.outcome.get().is_some()
  }

  /// Forget the memoized outcome. Intended for tests.
  pub fn reset(&mut self) {
    self.outcome.take();
  }

  fn attempt(&self, probe: &ProbeResult) -> Result<L::Binding, ResolveError> {
    let target = self.locate(probe)?;
    let path = self.artifact_path(target);
    debug!(name = %target.name(), path = ?path, "checking for native artifact");

    if !self.loader.exists(&path) {
      return Err(ResolveError::ArtifactMissing {
        target: target.name(),
        path,
      });
    }

    let binding = self
      .loader
      .load(&path)
      .map_err(|source| ResolveError::LoadFailure { path: path.clone(), source })?;

    info!(name = %target.name(), path = ?path, "native binding loaded");
    Ok(binding)
  }
}

impl BindingResolver<LibraryLoader> {
  /// Resolver over the runtime native directory and its manifest.
  pub fn from_env() -> Result<Self, ResolveError> {
    Self::installed(runtime_native_dir(), LibraryLoader)
  }
}

/// The native binding for this process.
///
/// The first call probes the host and loads the matching artifact; every
/// call returns that same outcome. Failures are never replaced by a partial
/// binding.
pub fn binding() -> Resolution<NativeBinding> {
  static RESOLVER: OnceLock<Result<BindingResolver<LibraryLoader>, Arc<ResolveError>>> = OnceLock::new();
  match RESOLVER.get_or_init(|| BindingResolver::from_env().map_err(Arc::new)) {
    Ok(resolver) => resolver.resolve(probe::current()),
    Err(err) => Err(Arc::clone(err)),
  }
}
