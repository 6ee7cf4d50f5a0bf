//! Target registry.
//!
//! The registry is the ordered table of supported build targets. Runtime
//! resolution and the build orchestrator both consult it, so adding a
//! platform is a data change here rather than a new branch elsewhere.

mod builtin;
pub mod types;

use std::collections::HashMap;

use tracing::debug;

pub use builtin::builtin_targets;
pub use types::{BuildCommand, RegistryError, TargetDescriptor};

use crate::platform::TargetKey;
use crate::platform::arch::Arch;
use crate::platform::libc::Libc;
use crate::platform::os::Os;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRegistry {
  targets: Vec<TargetDescriptor>,
}

impl TargetRegistry {
  /// Wrap a list of descriptors. Call [`TargetRegistry::validate`] before
  /// relying on lookups being unique.
  pub fn new(targets: Vec<TargetDescriptor>) -> Self {
    Self { targets }
  }

  /// The built-in table of supported targets.
  pub fn builtin() -> Self {
    Self::new(builtin_targets())
  }

  pub fn targets(&self) -> &[TargetDescriptor] {
    &self.targets
  }

  pub fn iter(&self) -> impl Iterator<Item = &TargetDescriptor> {
    self.targets.iter()
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  /// Exact-match lookup by (os, arch, libc).
  pub fn lookup(&self, os: Os, arch: Arch, libc: Option<Libc>) -> Option<&TargetDescriptor> {
    let key = TargetKey::new(os, arch, libc);
    self.targets.iter().find(|target| target.key() == key)
  }

  /// Lookup by artifact directory name (e.g. `linux-x64-musl`).
  pub fn find_by_name(&self, name: &str) -> Option<&TargetDescriptor> {
    self.targets.iter().find(|target| target.name() == name)
  }

  /// Whether any descriptor targets `os`.
  pub fn supports_os(&self, os: Os) -> bool {
    self.targets.iter().any(|target| target.os == os)
  }

  /// Reject duplicate keys and colliding artifact directories.
  pub fn validate(&self) -> Result<(), RegistryError> {
    let mut keys: HashMap<TargetKey, &TargetDescriptor> = HashMap::new();
    let mut names: HashMap<String, &TargetDescriptor> = HashMap::new();

    for target in &self.targets {
      let key = target.key();
      if let Some(first) = keys.insert(key, target) {
        return Err(RegistryError::DuplicateKey {
          key,
          first: first.triple.clone(),
          second: target.triple.clone(),
        });
      }

      let name = target.name();
      if let Some(first) = names.insert(name.clone(), target) {
        return Err(RegistryError::DuplicateName {
          name,
          first: first.triple.clone(),
          second: target.triple.clone(),
        });
      }
    }

    debug!(count = self.targets.len(), "target registry validated");
    Ok(())
  }

  /// Restrict the registry to the named targets, preserving registry order.
  pub fn select(&self, names: &[String]) -> Result<Self, RegistryError> {
    if let Some(unknown) = names.iter().find(|name| self.find_by_name(name).is_none()) {
      return Err(RegistryError::UnknownTarget { name: unknown.clone() });
    }

    let targets = self
      .targets
      .iter()
      .filter(|target| names.contains(&target.name()))
      .cloned()
      .collect();

    Ok(Self::new(targets))
  }
}

impl Default for TargetRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}
