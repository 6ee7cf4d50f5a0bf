//! Types describing a single build target.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::TargetKey;
use crate::platform::arch::Arch;
use crate::platform::libc::Libc;
use crate::platform::os::Os;

/// An external command that produces one target's raw artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCommand {
  pub program: String,
  #[serde(default)]
  pub args: Vec<String>,
}

impl BuildCommand {
  pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      program: program.into(),
      args: args.into_iter().map(Into::into).collect(),
    }
  }

  /// `cargo build --target <triple>` for the given cargo profile.
  pub fn cargo(triple: &str, profile: &str) -> Self {
    let mut args = vec!["build".to_string(), "--target".to_string(), triple.to_string()];
    if profile == "release" {
      args.push("--release".to_string());
    } else {
      args.push("--profile".to_string());
      args.push(profile.to_string());
    }
    Self {
      program: "cargo".to_string(),
      args,
    }
  }
}

impl fmt::Display for BuildCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// One supported (OS, architecture, libc) combination and how to build it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
  pub os: Os,
  pub arch: Arch,
  #[serde(default)]
  pub libc: Option<Libc>,
  /// Toolchain target triple, e.g. `x86_64-unknown-linux-musl`.
  pub triple: String,
  /// Host operating systems able to build this target. Empty means any host.
  #[serde(default)]
  pub hosts: Vec<Os>,
  /// Overrides the default `cargo build` invocation.
  #[serde(default)]
  pub command: Option<BuildCommand>,
  /// Extra environment for the build, e.g. cross linker selection.
  #[serde(default)]
  pub env: BTreeMap<String, String>,
}

impl TargetDescriptor {
  pub fn key(&self) -> TargetKey {
    TargetKey::new(self.os, self.arch, self.libc)
  }

  /// Artifact directory name, shared by the orchestrator and the resolver.
  pub fn name(&self) -> String {
    self.key().name()
  }

  /// `<base_dir>/<name>/<binary_name>`
  pub fn artifact_path(&self, base_dir: &Path, binary_name: &str) -> PathBuf {
    base_dir.join(self.name()).join(binary_name)
  }

  pub fn buildable_on(&self, host: Option<Os>) -> bool {
    if self.hosts.is_empty() {
      return true;
    }
    host.is_some_and(|os| self.hosts.contains(&os))
  }

  pub fn build_command(&self, profile: &str) -> BuildCommand {
    self
      .command
      .clone()
      .unwrap_or_else(|| BuildCommand::cargo(&self.triple, profile))
  }
}

/// Registry configuration errors.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// Two descriptors share the same (os, arch, libc) key.
  #[error("duplicate target {key}: declared by {first} and {second}")]
  DuplicateKey {
    key: TargetKey,
    first: String,
    second: String,
  },

  /// Two descriptors would install into the same artifact directory.
  #[error("targets {first} and {second} both install into '{name}'")]
  DuplicateName { name: String, first: String, second: String },

  /// A requested target name is not in the registry.
  #[error("unknown target '{name}'")]
  UnknownTarget { name: String },
}
