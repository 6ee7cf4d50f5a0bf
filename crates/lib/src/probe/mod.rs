//! Runtime environment probe.
//!
//! Produces the `(os, arch, libc)` triple the resolver looks up. OS and
//! architecture come straight from the process; on Linux the C library is
//! detected in two tiers:
//!
//! 1. The structured runtime report. A glibc version field means gnu, a report
//!    without one means musl.
//! 2. Without a report, `ldd` is located through `which` and its contents are
//!    searched for the `musl` marker.
//!
//! Whenever detection is impossible the probe assumes musl. Loading a glibc
//! artifact on a musl system crashes, while a missing musl artifact produces a
//! readable error.

mod system;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use system::SystemHost;

use crate::platform::libc::Libc;
use crate::platform::{arch, os};

const LOADER_PROGRAM: &str = "ldd";
const MUSL_MARKER: &[u8] = b"musl";

/// The runtime's own description of its C library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeReport {
  /// The runtime cannot describe itself.
  Unavailable,
  /// A report exists; `glibc_version` is absent on non-glibc runtimes.
  Available { glibc_version: Option<String> },
}

/// Everything the probe reads from the environment.
pub trait HostEnv {
  /// Raw OS identifier, in `std::env::consts::OS` form.
  fn os(&self) -> String;
  /// Raw architecture identifier, in `std::env::consts::ARCH` form.
  fn arch(&self) -> String;
  fn runtime_report(&self) -> RuntimeReport;
  /// Locate `program` with the system lookup utility.
  ///
  /// `Ok(None)` means the utility ran and found nothing, `Err` means the
  /// utility itself could not be run.
  fn lookup(&self, program: &str) -> io::Result<Option<PathBuf>>;
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The detected host triple, in registry vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeResult {
  pub os: String,
  pub arch: String,
  pub libc: Option<Libc>,
}

impl ProbeResult {
  pub fn new(os: impl Into<String>, arch: impl Into<String>, libc: Option<Libc>) -> Self {
    Self {
      os: os.into(),
      arch: arch.into(),
      libc,
    }
  }
}

impl fmt::Display for ProbeResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.libc {
      Some(libc) => write!(f, "{}-{}-{}", self.os, self.arch, libc),
      None => write!(f, "{}-{}", self.os, self.arch),
    }
  }
}

/// Probe the running process.
pub fn probe() -> ProbeResult {
  probe_with(&SystemHost)
}

/// The process-wide probe result, computed on first use.
pub fn current() -> &'static ProbeResult {
  static CURRENT: OnceLock<ProbeResult> = OnceLock::new();
  CURRENT.get_or_init(probe)
}

/// Probe an arbitrary host environment.
pub fn probe_with(host: &impl HostEnv) -> ProbeResult {
  let os = os::normalize(&host.os()).to_string();
  let arch = arch::normalize(&host.arch()).to_string();
  let libc = (os == "linux").then(|| detect_libc(host));

  let result = ProbeResult::new(os, arch, libc);
  info!(host = %result, "probed host");
  result
}

/// Determine the C library flavor of a Linux host.
pub fn detect_libc(host: &impl HostEnv) -> Libc {
  match host.runtime_report() {
    RuntimeReport::Available {
      glibc_version: Some(version),
    } => {
      debug!(%version, "runtime report lists glibc");
      Libc::Gnu
    }
    RuntimeReport::Available { glibc_version: None } => {
      debug!("runtime report has no glibc version");
      Libc::Musl
    }
    RuntimeReport::Unavailable => inspect_loader(host),
  }
}

fn inspect_loader(host: &impl HostEnv) -> Libc {
  let loader = match host.lookup(LOADER_PROGRAM) {
    Ok(Some(path)) => path,
    Ok(None) => {
      warn!(program = LOADER_PROGRAM, "dynamic loader not found, assuming musl");
      return Libc::Musl;
    }
    Err(err) => {
      warn!(error = %err, "lookup utility unavailable, assuming musl");
      return Libc::Musl;
    }
  };

  match host.read(&loader) {
    Ok(contents) if contains(&contents, MUSL_MARKER) => Libc::Musl,
    Ok(_) => {
      debug!(loader = ?loader, "no musl marker in dynamic loader");
      Libc::Gnu
    }
    Err(err) => {
      warn!(loader = ?loader, error = %err, "cannot read dynamic loader, assuming musl");
      Libc::Musl
    }
  }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
  haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  /// Scripted host for probe tests.
  struct FakeHost {
    os: &'static str,
    arch: &'static str,
    report: RuntimeReport,
    lookup: Option<io::Result<Option<PathBuf>>>,
    files: HashMap<PathBuf, Vec<u8>>,
  }

  impl FakeHost {
    fn linux(report: RuntimeReport) -> Self {
      Self {
        os: "linux",
        arch: "x86_64",
        report,
        lookup: None,
        files: HashMap::new(),
      }
    }

    fn with_loader(mut self, contents: &[u8]) -> Self {
      let path = PathBuf::from("/usr/bin/ldd");
      self.files.insert(path.clone(), contents.to_vec());
      self.lookup = Some(Ok(Some(path)));
      self
    }
  }

  impl HostEnv for FakeHost {
    fn os(&self) -> String {
      self.os.to_string()
    }

    fn arch(&self) -> String {
      self.arch.to_string()
    }

    fn runtime_report(&self) -> RuntimeReport {
      self.report.clone()
    }

    fn lookup(&self, _program: &str) -> io::Result<Option<PathBuf>> {
      match &self.lookup {
        Some(Ok(path)) => Ok(path.clone()),
        Some(Err(err)) => Err(io::Error::new(err.kind(), err.to_string())),
        None => Err(io::Error::new(io::ErrorKind::NotFound, "which: not found")),
      }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
      self
        .files
        .get(path)
        .cloned()
        .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"))
    }
  }

  #[test]
  fn glibc_version_in_report_means_gnu() {
    let host = FakeHost::linux(RuntimeReport::Available {
      glibc_version: Some("2.39".to_string()),
    });
    assert_eq!(probe_with(&host), ProbeResult::new("linux", "x64", Some(Libc::Gnu)));
  }

  #[test]
  fn report_without_glibc_version_means_musl() {
    let host = FakeHost::linux(RuntimeReport::Available { glibc_version: None });
    assert_eq!(detect_libc(&host), Libc::Musl);
  }

  #[test]
  fn report_takes_precedence_over_loader() {
    let host = FakeHost::linux(RuntimeReport::Available {
      glibc_version: Some("2.17".to_string()),
    })
    .with_loader(b"#!/bin/sh\nexec /lib/ld-musl-x86_64.so.1 --list \"$@\"\n");
    assert_eq!(detect_libc(&host), Libc::Gnu);
  }

  #[test]
  fn loader_with_musl_marker_means_musl() {
    let host =
      FakeHost::linux(RuntimeReport::Unavailable).with_loader(b"#!/bin/sh\nexec /lib/ld-musl-aarch64.so.1 --list\n");
    assert_eq!(detect_libc(&host), Libc::Musl);
  }

  #[test]
  fn loader_without_marker_means_gnu() {
    let host = FakeHost::linux(RuntimeReport::Unavailable).with_loader(b"#!/bin/bash\n# ldd (GNU libc) 2.36\n");
    assert_eq!(detect_libc(&host), Libc::Gnu);
  }

  #[test]
  fn missing_lookup_utility_assumes_musl() {
    let host = FakeHost::linux(RuntimeReport::Unavailable);
    assert_eq!(probe_with(&host).libc, Some(Libc::Musl));
  }

  #[test]
  fn loader_not_found_assumes_musl() {
    let mut host = FakeHost::linux(RuntimeReport::Unavailable);
    host.lookup = Some(Ok(None));
    assert_eq!(detect_libc(&host), Libc::Musl);
  }

  #[test]
  fn unreadable_loader_assumes_musl() {
    let mut host = FakeHost::linux(RuntimeReport::Unavailable);
    host.lookup = Some(Ok(Some(PathBuf::from("/usr/bin/ldd"))));
    assert_eq!(detect_libc(&host), Libc::Musl);
  }

  #[test]
  fn non_linux_hosts_have_no_libc() {
    let host = FakeHost {
      os: "macos",
      arch: "aarch64",
      report: RuntimeReport::Unavailable,
      lookup: None,
      files: HashMap::new(),
    };
    assert_eq!(probe_with(&host), ProbeResult::new("darwin", "arm64", None));
  }

  #[test]
  fn unknown_values_are_kept_verbatim() {
    let host = FakeHost {
      os: "haiku",
      arch: "riscv64",
      report: RuntimeReport::Unavailable,
      lookup: None,
      files: HashMap::new(),
    };
    let result = probe_with(&host);
    assert_eq!(result.to_string(), "haiku-riscv64");
  }

  #[test]
  fn current_is_memoized() {
    assert!(std::ptr::eq(current(), current()));
  }
}
