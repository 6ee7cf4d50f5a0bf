//! The real host environment.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{HostEnv, RuntimeReport};

/// Reads the running process's environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl HostEnv for SystemHost {
  fn os(&self) -> String {
    std::env::consts::OS.to_string()
  }

  fn arch(&self) -> String {
    std::env::consts::ARCH.to_string()
  }

  fn runtime_report(&self) -> RuntimeReport {
    runtime_report()
  }

  fn lookup(&self, program: &str) -> io::Result<Option<PathBuf>> {
    let output = Command::new("which").arg(program).output()?;
    if !output.status.success() {
      debug!(program, code = ?output.status.code(), "lookup found nothing");
      return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().next().map(str::trim).filter(|line| !line.is_empty()).map(PathBuf::from))
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
  }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn runtime_report() -> RuntimeReport {
  // SAFETY: gnu_get_libc_version returns a pointer to a static NUL-terminated string
  let version = unsafe { std::ffi::CStr::from_ptr(::libc::gnu_get_libc_version()) };
  RuntimeReport::Available {
    glibc_version: Some(version.to_string_lossy().into_owned()),
  }
}

#[cfg(all(target_os = "linux", target_env = "musl"))]
fn runtime_report() -> RuntimeReport {
  RuntimeReport::Available { glibc_version: None }
}

#[cfg(not(all(target_os = "linux", any(target_env = "gnu", target_env = "musl"))))]
fn runtime_report() -> RuntimeReport {
  RuntimeReport::Unavailable
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn system_host_reports_std_consts() {
    let host = SystemHost;
    assert_eq!(host.os(), std::env::consts::OS);
    assert_eq!(host.arch(), std::env::consts::ARCH);
  }

  #[test]
  #[cfg(all(target_os = "linux", target_env = "gnu"))]
  fn glibc_host_exposes_version() {
    match SystemHost.runtime_report() {
      RuntimeReport::Available { glibc_version } => assert!(glibc_version.is_some_and(|v| v.starts_with('2'))),
      RuntimeReport::Unavailable => panic!("glibc host should provide a runtime report"),
    }
  }
}
