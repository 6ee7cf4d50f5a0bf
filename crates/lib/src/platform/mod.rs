pub mod arch;
pub mod libc;
pub mod os;

use std::fmt;

use self::arch::Arch;
use self::libc::Libc;
use self::os::Os;
use serde::{Deserialize, Serialize};

/// Registry key combining OS, architecture and C library (e.g. `linux-x64-musl`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetKey {
  pub os: Os,
  pub arch: Arch,
  pub libc: Option<Libc>,
}

impl TargetKey {
  pub fn new(os: Os, arch: Arch, libc: Option<Libc>) -> Self {
    Self { os, arch, libc }
  }

  /// Directory name of the artifact for this key.
  ///
  /// glibc is the unsuffixed default, so `linux-x64` holds the glibc build and
  /// `linux-x64-musl` the musl one.
  pub fn name(&self) -> String {
    match self.libc {
      Some(Libc::Musl) => format!("{}-{}-musl", self.os, self.arch),
      Some(Libc::Gnu) | None => format!("{}-{}", self.os, self.arch),
    }
  }
}

impl fmt::Display for TargetKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.libc {
      Some(libc) => write!(f, "{}-{}-{}", self.os, self.arch, libc),
      None => write!(f, "{}-{}", self.os, self.arch),
    }
  }
}
