use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU architecture variants a native artifact can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X64,
  Arm64,
  Arm,
  Ia32,
}

impl Arch {
  pub const ALL: [Arch; 4] = [Arch::X64, Arch::Arm64, Arch::Arm, Arch::Ia32];

  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    Self::parse(normalize(std::env::consts::ARCH))
  }

  /// Parse a registry identifier (`x64`, `arm64`, ...)
  pub fn parse(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|arch| arch.as_str() == name)
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X64 => "x64",
      Self::Arm64 => "arm64",
      Self::Arm => "arm",
      Self::Ia32 => "ia32",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Maps a `std::env::consts::ARCH` value onto the registry vocabulary.
pub fn normalize(raw: &str) -> &str {
  match raw {
    "x86_64" => "x64",
    "aarch64" => "arm64",
    "x86" => "ia32",
    other => other,
  }
}
