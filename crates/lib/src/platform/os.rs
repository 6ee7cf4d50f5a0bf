use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating systems a native artifact can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  Darwin,
  Windows,
  Android,
  FreeBsd,
}

impl Os {
  pub const ALL: [Os; 5] = [Os::Linux, Os::Darwin, Os::Windows, Os::Android, Os::FreeBsd];

  /// Detect the current operating system at runtime
  ///
  /// Returns `None` if the OS has no counterpart in the registry vocabulary
  pub fn current() -> Option<Self> {
    Self::parse(normalize(std::env::consts::OS))
  }

  /// Parse a registry identifier (`linux`, `darwin`, ...)
  pub fn parse(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|os| os.as_str() == name)
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::Darwin => "darwin",
      Self::Windows => "windows",
      Self::Android => "android",
      Self::FreeBsd => "freebsd",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Maps a `std::env::consts::OS` value onto the registry vocabulary.
///
/// Unknown values pass through unchanged so they can be reported verbatim.
pub fn normalize(raw: &str) -> &str {
  match raw {
    "macos" => "darwin",
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn macos_uses_darwin_identifier() {
    assert_eq!(normalize("macos"), "darwin");
    assert_eq!(Os::parse(normalize("macos")), Some(Os::Darwin));
  }

  #[test]
  fn unknown_os_passes_through() {
    assert_eq!(normalize("haiku"), "haiku");
    assert_eq!(Os::parse("haiku"), None);
  }

  #[test]
  fn parse_accepts_every_identifier() {
    for os in Os::ALL {
      assert_eq!(Os::parse(os.as_str()), Some(os));
    }
  }

  #[test]
  fn serde_uses_registry_identifiers() {
    assert_eq!(serde_json::to_string(&Os::FreeBsd).unwrap(), "\"freebsd\"");
    let os: Os = serde_json::from_str("\"darwin\"").unwrap();
    assert_eq!(os, Os::Darwin);
  }
}
