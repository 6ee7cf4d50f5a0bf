use std::fmt;

use serde::{Deserialize, Serialize};

/// C library flavor a Linux artifact links against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Libc {
  Gnu,
  Musl,
}

impl Libc {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Gnu => "gnu",
      Self::Musl => "musl",
    }
  }
}

impl fmt::Display for Libc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
