//! The built-in target table.

use std::collections::BTreeMap;

use crate::platform::arch::Arch;
use crate::platform::libc::Libc;
use crate::platform::os::Os;
use crate::registry::types::TargetDescriptor;

struct Row {
  os: Os,
  arch: Arch,
  libc: Option<Libc>,
  triple: &'static str,
  hosts: &'static [Os],
  env: &'static [(&'static str, &'static str)],
}

const MUSL_RUSTFLAGS: &str = "-C target-feature=-crt-static";

const TABLE: &[Row] = &[
  Row {
    os: Os::Linux,
    arch: Arch::X64,
    libc: Some(Libc::Gnu),
    triple: "x86_64-unknown-linux-gnu",
    hosts: &[Os::Linux],
    env: &[],
  },
  Row {
    os: Os::Linux,
    arch: Arch::Arm64,
    libc: Some(Libc::Gnu),
    triple: "aarch64-unknown-linux-gnu",
    hosts: &[Os::Linux],
    env: &[("CARGO_TARGET_AARCH64_UNKNOWN_LINUX_GNU_LINKER", "aarch64-linux-gnu-gcc")],
  },
  Row {
    os: Os::Linux,
    arch: Arch::Arm,
    libc: Some(Libc::Gnu),
    triple: "armv7-unknown-linux-gnueabihf",
    hosts: &[Os::Linux],
    env: &[("CARGO_TARGET_ARMV7_UNKNOWN_LINUX_GNUEABIHF_LINKER", "arm-linux-gnueabihf-gcc")],
  },
  Row {
    os: Os::Linux,
    arch: Arch::X64,
    libc: Some(Libc::Musl),
    triple: "x86_64-unknown-linux-musl",
    hosts: &[Os::Linux],
    env: &[
      ("CC_x86_64_unknown_linux_musl", "x86_64-linux-musl-gcc"),
      ("CARGO_TARGET_X86_64_UNKNOWN_LINUX_MUSL_LINKER", "x86_64-linux-musl-gcc"),
      ("RUSTFLAGS", MUSL_RUSTFLAGS),
    ],
  },
  Row {
    os: Os::Linux,
    arch: Arch::Arm64,
    libc: Some(Libc::Musl),
    triple: "aarch64-unknown-linux-musl",
    hosts: &[Os::Linux],
    env: &[
      ("CC_aarch64_unknown_linux_musl", "aarch64-linux-musl-gcc"),
      ("CARGO_TARGET_AARCH64_UNKNOWN_LINUX_MUSL_LINKER", "aarch64-linux-musl-gcc"),
      ("RUSTFLAGS", MUSL_RUSTFLAGS),
    ],
  },
  Row {
    os: Os::Darwin,
    arch: Arch::X64,
    libc: None,
    triple: "x86_64-apple-darwin",
    hosts: &[Os::Darwin],
    env: &[],
  },
  Row {
    os: Os::Darwin,
    arch: Arch::Arm64,
    libc: None,
    triple: "aarch64-apple-darwin",
    hosts: &[Os::Darwin],
    env: &[],
  },
  Row {
    os: Os::Windows,
    arch: Arch::X64,
    libc: None,
    triple: "x86_64-pc-windows-msvc",
    hosts: &[Os::Windows],
    env: &[],
  },
  Row {
    os: Os::Windows,
    arch: Arch::Ia32,
    libc: None,
    triple: "i686-pc-windows-msvc",
    hosts: &[Os::Windows],
    env: &[],
  },
  Row {
    os: Os::Windows,
    arch: Arch::Arm64,
    libc: None,
    triple: "aarch64-pc-windows-msvc",
    hosts: &[Os::Windows],
    env: &[],
  },
  Row {
    os: Os::Android,
    arch: Arch::Arm64,
    libc: None,
    triple: "aarch64-linux-android",
    hosts: &[Os::Linux, Os::Darwin],
    env: &[],
  },
  Row {
    os: Os::Android,
    arch: Arch::Arm,
    libc: None,
    triple: "armv7-linux-androideabi",
    hosts: &[Os::Linux, Os::Darwin],
    env: &[],
  },
  Row {
    os: Os::FreeBsd,
    arch: Arch::X64,
    libc: None,
    triple: "x86_64-unknown-freebsd",
    hosts: &[Os::FreeBsd, Os::Linux],
    env: &[],
  },
];

/// Descriptors for every platform the prebuilt package ships.
pub fn builtin_targets() -> Vec<TargetDescriptor> {
  TABLE
    .iter()
    .map(|row| TargetDescriptor {
      os: row.os,
      arch: row.arch,
      libc: row.libc,
      triple: row.triple.to_string(),
      hosts: row.hosts.to_vec(),
      command: None,
      env: row
        .env
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<BTreeMap<_, _>>(),
    })
    .collect()
}
