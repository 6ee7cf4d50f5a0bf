//! Where toolchains leave their output.

use std::path::{Path, PathBuf};

use crate::platform::os::Os;
use crate::registry::TargetDescriptor;

/// File name cargo gives a cdylib for `crate_name` on `os`.
pub fn library_file_name(os: Os, crate_name: &str) -> String {
  let stem = crate_name.replace('-', "_");
  match os {
    Os::Linux | Os::Android | Os::FreeBsd => format!("lib{stem}.so"),
    Os::Darwin => format!("lib{stem}.dylib"),
    Os::Windows => format!("{stem}.dll"),
  }
}

/// Cargo's output directory name for a profile.
pub fn profile_dir(profile: &str) -> &str {
  match profile {
    "dev" | "test" => "debug",
    "bench" => "release",
    other => other,
  }
}

/// `<target_dir>/<triple>/<profile>/<library>`
pub fn raw_artifact_path(target_dir: &Path, target: &TargetDescriptor, profile: &str, crate_name: &str) -> PathBuf {
  target_dir
    .join(&target.triple)
    .join(profile_dir(profile))
    .join(library_file_name(target.os, crate_name))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::TargetRegistry;

  #[test]
  fn library_names_follow_platform_conventions() {
    assert_eq!(library_file_name(Os::Linux, "upload-native"), "libupload_native.so");
    assert_eq!(library_file_name(Os::Darwin, "upload-native"), "libupload_native.dylib");
    assert_eq!(library_file_name(Os::Windows, "upload-native"), "upload_native.dll");
  }

  #[test]
  fn raw_path_uses_triple_and_profile() {
    let registry = TargetRegistry::builtin();
    let target = registry.find_by_name("linux-x64-musl").unwrap();

    assert_eq!(
      raw_artifact_path(Path::new("target"), target, "release", "upload"),
      Path::new("target/x86_64-unknown-linux-musl/release/libupload.so")
    );
    assert_eq!(
      raw_artifact_path(Path::new("target"), target, "dev", "upload"),
      Path::new("target/x86_64-unknown-linux-musl/debug/libupload.so")
    );
  }
}
