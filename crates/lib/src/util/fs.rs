//! Filesystem helpers.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Staging file used while replacing `path`: `<path>.tmp` in the same directory.
pub fn staging_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}

/// Copy `from` to `to`, replacing any existing file in a single rename.
///
/// Readers see either the old file or the complete new one, and a process
/// that still maps the old file keeps its own copy.
pub fn copy_atomic(from: &Path, to: &Path) -> io::Result<()> {
  replace_with(to, |staged| fs::copy(from, staged).map(drop))
}

/// Write `contents` to `path`, replacing any existing file in a single rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
  replace_with(path, |staged| fs::write(staged, contents))
}

fn replace_with(path: &Path, fill: impl FnOnce(&Path) -> io::Result<()>) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  let staged = staging_path(path);
  let result = fill(&staged)
    .and_then(|()| File::open(&staged)?.sync_all())
    .and_then(|()| fs::rename(&staged, path));

  if result.is_err() {
    let _ = fs::remove_file(&staged);
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn staging_path_sits_next_to_the_target() {
    assert_eq!(
      staging_path(Path::new("native/linux-x64/index.node")),
      PathBuf::from("native/linux-x64/index.node.tmp")
    );
  }

  #[test]
  fn copy_creates_parents_and_leaves_no_staging_file() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("libupload.so");
    let to = temp.path().join("native/linux-x64/index.node");
    fs::write(&from, "v1").unwrap();

    copy_atomic(&from, &to).unwrap();

    assert_eq!(fs::read_to_string(&to).unwrap(), "v1");
    assert!(!staging_path(&to).exists());
  }

  #[test]
  #[cfg(unix)]
  fn copy_replaces_the_file_instead_of_rewriting_it() {
    use std::os::unix::fs::MetadataExt;

    let temp = TempDir::new().unwrap();
    let from = temp.path().join("libupload.so");
    let to = temp.path().join("index.node");
    fs::write(&to, "old").unwrap();
    fs::write(&from, "new").unwrap();
    let before = fs::metadata(&to).unwrap().ino();
    // keep the old inode alive so it cannot be reused
    let _held = File::open(&to).unwrap();

    copy_atomic(&from, &to).unwrap();

    assert_ne!(fs::metadata(&to).unwrap().ino(), before);
    assert_eq!(fs::read_to_string(&to).unwrap(), "new");
  }

  #[test]
  fn failed_copy_keeps_the_existing_file() {
    let temp = TempDir::new().unwrap();
    let to = temp.path().join("index.node");
    fs::write(&to, "installed").unwrap();

    assert!(copy_atomic(&temp.path().join("missing.so"), &to).is_err());

    assert_eq!(fs::read_to_string(&to).unwrap(), "installed");
    assert!(!staging_path(&to).exists());
  }

  #[test]
  fn write_replaces_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nbind-manifest.json");

    write_atomic(&path, b"{}").unwrap();
    write_atomic(&path, b"{\"version\":1}").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"version\":1}");
    assert!(!staging_path(&path).exists());
  }
}
