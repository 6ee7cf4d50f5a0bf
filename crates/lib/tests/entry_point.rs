//! The process-global `binding()` entry point.
//!
//! Kept in its own test binary: the first call fixes the outcome for the
//! whole process.

use std::sync::Arc;

use nbind_lib::ResolveError;
use nbind_lib::binding;
use nbind_lib::consts::NATIVE_DIR_ENV;
use serial_test::serial;
use tempfile::TempDir;

#[test]
#[serial]
fn binding_reports_the_same_failure_every_time() {
  let native = TempDir::new().unwrap();

  temp_env::with_var(NATIVE_DIR_ENV, Some(native.path()), || {
    let first = binding().unwrap_err();
    let second = binding().unwrap_err();

    assert!(Arc::ptr_eq(&first, &second));
    match first.as_ref() {
      ResolveError::ArtifactMissing { path, .. } => assert!(path.starts_with(native.path())),
      // hosts without a registry entry never reach the filesystem
      ResolveError::UnsupportedPlatform { .. } | ResolveError::UnsupportedArchitecture { .. } => {}
      other => panic!("unexpected error: {other}"),
    }
  });

  // the outcome outlives the environment that produced it
  let third = binding().unwrap_err();
  assert!(matches!(
    third.as_ref(),
    ResolveError::ArtifactMissing { .. }
      | ResolveError::UnsupportedPlatform { .. }
      | ResolveError::UnsupportedArchitecture { .. }
  ));
}
