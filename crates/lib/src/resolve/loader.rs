//! Loading native artifacts into the process.

use std::mem::ManuallyDrop;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::debug;

use super::types::LoadError;

/// Turns an artifact on disk into an in-process binding.
pub trait BindingLoader {
  type Binding;

  /// Whether an artifact is present at `path`.
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn load(&self, path: &Path) -> Result<Self::Binding, LoadError>;
}

/// Loads artifacts as shared libraries through the platform dynamic loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryLoader;

impl BindingLoader for LibraryLoader {
  type Binding = NativeBinding;

  fn load(&self, path: &Path) -> Result<NativeBinding, LoadError> {
    debug!(path = ?path, "opening shared library");
    // SAFETY: loading runs the library's initializers. Artifacts under the
    // native directory are produced by the orchestrator for this exact target.
    let library = unsafe { Library::new(path)? };
    Ok(NativeBinding {
      path: path.to_path_buf(),
      library: ManuallyDrop::new(library),
    })
  }
}

/// A loaded native module.
///
/// The library stays mapped for the rest of the process, even after the
/// binding is dropped.
#[derive(Debug)]
pub struct NativeBinding {
  path: PathBuf,
  library: ManuallyDrop<Library>,
}

impl NativeBinding {
  /// The artifact this binding was loaded from.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Look up an exported symbol.
  ///
  /// # Safety
  ///
  /// `T` must match the actual type of the exported symbol.
  pub unsafe fn symbol<T>(&self, name: &str) -> Result<Symbol<'_, T>, LoadError> {
    // SAFETY: upheld by the caller
    let symbol = unsafe { self.library.get::<T>(name.as_bytes())? };
    Ok(symbol)
  }
}
