//! Check command implementation.
//!
//! Probes the host and loads its artifact from the project's native
//! directory. The resolver is set up from the build manifest the same way
//! `nbind_lib::binding()` sets up the process-global one.

use std::path::Path;

use anyhow::{Context, Result, bail};

use nbind_lib::config::ProjectConfig;
use nbind_lib::probe;
use nbind_lib::resolve::{BindingResolver, LibraryLoader};

use crate::output::{OutputFormat, print_error, print_json, print_success};

pub fn cmd_check(project_dir: &Path, output: OutputFormat) -> Result<()> {
  let config = ProjectConfig::discover(project_dir).context("Failed to load project config")?;
  let native_dir = config.native_dir(project_dir);
  let resolver = BindingResolver::installed(&native_dir, LibraryLoader)
    .with_context(|| format!("Failed to read native directory {}", native_dir.display()))?;
  let host = probe::current();

  match resolver.resolve(host) {
    Ok(binding) => {
      if output.is_json() {
        print_json(&serde_json::json!({ "host": host, "loaded": binding.path() }))?;
      } else {
        print_success(&format!("Loaded {} for {}", binding.path().display(), host));
      }
      Ok(())
    }
    Err(err) => {
      if output.is_json() {
        print_json(&serde_json::json!({ "host": host, "error": err.to_string() }))?;
      } else {
        print_error(&err.to_string());
      }
      bail!("native binding unavailable for {host}")
    }
  }
}
