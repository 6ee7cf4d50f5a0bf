//! Info command implementation.
//!
//! Shows what the probe detects on this host and where the matching artifact
//! is expected.

use std::path::Path;

use anyhow::{Context, Result};

use nbind_lib::config::ProjectConfig;
use nbind_lib::probe;
use nbind_lib::resolve::{BindingResolver, LibraryLoader};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_warning};

pub fn cmd_info(project_dir: &Path, output: OutputFormat) -> Result<()> {
  let config = ProjectConfig::discover(project_dir).context("Failed to load project config")?;
  let registry = config.registry()?;
  let host = probe::current();

  let resolver = BindingResolver::new(
    registry,
    config.native_dir(project_dir),
    &config.binary_name,
    LibraryLoader,
  );
  let located = resolver.locate(host);

  if output.is_json() {
    let json = match &located {
      Ok(target) => {
        let artifact = resolver.artifact_path(target);
        serde_json::json!({
          "host": host,
          "target": target.name(),
          "triple": target.triple,
          "artifact": artifact,
          "installed": artifact.is_file(),
        })
      }
      Err(err) => serde_json::json!({ "host": host, "error": err.to_string() }),
    };
    return print_json(&json);
  }

  println!("System:");
  print_stat("OS", &host.os);
  print_stat("Arch", &host.arch);
  print_stat("Libc", host.libc.map_or("n/a", |libc| libc.as_str()));

  match located {
    Ok(target) => {
      let artifact = resolver.artifact_path(target);
      println!();
      print_info(&format!("Target {} ({})", target.name(), target.triple));
      print_stat("Artifact", &artifact.display().to_string());
      print_stat("Installed", if artifact.is_file() { "yes" } else { "no" });
    }
    Err(err) => print_warning(&err.to_string()),
  }

  Ok(())
}
