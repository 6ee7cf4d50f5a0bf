use std::path::Path;

use anyhow::{Context, Result};

use nbind_lib::config::ProjectConfig;

use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_targets(project_dir: &Path, output: OutputFormat) -> Result<()> {
  let config = ProjectConfig::discover(project_dir).context("Failed to load project config")?;
  let registry = config.registry()?;

  if output.is_json() {
    let items: Vec<_> = registry
      .iter()
      .map(|target| {
        serde_json::json!({
          "name": target.name(),
          "os": target.os,
          "arch": target.arch,
          "libc": target.libc,
          "triple": target.triple,
          "hosts": target.hosts,
          "command": target.build_command(&config.profile).to_string(),
        })
      })
      .collect();
    return print_json(&items);
  }

  for target in registry.iter() {
    let hosts = if target.hosts.is_empty() {
      "any host".to_string()
    } else {
      target
        .hosts
        .iter()
        .map(|os| os.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    };
    println!("  {} {:<18} {:<32} ({})", symbols::INFO, target.name(), target.triple, hosts);
  }

  Ok(())
}
