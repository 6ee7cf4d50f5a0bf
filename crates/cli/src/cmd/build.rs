//! Build command implementation.
//!
//! Runs the orchestrator over the registry and reports every target.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use nbind_lib::config::ProjectConfig;
use nbind_lib::orchestrator::{BuildError, BuildSummary, Orchestrator, SystemRunner, TargetStatus};

use crate::output::{
  OutputFormat, format_duration, print_error, print_info, print_json, print_skip, print_stat, print_success,
};

pub fn cmd_build(project_dir: &Path, targets: &[String], keep_intermediate: bool, output: OutputFormat) -> Result<()> {
  let config = ProjectConfig::discover(project_dir).context("Failed to load project config")?;

  let mut registry = config.registry()?;
  if !targets.is_empty() {
    registry = registry.select(targets)?;
  }

  let mut options = config.build_options(project_dir)?;
  if keep_intermediate {
    options.clean_intermediate = false;
  }
  debug!(?options, "resolved build options");

  if !output.is_json() {
    print_info(&format!(
      "Building {} target(s) into {}",
      registry.len(),
      options.native_dir.display()
    ));
  }

  let orchestrator = Orchestrator::new(registry, options, SystemRunner::new(project_dir))?;
  let summary = orchestrator.run();

  if output.is_json() {
    print_json(&summary_json(&summary))?;
  } else {
    print_summary(&summary);
  }

  let failed = summary.failed().count();
  if failed > 0 {
    bail!("{failed} target(s) failed to build");
  }
  if let Some(err) = summary.manifest_error {
    bail!("{err}");
  }
  Ok(())
}

fn print_summary(summary: &BuildSummary) {
  for outcome in &summary.outcomes {
    let label = format!("{} ({})", outcome.name, outcome.triple);
    match &outcome.status {
      TargetStatus::Built { artifact } => {
        print_success(&format!("{label} -> {} in {}", artifact.display(), format_duration(outcome.duration)));
      }
      TargetStatus::Skipped { reason } => print_skip(&format!("{label} skipped: {reason}")),
      TargetStatus::Failed { error } => {
        print_error(&format!("{label}: {error}"));
        if let BuildError::CommandFailed { stderr, .. } = error {
          for line in stderr.lines() {
            eprintln!("    {line}");
          }
        }
      }
    }
  }

  println!();
  print_stat("Built", &summary.built().count().to_string());
  print_stat("Skipped", &summary.skipped().count().to_string());
  print_stat("Failed", &summary.failed().count().to_string());
}

fn summary_json(summary: &BuildSummary) -> serde_json::Value {
  let targets: Vec<_> = summary
    .outcomes
    .iter()
    .map(|outcome| {
      let mut entry = serde_json::json!({
        "name": outcome.name,
        "triple": outcome.triple,
        "duration_ms": outcome.duration.as_millis() as u64,
      });
      let detail = match &outcome.status {
        TargetStatus::Built { artifact } => serde_json::json!({ "status": "built", "artifact": artifact }),
        TargetStatus::Skipped { reason } => serde_json::json!({ "status": "skipped", "reason": reason }),
        TargetStatus::Failed { error } => serde_json::json!({ "status": "failed", "error": error.to_string() }),
      };
      if let (Some(entry), serde_json::Value::Object(detail)) = (entry.as_object_mut(), detail) {
        entry.extend(detail);
      }
      entry
    })
    .collect();

  serde_json::json!({
    "success": summary.is_success(),
    "built": summary.built().count(),
    "skipped": summary.skipped().count(),
    "failed": summary.failed().count(),
    "manifest_error": summary.manifest_error.as_ref().map(ToString::to_string),
    "targets": targets,
  })
}
