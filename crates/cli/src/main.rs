mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_build, cmd_check, cmd_info, cmd_targets};
use crate::output::{OutputFormat, print_error};

/// nbind - prebuilt native binding resolver and packager
#[derive(Parser)]
#[command(name = "nbind")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project directory containing nbind.json
  #[arg(short = 'C', long, global = true, default_value = ".")]
  project: PathBuf,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the detected host and its expected artifact
  Info,

  /// List the supported build targets
  Targets,

  /// Build and install native artifacts for every buildable target
  Build {
    /// Only build these targets (e.g. linux-x64-musl); repeatable
    #[arg(short, long = "target", value_name = "NAME")]
    targets: Vec<String>,

    /// Keep the toolchain's own output after installing
    #[arg(long)]
    keep_intermediate: bool,
  },

  /// Resolve and load the artifact for this host
  Check,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Info => cmd_info(&cli.project, cli.output),
    Commands::Targets => cmd_targets(&cli.project, cli.output),
    Commands::Build {
      targets,
      keep_intermediate,
    } => cmd_build(&cli.project, &targets, keep_intermediate, cli.output),
    Commands::Check => cmd_check(&cli.project, cli.output),
  }
}
