// CLI Interface
//
// This module provides the command-line interface for LeScission.

use crate::plan::SplitPlan;
use anyhow::{bail, Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use ledepot::DirectoryDepot;
use leretouche::TransitionRetime;
use lescission::{SplitReport, Splitter};
use std::path::PathBuf;
use tracing::info;

/// LeScission - Controller Partitioning Toolkit
#[derive(Parser, Debug)]
#[command(name = "lescission")]
#[command(author = "LeScission Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Split, retime, and inspect state-transition controller documents", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Partition a controller document by a split plan
    Split {
        /// Path to the controller document
        #[arg(value_name = "CONTROLLER")]
        controller: PathBuf,

        /// Path to the split plan TOML
        #[arg(long = "plan", value_name = "PLAN")]
        plan: PathBuf,
    },

    /// Rewrite transition timing across one or more controller documents
    Retime {
        /// Controller documents to rewrite in place
        #[arg(value_name = "CONTROLLER", required = true)]
        controllers: Vec<PathBuf>,

        /// Normalized exit time to write
        #[arg(long = "exit-time")]
        exit_time: f32,

        /// Transition duration to write
        #[arg(long = "duration")]
        duration: f32,

        /// Destination-state offset to write
        #[arg(long = "offset")]
        offset: f32,

        /// Layer to rewrite (defaults to the first layer)
        #[arg(long = "layer")]
        layer: Option<String>,
    },

    /// Print a summary of a controller document
    Inspect {
        /// Path to the controller document
        #[arg(value_name = "CONTROLLER")]
        controller: PathBuf,
    },
}

impl Cli {
    /// Run the CLI
    pub fn run(self) -> AnyhowResult<()> {
        init_logging_impl(self.verbose);

        match self.command {
            Commands::Split { controller, plan } => cmd_split_impl(controller, plan),
            Commands::Retime {
                controllers,
                exit_time,
                duration,
                offset,
                layer,
            } => {
                let retime = TransitionRetime {
                    exit_time,
                    duration,
                    offset,
                };
                cmd_retime_impl(controllers, retime, layer)
            }
            Commands::Inspect { controller } => cmd_inspect_impl(controller),
        }
    }
}

/// Initialize logging implementation
fn init_logging_impl(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Split command implementation
fn cmd_split_impl(controller_path: PathBuf, plan_path: PathBuf) -> AnyhowResult<()> {
    let plan = SplitPlan::load(&plan_path)?;
    let classifier = plan.classifier()?;

    let mut controller = DirectoryDepot::load_path(&controller_path)
        .with_context(|| format!("Failed to load controller: {:?}", controller_path))?;
    let mut depot = DirectoryDepot::new(&plan.output_dir)
        .with_context(|| format!("Failed to open output directory: {:?}", plan.output_dir))?;

    info!(controller = %controller.name, "splitting controller");

    let splitter = Splitter::new(plan.options());
    let report = splitter
        .run(&mut controller, &classifier, &mut depot)
        .context("Split run failed")?;

    if plan.prune {
        DirectoryDepot::write_path(&controller_path, &controller)
            .context("Failed to write back the pruned source")?;
    }

    print_report_impl(&report);
    Ok(())
}

/// Print a split report
fn print_report_impl(report: &SplitReport) {
    println!("\n✓ Split complete!");
    println!("  Artifacts: {}", report.extracted());
    for outcome in &report.groups {
        match &outcome.artifact {
            Some(name) => println!(
                "  {}: {} ({} roots, {} states, {} pruned)",
                outcome.group, name, outcome.roots, outcome.states, outcome.pruned
            ),
            None => println!("  {}: no roots matched, skipped", outcome.group),
        }
    }
}

/// Retime command implementation
fn cmd_retime_impl(
    paths: Vec<PathBuf>,
    retime: TransitionRetime,
    layer: Option<String>,
) -> AnyhowResult<()> {
    for path in paths {
        let mut controller = DirectoryDepot::load_path(&path)
            .with_context(|| format!("Failed to load controller: {:?}", path))?;

        let target = match &layer {
            Some(name) => controller.layer_mut(name),
            None => controller.layers_mut().first_mut(),
        };
        let Some(target) = target else {
            bail!("No matching layer in controller: {:?}", path);
        };

        let count = retime.apply(&mut target.machine);
        DirectoryDepot::write_path(&path, &controller)
            .with_context(|| format!("Failed to write controller: {:?}", path))?;
        println!("{}: rewrote {} transitions", path.display(), count);
    }
    Ok(())
}

/// Inspect command implementation
fn cmd_inspect_impl(path: PathBuf) -> AnyhowResult<()> {
    let controller = DirectoryDepot::load_path(&path)
        .with_context(|| format!("Failed to load controller: {:?}", path))?;

    println!("Controller: {}", controller.name);
    println!("  Parameters: {}", controller.parameters().len());
    for parameter in controller.parameters() {
        println!("    {} ({:?})", parameter.name, parameter.kind);
    }
    println!("  Layers: {}", controller.layers().len());
    for layer in controller.layers() {
        println!(
            "    {}: {} states, {} transitions, {} any-state transitions",
            layer.name,
            layer.machine.state_count(),
            layer.machine.transition_count(),
            layer.machine.any_state_transitions().len()
        );
    }
    Ok(())
}

/// Main entry point for the CLI
pub fn main() -> AnyhowResult<()> {
    let cli = Cli::parse();
    cli.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_parsing() {
        let cli = Cli::try_parse_from([
            "lescission",
            "split",
            "fighter.controller.json",
            "--plan",
            "plan.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Split { .. }));
    }

    #[test]
    fn test_retime_parsing() {
        let cli = Cli::try_parse_from([
            "lescission",
            "retime",
            "a.controller.json",
            "b.controller.json",
            "--exit-time",
            "1.1",
            "--duration",
            "1.2",
            "--offset",
            "1.3",
        ])
        .unwrap();
        match cli.command {
            Commands::Retime {
                controllers,
                exit_time,
                duration,
                offset,
                layer,
            } => {
                assert_eq!(controllers.len(), 2);
                assert_eq!(exit_time, 1.1);
                assert_eq!(duration, 1.2);
                assert_eq!(offset, 1.3);
                assert_eq!(layer, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_retime_requires_a_document() {
        assert!(Cli::try_parse_from([
            "lescission",
            "retime",
            "--exit-time",
            "1.1",
            "--duration",
            "1.2",
            "--offset",
            "1.3",
        ])
        .is_err());
    }

    #[test]
    fn test_verbose_flag_parsing() {
        let cli =
            Cli::try_parse_from(["lescission", "inspect", "fighter.controller.json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Inspect { .. }));
    }
}
