//! Bench Digest CLI
//!
//! Parses load-test logs, averages repeated runs and writes
//! a paired comparison table per configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use bench_digest::commands::{
    display_schema, display_version, execute_tabulate, validate_args, TabulateArgs,
};
use bench_digest::parser::{load_pipeline, Pipeline};
use bench_digest::utils::config::{DISPATCH_PIPELINE, SCALING_PIPELINE};

/// Bench Digest - paired comparison tables from load-test logs
#[derive(Parser, Debug)]
#[command(name = "bench-digest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Built-in pipelines
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    /// Heap vs priority-queue dispatch runs
    Dispatch,
    /// Horizontal vs vertical scaling runs
    Scaling,
}

impl Preset {
    fn name(self) -> &'static str {
        match self {
            Preset::Dispatch => DISPATCH_PIPELINE,
            Preset::Scaling => SCALING_PIPELINE,
        }
    }
}

/// Pipeline selection shared by every command
#[derive(Args, Debug)]
struct PipelineSelection {
    /// Built-in pipeline
    #[arg(value_enum, default_value = "dispatch")]
    preset: Preset,

    /// TOML pipeline definition (overrides the preset)
    #[arg(long)]
    pipeline_file: Option<PathBuf>,
}

impl PipelineSelection {
    fn load(&self) -> Result<Pipeline> {
        match &self.pipeline_file {
            Some(path) => load_pipeline(path)
                .with_context(|| format!("Failed to load pipeline {}", path.display())),
            None => Pipeline::preset(self.preset.name()).context("Failed to build pipeline"),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a benchmark log and write the comparison table
    Tabulate {
        #[command(flatten)]
        selection: PipelineSelection,

        /// Benchmark log (defaults to the pipeline's log name)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output table (defaults to the pipeline's table name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory auxiliary configuration files are resolved against
        #[arg(long)]
        config_root: Option<PathBuf>,

        /// Print the table to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Display the table columns of a pipeline
    Schema {
        #[command(flatten)]
        selection: PipelineSelection,

        /// Show grammar and schedule details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Tabulate {
            selection,
            input,
            output,
            config_root,
            summary,
        } => {
            let pipeline = selection.load()?;

            let mut args = TabulateArgs::with_defaults(pipeline, input, output)?;
            args.config_root = config_root;
            args.print_summary = summary;

            // Validate args first
            validate_args(&args)?;

            execute_tabulate(args)?;
        }

        Commands::Schema { selection, show } => {
            let pipeline = selection.load()?;
            display_schema(&pipeline, show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
