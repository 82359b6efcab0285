//! Tabulate command implementation.
//!
//! The tabulate command:
//! 1. Reads the benchmark log
//! 2. Parses it into one record per run
//! 3. Averages repeated runs per configuration and variant
//! 4. Renders and writes the comparison table

use super::models::{TabulateArgs, TabulateReport};
use crate::aggregator::aggregate;
use crate::output::{render_table, validate_path, write_table};
use crate::parser::{parse_log, resolver_for};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::time::Instant;

/// Execute the tabulate command
///
/// **Public** - main entry point called from main.rs
///
/// Nothing is written unless every step succeeds.
///
/// # Errors
/// * Input log cannot be read
/// * An auxiliary configuration file cannot be read
/// * A configuration is missing runs for one variant
/// * Output file cannot be written
pub fn execute_tabulate(args: TabulateArgs) -> Result<TabulateReport> {
    let start_time = Instant::now();
    let pipeline = &args.pipeline;

    info!(
        "Tabulating {} with the '{}' pipeline",
        args.input.display(),
        pipeline.name
    );

    // Step 1: Read input
    info!("Step 1/4: Reading benchmark log...");
    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read benchmark log {}", args.input.display()))?;
    // Stray non-UTF-8 bytes only spoil their own line
    let input = String::from_utf8_lossy(&bytes);

    // Step 2: Parse records
    info!("Step 2/4: Parsing runs...");
    let mut resolver = resolver_for(pipeline.scale_source, args.config_root.clone());
    let parsed = parse_log(&input, pipeline, resolver.as_mut())
        .context("Failed to parse benchmark log")?;

    // Step 3: Average runs
    info!("Step 3/4: Averaging {} runs...", parsed.records.len());
    let runs = aggregate(&parsed.records).context("Failed to average runs")?;
    info!("Aggregation: {}", runs.summary());

    for (i, config_key) in runs.order.iter().enumerate() {
        debug!("  {}. {}", i + 1, config_key);
    }

    // Step 4: Render and write
    info!("Step 4/4: Writing table...");
    let table = render_table(pipeline, &runs).context("Failed to render table")?;
    write_table(&table, &args.output)
        .with_context(|| format!("Failed to write table {}", args.output.display()))?;

    info!("✓ Table written to: {}", args.output.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("BENCHMARK TABLE ({})", pipeline.name);
        println!("{}", "=".repeat(80));
        println!("Runs:           {}", parsed.records.len());
        println!("Configurations: {}", runs.order.len());
        println!("Parse:          {}", parsed.stats.summary());
        println!();
        print!("{}", String::from_utf8_lossy(&table));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Tabulate completed in {:.2}s", elapsed.as_secs_f64());

    Ok(TabulateReport {
        records: parsed.records.len(),
        configurations: runs.order.len(),
        output: args.output,
    })
}

/// Validate tabulate arguments
///
/// **Public** - can be called before execute_tabulate for early validation
pub fn validate_args(args: &TabulateArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    validate_path(&args.output).context("Invalid output path")?;

    if args.input == args.output {
        anyhow::bail!("Output would overwrite the input log");
    }

    if let Some(root) = &args.config_root {
        if !root.is_dir() {
            anyhow::bail!("Config root is not a directory: {}", root.display());
        }
    }

    Ok(())
}
