//! Run the pipeline and publish the tables

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::PathBuf;

use super::read_workbook;
use crate::config::RollupConfig;
use crate::output::{self, Manifest};
use crate::report::key::source_fingerprint;
use crate::report::pipeline::sheet_names;
use crate::report::{RunOutput, SheetRange, build_tables};

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Workbook of daily report sheets
    pub file: PathBuf,

    /// First sheet to process (1-based)
    #[arg(long, default_value = "1", value_parser = parse_sheet_index)]
    pub start: usize,

    /// Last sheet to process (1-based, defaults to the last sheet)
    #[arg(long, value_parser = parse_sheet_index)]
    pub end: Option<usize>,

    /// Output directory (overrides the configured one)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Rebuild even when the output is up to date
    #[arg(long)]
    pub force: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_sheet_index(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("sheet indexes start at 1".to_string()),
        Ok(index) => Ok(index),
        Err(_) => Err(format!("'{}' is not a sheet index", value)),
    }
}

pub fn execute(args: BuildArgs, config: &RollupConfig) -> Result<()> {
    let bytes = read_workbook(&args.file)?;
    let source = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| config.output.directory.clone());
    let range = SheetRange::new(args.start, args.end);
    let config_sha1 = config.fingerprint()?;

    if !args.force {
        let total = sheet_names(&bytes)
            .with_context(|| format!("Failed to open workbook: {}", args.file.display()))?
            .len();
        let (start, end) = range.resolve(total)?;
        let fingerprint = source_fingerprint(&bytes);
        let previous = output::up_to_date(&out_dir, &fingerprint, &config_sha1, start, end)?;
        if let Some(manifest) = previous {
            log::info!("Output in {} is up to date", out_dir.display());
            if args.json {
                print_json(&manifest)?;
            } else {
                println!(
                    "{} {} (run {}, use --force to rebuild)",
                    "Up to date:".green().bold(),
                    out_dir.display().to_string().cyan(),
                    manifest.meta.run_id
                );
            }
            return Ok(());
        }
    }

    let run = build_tables(&bytes, range, &config.pipeline_options())
        .with_context(|| format!("Failed to build tables from {}", args.file.display()))?;
    let delimiter = config.output.delimiter as u8;
    let manifest = output::publish(&out_dir, &source, &config_sha1, &run, delimiter)?;

    if args.json {
        print_json(&manifest)
    } else {
        print_summary(&run, &manifest, &out_dir);
        Ok(())
    }
}

fn print_json(manifest: &Manifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("Failed to format JSON output")?;
    println!("{}", json);
    Ok(())
}

fn print_summary(run: &RunOutput, manifest: &Manifest, out_dir: &std::path::Path) {
    println!(
        "Processed sheets {}-{} ({})",
        run.start_sheet,
        run.end_sheet,
        run.sheets.join(", ").dimmed()
    );
    match (manifest.meta.date_min, manifest.meta.date_max) {
        (Some(min), Some(max)) => println!("Report dates: {} to {}", min, max),
        _ => println!("Report dates: {}", "none".dimmed()),
    }
    println!();

    for (table, rows) in run.tables.counts() {
        println!("  {:<20} {:>6}", table.as_str(), rows.to_string().bold());
    }

    let undated = manifest.meta.rows_without_date;
    if undated > 0 {
        println!();
        println!(
            "{} {} daily rows have no report date",
            "Warning:".yellow().bold(),
            undated
        );
    }
    if !run.warnings.is_empty() {
        println!();
        for warning in &run.warnings {
            println!("{} {}", "Warning:".yellow().bold(), warning);
        }
        println!(
            "{} rows affected by sheet anomalies",
            run.affected_rows().to_string().yellow()
        );
    }

    println!();
    println!(
        "{} {}",
        "Tables written to".green(),
        out_dir.display().to_string().cyan()
    );
}
