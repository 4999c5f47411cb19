//! List workbook sheets without building tables

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::PathBuf;

use super::read_workbook;
use crate::config::RollupConfig;
use crate::report::list_sheets;

#[derive(Debug, Args)]
pub struct SheetsArgs {
    /// Workbook to inspect (xlsx, xls, xlsb or ods)
    pub file: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SheetsArgs, config: &RollupConfig) -> Result<()> {
    let bytes = read_workbook(&args.file)?;
    let sheets = list_sheets(&bytes, &config.layout)
        .with_context(|| format!("Failed to list sheets of {}", args.file.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&sheets).context("Failed to format JSON output")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{} sheets in {}",
        sheets.len().to_string().bold(),
        args.file.display().to_string().cyan()
    );
    for sheet in &sheets {
        let date = match sheet.report_date {
            Some(date) => date.format("%Y-%m-%d").to_string().green(),
            None => "no date".dimmed(),
        };
        println!("{:>4}  {:<30} {}", sheet.index, sheet.name, date);
    }
    Ok(())
}
