//! Command-line surface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{BuildArgs, SheetsArgs};

#[derive(Debug, Parser)]
#[command(name = "report-rollup", version, about = "Consolidate daily status report workbooks")]
pub struct Cli {
    /// Config file (defaults to $REPORT_ROLLUP_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter implied by the verbosity flag
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the sheets of a workbook with their report dates
    Sheets(SheetsArgs),
    /// Build the consolidated tables and write them to the output directory
    Build(BuildArgs),
}
