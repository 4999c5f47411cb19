//! Consolidation of daily status report workbooks
//!
//! The [`report`] module holds the ingestion pipeline; [`config`] and
//! [`output`] back the command-line front end.

pub mod cli;
pub mod config;
pub mod output;
pub mod report;

pub use config::RollupConfig;
pub use report::{PipelineError, RunOutput, SheetRange, build_tables};
