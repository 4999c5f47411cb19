//! End-to-end ingestion: workbook bytes to the published table set

use chrono::NaiveDate;
use serde::Serialize;

use super::error::{PipelineError, SheetWarning};
use super::excel::{
    FlagTokens, NormalizedSheet, ReportWorkbook, SheetLayout, SheetRef, normalize_sheet,
};
use super::key::source_fingerprint;
use super::rollup::roll_up;
use super::transitions::{TransitionOptions, extract_transitions};
use super::types::{DailyFact, TableSet};
use super::views::materialize;

/// 1-based inclusive sheet range; an open end means the last sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl SheetRange {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Every sheet of the workbook
    pub fn all() -> Self {
        Self::new(1, None)
    }

    /// Resolve against the workbook's sheet count
    pub fn resolve(&self, total: usize) -> Result<(usize, usize), PipelineError> {
        let end = self.end.unwrap_or(total);
        if self.start < 1 || end > total || end < self.start {
            return Err(PipelineError::InvalidRange {
                start: self.start,
                end,
                total,
            });
        }
        Ok((self.start, end))
    }
}

impl Default for SheetRange {
    fn default() -> Self {
        Self::all()
    }
}

/// Settings that shape a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub layout: SheetLayout,
    pub flags: FlagTokens,
    pub transitions: TransitionOptions,
}

/// Tables plus everything a caller needs to report on the run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub tables: TableSet,
    /// Non-fatal anomalies, in sheet order
    pub warnings: Vec<SheetWarning>,
    /// Resolved 1-based range
    pub start_sheet: usize,
    pub end_sheet: usize,
    /// Names of the processed sheets, in order
    pub sheets: Vec<String>,
    /// SHA-1 of the workbook bytes
    pub source_sha1: String,
}

impl RunOutput {
    /// Total rows degraded or dropped by sheet anomalies
    pub fn affected_rows(&self) -> usize {
        self.warnings.iter().map(|w| w.affected_rows()).sum()
    }
}

/// A sheet of the workbook, as listed without building tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    /// 1-based position
    pub index: usize,
    pub name: String,
    pub report_date: Option<NaiveDate>,
}

/// Sheet names of a workbook, in order
pub fn sheet_names(bytes: &[u8]) -> Result<Vec<String>, PipelineError> {
    Ok(ReportWorkbook::open(bytes)?.sheet_names().to_vec())
}

/// List sheets with the report date each one carries
pub fn list_sheets(bytes: &[u8], layout: &SheetLayout) -> Result<Vec<SheetInfo>, PipelineError> {
    let mut workbook = ReportWorkbook::open(bytes)?;
    let names = workbook.sheet_names().to_vec();

    names
        .into_iter()
        .enumerate()
        .map(|(position, name)| {
            let grid = workbook.grid(position)?;
            Ok(SheetInfo {
                index: position + 1,
                name,
                report_date: layout.report_date(&grid),
            })
        })
        .collect()
}

/// Normalize every sheet of an already validated 1-based range
pub fn normalize_range(
    workbook: &mut ReportWorkbook<'_>,
    start: usize,
    end: usize,
    options: &PipelineOptions,
) -> Result<Vec<NormalizedSheet>, PipelineError> {
    let names = workbook.sheet_names().to_vec();
    (start..=end)
        .map(|index| {
            let grid = workbook.grid(index - 1)?;
            let sheet = SheetRef {
                name: names[index - 1].clone(),
                index,
            };
            Ok(normalize_sheet(&grid, sheet, &options.layout, &options.flags))
        })
        .collect()
}

/// Concatenate per-sheet rows in sheet order into the daily table.
///
/// Fails when nothing usable survived or when no row carries a report date.
pub fn assemble_daily(
    sheets: Vec<NormalizedSheet>,
) -> Result<(Vec<DailyFact>, Vec<SheetWarning>), PipelineError> {
    let mut daily = Vec::new();
    let mut warnings = Vec::new();
    for sheet in sheets {
        daily.extend(sheet.rows);
        warnings.extend(sheet.warnings);
    }

    if daily.is_empty() {
        return Err(PipelineError::NoUsableRows);
    }
    if daily.iter().all(|f| f.date_rapport.is_none()) {
        return Err(PipelineError::NoReportDates);
    }

    Ok((daily, warnings))
}

/// Run the whole pipeline over a workbook held in memory
pub fn build_tables(
    bytes: &[u8],
    range: SheetRange,
    options: &PipelineOptions,
) -> Result<RunOutput, PipelineError> {
    let mut workbook = ReportWorkbook::open(bytes)?;
    let (start, end) = range.resolve(workbook.sheet_count())?;
    log::info!(
        "Processing sheets {}-{} of {}",
        start,
        end,
        workbook.sheet_count()
    );

    let sheets = workbook.sheet_names()[start - 1..end].to_vec();
    let normalized = normalize_range(&mut workbook, start, end, options)?;
    let (daily, warnings) = assemble_daily(normalized)?;

    let rolled = roll_up(&daily);
    let transitions = extract_transitions(&rolled, &options.transitions);
    let tables = materialize(daily, rolled, transitions);

    log::info!(
        "Built {} daily rows, {} actions, {} transitions ({} warnings)",
        tables.actions_daily.len(),
        tables.actions_latest.len(),
        tables.transitions.len(),
        warnings.len()
    );

    Ok(RunOutput {
        tables,
        warnings,
        start_sheet: start,
        end_sheet: end,
        sheets,
        source_sha1: source_fingerprint(bytes),
    })
}
