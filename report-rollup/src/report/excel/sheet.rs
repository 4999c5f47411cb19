//! Per-sheet normalization: fixed layout in, daily facts out

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::columns::{ColumnIndex, FlagTokens};
use super::workbook::{EMPTY_CELL, SheetGrid, cell_date, cell_text, is_blank};
use crate::report::error::SheetWarning;
use crate::report::text::{folded_eq, normalize_text};
use crate::report::types::{ActionFields, DailyFact, RawFlags, cols};

/// Where things live on a daily report sheet (all indices 0-based).
///
/// This is the data contract with the reporting template; a new template
/// version only needs a different layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub date_row: usize,
    pub date_col: usize,
    pub header_row: usize,
    pub data_start_row: usize,
    /// Zone value that opens the forecast section
    pub forecast_sentinel: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            date_row: 2,
            date_col: 8,
            header_row: 4,
            data_start_row: 5,
            forecast_sentinel: "PREVISION".to_string(),
        }
    }
}

impl SheetLayout {
    /// Report date of a sheet, if the date cell holds one
    pub fn report_date(&self, grid: &SheetGrid) -> Option<NaiveDate> {
        cell_date(grid.cell(self.date_row, self.date_col))
    }

    fn is_forecast_marker(&self, zone: &str) -> bool {
        folded_eq(zone, &self.forecast_sentinel)
    }
}

/// Identifies a sheet within the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub name: String,
    /// 1-based position in the workbook
    pub index: usize,
}

/// Rows and anomalies from one sheet
#[derive(Debug, Clone)]
pub struct NormalizedSheet {
    pub sheet: SheetRef,
    pub report_date: Option<NaiveDate>,
    pub rows: Vec<DailyFact>,
    pub warnings: Vec<SheetWarning>,
}

/// Normalize one sheet into daily facts.
///
/// Never fails: a sheet without a zone column yields no rows and a warning,
/// an unreadable date leaves the rows undated and adds a warning.
pub fn normalize_sheet(
    grid: &SheetGrid,
    sheet: SheetRef,
    layout: &SheetLayout,
    tokens: &FlagTokens,
) -> NormalizedSheet {
    let report_date = layout.report_date(grid);
    let columns = ColumnIndex::from_header(grid.row(layout.header_row));

    let Some(zone_col) = columns.get(cols::CHAMP_ZONE) else {
        let dropped_rows = grid
            .rows_from(layout.data_start_row)
            .filter(|row| !row.iter().all(is_blank))
            .count();
        log::warn!(
            "Sheet {} ('{}'): no zone column in header row {}, skipping {} rows",
            sheet.index,
            sheet.name,
            layout.header_row,
            dropped_rows
        );
        let warning = SheetWarning::MissingIdentityColumn {
            sheet: sheet.name.clone(),
            index: sheet.index,
            dropped_rows,
        };
        return NormalizedSheet {
            sheet,
            report_date,
            rows: Vec::new(),
            warnings: vec![warning],
        };
    };

    let mut rows = Vec::new();
    for row in grid.rows_from(layout.data_start_row) {
        let cell = |col: usize| row.get(col).unwrap_or(&EMPTY_CELL);

        // Rows without a zone are layout noise (spacers, subtotals)
        let Some(zone) = cell_text(cell(zone_col)) else {
            continue;
        };

        // Everything from the forecast marker down is planning, not history
        if layout.is_forecast_marker(&zone) {
            break;
        }

        let mut fields = ActionFields::default();
        for (name, slot) in fields.slots_mut() {
            if let Some(col) = columns.get(name) {
                *slot = cell_text(cell(col))
                    .map(|raw| normalize_text(&raw))
                    .unwrap_or_default();
            }
        }
        if fields.is_blank() {
            continue;
        }

        let flag = |name: &str| columns.get(name).is_some_and(|col| tokens.is_set(cell(col)));
        let flags = RawFlags {
            termine: flag(cols::TERMINE),
            en_cours: flag(cols::EN_COURS),
            reporte: flag(cols::REPORTE),
            indisponible: flag(cols::INDISPONIBLE),
        };

        rows.push(DailyFact::new(fields, flags, report_date, sheet.name.clone()));
    }

    let mut warnings = Vec::new();
    if report_date.is_none() && !rows.is_empty() {
        log::warn!(
            "Sheet {} ('{}'): no readable report date at row {}, column {}",
            sheet.index,
            sheet.name,
            layout.date_row,
            layout.date_col
        );
        warnings.push(SheetWarning::UnreadableDate {
            sheet: sheet.name.clone(),
            index: sheet.index,
            affected_rows: rows.len(),
        });
    }

    log::debug!(
        "Sheet {} ('{}'): {} rows, date {:?}",
        sheet.index,
        sheet.name,
        rows.len(),
        report_date
    );

    NormalizedSheet {
        sheet,
        report_date,
        rows,
        warnings,
    }
}
