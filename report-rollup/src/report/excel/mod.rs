//! Reading daily report sheets from a workbook
//!
//! Layout convention (0-based, per sheet):
//! - report date in a single cell (default row 2, column 8)
//! - header row (default row 4), renamed through a synonym table
//! - data rows from the row after the header to the end of the sheet,
//!   cut at the forecast marker row

mod columns;
mod sheet;
mod workbook;

#[cfg(test)]
pub(crate) mod fixtures;

pub use columns::{ColumnIndex, FlagTokens, canonical_column};
pub use sheet::{NormalizedSheet, SheetLayout, SheetRef, normalize_sheet};
pub use workbook::{ReportWorkbook, SheetGrid, cell_date, cell_text};
