//! In-memory workbook access with absolute cell coordinates

use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::report::error::PipelineError;

/// Day zero of the Excel 1900 date system (accounts for the 1900 leap-year bug)
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial Excel can represent (9999-12-31)
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Shared stand-in for cells outside the used range
pub(crate) static EMPTY_CELL: Data = Data::Empty;

/// Text date layouts accepted in the date cell, day first
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// A workbook decoded from bytes held by the caller.
///
/// Decoding happens over a cursor on the borrowed bytes; nothing touches disk.
pub struct ReportWorkbook<'a> {
    sheets: Sheets<Cursor<&'a [u8]>>,
    names: Vec<String>,
}

impl<'a> ReportWorkbook<'a> {
    /// Open any format calamine recognises (xlsx, xlsm, xlsb, xls, ods)
    pub fn open(bytes: &'a [u8]) -> Result<Self, PipelineError> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let names = sheets.sheet_names().to_vec();
        Ok(Self { sheets, names })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    pub fn sheet_count(&self) -> usize {
        self.names.len()
    }

    /// Read the sheet at a 0-based position
    pub fn grid(&mut self, position: usize) -> Result<SheetGrid, PipelineError> {
        let name = self
            .names
            .get(position)
            .cloned()
            .ok_or(PipelineError::InvalidRange {
                start: position + 1,
                end: position + 1,
                total: self.names.len(),
            })?;

        let range = self
            .sheets
            .worksheet_range(&name)
            .map_err(|source| PipelineError::Sheet {
                name: name.clone(),
                source,
            })?;

        Ok(SheetGrid::from_range(&range))
    }
}

/// Sheet cells addressed from A1, regardless of where the used range starts
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    rows: Vec<Vec<Data>>,
}

impl SheetGrid {
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((end_row, end_col)) = range.end() else {
            return Self::default();
        };

        let rows = (0..=end_row)
            .map(|r| {
                (0..=end_col)
                    .map(|c| range.get_value((r, c)).cloned().unwrap_or(Data::Empty))
                    .collect()
            })
            .collect();

        Self { rows }
    }

    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<Data>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Data {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> &[Data] {
        self.rows.get(row).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Rows from `start` to the end of the sheet
    pub fn rows_from(&self, start: usize) -> impl Iterator<Item = &[Data]> {
        self.rows.iter().skip(start).map(|r| r.as_slice())
    }
}

/// True for cells pandas-style readers would treat as missing
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render a cell as text; `None` for empty cells
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            serial_to_date(dt.as_f64())
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| dt.as_f64().to_string()),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Interpret a cell as a calendar date
pub fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::Float(f) => serial_to_date(*f),
        Data::Int(i) => serial_to_date(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        _ => None,
    }
}

/// Convert an Excel serial day number to a date, dropping the time of day
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parse a text date cell. Slashed dates are read day-first, so "02/01/2023"
/// is 2 January, not the month-first 1 February a pandas-style reader infers.
fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}
