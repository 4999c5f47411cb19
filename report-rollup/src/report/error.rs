//! Run-level errors and per-sheet warnings

use serde::{Deserialize, Serialize};

/// Failure that aborts a whole run; no tables are produced
#[derive(Debug)]
pub enum PipelineError {
    /// Requested sheet range does not fit the workbook
    InvalidRange {
        start: usize,
        end: usize,
        total: usize,
    },
    /// No row survived normalization in the requested range
    NoUsableRows,
    /// Rows were found but none of their sheets had a readable report date
    NoReportDates,
    /// The workbook bytes could not be decoded
    Workbook(calamine::Error),
    /// A sheet listed by the workbook could not be read
    Sheet {
        name: String,
        source: calamine::Error,
    },
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::InvalidRange { start, end, total } => {
                if end < start {
                    write!(
                        f,
                        "Invalid sheet range ({}-{}): the end sheet must not come before the start sheet",
                        start, end
                    )
                } else {
                    write!(
                        f,
                        "Invalid sheet range ({}-{}) for {} available sheets",
                        start, end, total
                    )
                }
            }
            PipelineError::NoUsableRows => {
                write!(f, "No usable rows in the selected sheet range")
            }
            PipelineError::NoReportDates => write!(
                f,
                "No report date found in the selected sheets (date_rapport is empty for every row)"
            ),
            PipelineError::Workbook(err) => write!(f, "Failed to read workbook: {}", err),
            PipelineError::Sheet { name, source } => {
                write!(f, "Failed to read sheet '{}': {}", name, source)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Workbook(err) => Some(err),
            PipelineError::Sheet { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<calamine::Error> for PipelineError {
    fn from(err: calamine::Error) -> Self {
        PipelineError::Workbook(err)
    }
}

/// Non-fatal anomaly found while normalizing a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SheetWarning {
    /// The header has no zone column, so the whole sheet was skipped
    MissingIdentityColumn {
        sheet: String,
        /// 1-based sheet index
        index: usize,
        dropped_rows: usize,
    },
    /// The report date cell was empty or unreadable; rows were kept undated
    UnreadableDate {
        sheet: String,
        index: usize,
        affected_rows: usize,
    },
}

impl SheetWarning {
    /// Number of rows dropped or degraded by this anomaly
    pub fn affected_rows(&self) -> usize {
        match self {
            SheetWarning::MissingIdentityColumn { dropped_rows, .. } => *dropped_rows,
            SheetWarning::UnreadableDate { affected_rows, .. } => *affected_rows,
        }
    }
}

impl std::fmt::Display for SheetWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetWarning::MissingIdentityColumn {
                sheet,
                index,
                dropped_rows,
            } => write!(
                f,
                "Sheet {} ('{}') has no zone column; {} rows skipped",
                index, sheet, dropped_rows
            ),
            SheetWarning::UnreadableDate {
                sheet,
                index,
                affected_rows,
            } => write!(
                f,
                "Sheet {} ('{}') has no readable report date; {} rows kept without date",
                index, sheet, affected_rows
            ),
        }
    }
}
