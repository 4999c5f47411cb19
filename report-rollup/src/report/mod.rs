//! Daily status report consolidation
//!
//! Turns a workbook of daily report sheets into a longitudinal action
//! history: normalized daily facts, a monotone consolidated timeline, status
//! transitions and the derived snapshot views.

pub mod error;
pub mod excel;
pub mod key;
pub mod pipeline;
pub mod rollup;
pub mod text;
pub mod transitions;
pub mod types;
pub mod views;

pub use error::{PipelineError, SheetWarning};
pub use key::ActionKey;
pub use pipeline::{PipelineOptions, RunOutput, SheetInfo, SheetRange, build_tables, list_sheets};
pub use transitions::TransitionOptions;
pub use types::*;
