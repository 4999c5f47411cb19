//! Core types for consolidated report tables

mod row;
mod status;
mod tables;

pub use row::{ActionFields, DailyFact, RawFlags, cols};
pub use status::{FlagChange, LatestAction, RolledAction, StatusFlag, StatusFlags, TransitionEvent};
pub use tables::{TableName, TableRow, TableSet};
