//! The named output tables of a run and their column layouts

use chrono::NaiveDate;

use super::row::{ActionFields, DailyFact, cols};
use super::status::{LatestAction, RolledAction, TransitionEvent};

/// Names of the tables produced by a run, in publication order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    ActionsDaily,
    ActionsConsistent,
    ActionsLatest,
    EndedActions,
    RunningActions,
    PostponedActions,
    EquipmentDowntime,
    Transitions,
}

impl TableName {
    pub const ALL: [TableName; 8] = [
        TableName::ActionsDaily,
        TableName::ActionsConsistent,
        TableName::ActionsLatest,
        TableName::EndedActions,
        TableName::RunningActions,
        TableName::PostponedActions,
        TableName::EquipmentDowntime,
        TableName::Transitions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::ActionsDaily => "actions_daily",
            TableName::ActionsConsistent => "actions_consistent",
            TableName::ActionsLatest => "actions_latest",
            TableName::EndedActions => "ended_actions",
            TableName::RunningActions => "running_actions",
            TableName::PostponedActions => "postponed_actions",
            TableName::EquipmentDowntime => "equipment_downtime",
            TableName::Transitions => "transitions",
        }
    }

    pub fn parse(name: &str) -> Option<TableName> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row that can be written as one line of a delimited table
pub trait TableRow {
    /// Header, in output order
    fn columns() -> Vec<&'static str>;
    /// Cell values aligned with [`TableRow::columns`]
    fn cells(&self) -> Vec<String>;
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn push_fields(cells: &mut Vec<String>, fields: &ActionFields) {
    cells.extend(fields.values().iter().map(|v| v.to_string()));
}

fn fact_columns() -> Vec<&'static str> {
    let mut columns = vec![cols::ACTION_KEY, cols::DATE_RAPPORT];
    columns.extend(ActionFields::COLUMNS);
    columns.extend([
        cols::TERMINE,
        cols::EN_COURS,
        cols::REPORTE,
        cols::INDISPONIBLE,
        cols::FEUILLE,
    ]);
    columns
}

impl TableRow for DailyFact {
    fn columns() -> Vec<&'static str> {
        fact_columns()
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.action_key.to_string(), format_date(self.date_rapport)];
        push_fields(&mut cells, &self.fields);
        cells.extend([
            self.flags.termine.to_string(),
            self.flags.en_cours.to_string(),
            self.flags.reporte.to_string(),
            self.flags.indisponible.to_string(),
            self.feuille.clone(),
        ]);
        cells
    }
}

// Same shape as the daily table; the flag columns hold the rolled values
impl TableRow for RolledAction {
    fn columns() -> Vec<&'static str> {
        fact_columns()
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.action_key.to_string(), format_date(self.date_rapport)];
        push_fields(&mut cells, &self.fields);
        cells.extend([
            self.status.termine.to_string(),
            self.status.en_cours.to_string(),
            self.status.reporte.to_string(),
            self.indisponible.to_string(),
            self.feuille.clone(),
        ]);
        cells
    }
}

impl TableRow for LatestAction {
    fn columns() -> Vec<&'static str> {
        let mut columns = vec![cols::ACTION_KEY, cols::DATE_RAPPORT];
        columns.extend(ActionFields::COLUMNS);
        columns.extend([cols::TERMINE, cols::EN_COURS, cols::REPORTE]);
        columns
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.action_key.to_string(), format_date(self.date_rapport)];
        push_fields(&mut cells, &self.fields);
        cells.extend([
            self.status.termine.to_string(),
            self.status.en_cours.to_string(),
            self.status.reporte.to_string(),
        ]);
        cells
    }
}

impl TableRow for TransitionEvent {
    fn columns() -> Vec<&'static str> {
        vec![
            cols::ACTION_KEY,
            cols::DATE_RAPPORT,
            cols::TERMINE,
            cols::EN_COURS,
            cols::REPORTE,
            cols::CHANGE_DESC,
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.action_key.to_string(),
            format_date(self.date_rapport),
            self.status.termine.to_string(),
            self.status.en_cours.to_string(),
            self.status.reporte.to_string(),
            self.description(),
        ]
    }
}

/// All tables produced by one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet {
    pub actions_daily: Vec<DailyFact>,
    pub actions_consistent: Vec<RolledAction>,
    pub actions_latest: Vec<LatestAction>,
    pub ended_actions: Vec<LatestAction>,
    pub running_actions: Vec<LatestAction>,
    pub postponed_actions: Vec<LatestAction>,
    pub equipment_downtime: Vec<DailyFact>,
    pub transitions: Vec<TransitionEvent>,
}

impl TableSet {
    /// Number of rows in a table
    pub fn row_count(&self, table: TableName) -> usize {
        match table {
            TableName::ActionsDaily => self.actions_daily.len(),
            TableName::ActionsConsistent => self.actions_consistent.len(),
            TableName::ActionsLatest => self.actions_latest.len(),
            TableName::EndedActions => self.ended_actions.len(),
            TableName::RunningActions => self.running_actions.len(),
            TableName::PostponedActions => self.postponed_actions.len(),
            TableName::EquipmentDowntime => self.equipment_downtime.len(),
            TableName::Transitions => self.transitions.len(),
        }
    }

    /// Row counts for every table, in publication order
    pub fn counts(&self) -> Vec<(TableName, usize)> {
        TableName::ALL
            .iter()
            .map(|t| (*t, self.row_count(*t)))
            .collect()
    }

    /// Earliest and latest report date of the daily table
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.actions_daily.iter().filter_map(|f| f.date_rapport);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Daily rows whose sheet had no readable report date
    pub fn rows_without_date(&self) -> usize {
        self.actions_daily
            .iter()
            .filter(|f| f.date_rapport.is_none())
            .count()
    }
}
