//! Consolidated status flags and the rows derived from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::row::{ActionFields, DailyFact};
use crate::report::key::ActionKey;

/// One of the three lifecycle flags tracked by the rollup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    EnCours,
    Reporte,
    Termine,
}

impl StatusFlag {
    /// Order in which flips are described in a transition
    pub const DESCRIBE_ORDER: [StatusFlag; 3] =
        [StatusFlag::EnCours, StatusFlag::Reporte, StatusFlag::Termine];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFlag::EnCours => "en_cours",
            StatusFlag::Reporte => "reporte",
            StatusFlag::Termine => "termine",
        }
    }
}

impl std::fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consolidated flags for one action on one day. At most one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub termine: bool,
    pub en_cours: bool,
    pub reporte: bool,
}

impl StatusFlags {
    pub fn get(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::EnCours => self.en_cours,
            StatusFlag::Reporte => self.reporte,
            StatusFlag::Termine => self.termine,
        }
    }

    /// Number of flags set; never more than one for rolled rows
    pub fn set_count(&self) -> usize {
        [self.termine, self.en_cours, self.reporte]
            .iter()
            .filter(|b| **b)
            .count()
    }

    /// Flags that differ from `previous`, in description order
    pub fn changes_since(&self, previous: &StatusFlags) -> Vec<FlagChange> {
        StatusFlag::DESCRIBE_ORDER
            .iter()
            .filter(|flag| self.get(**flag) != previous.get(**flag))
            .map(|flag| FlagChange {
                flag: *flag,
                before: previous.get(*flag),
                after: self.get(*flag),
            })
            .collect()
    }
}

/// A daily row with its consolidated (rolled-up) status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolledAction {
    pub action_key: ActionKey,
    pub date_rapport: Option<NaiveDate>,
    #[serde(flatten)]
    pub fields: ActionFields,
    #[serde(flatten)]
    pub status: StatusFlags,
    pub indisponible: bool,
    pub feuille: String,
}

impl RolledAction {
    pub fn from_fact(fact: &DailyFact, status: StatusFlags) -> Self {
        Self {
            action_key: fact.action_key.clone(),
            date_rapport: fact.date_rapport,
            fields: fact.fields.clone(),
            status,
            indisponible: fact.flags.indisponible,
            feuille: fact.feuille.clone(),
        }
    }
}

/// Latest consolidated state of an action (one row per key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestAction {
    pub action_key: ActionKey,
    pub date_rapport: Option<NaiveDate>,
    #[serde(flatten)]
    pub fields: ActionFields,
    #[serde(flatten)]
    pub status: StatusFlags,
}

impl From<&RolledAction> for LatestAction {
    fn from(rolled: &RolledAction) -> Self {
        Self {
            action_key: rolled.action_key.clone(),
            date_rapport: rolled.date_rapport,
            fields: rolled.fields.clone(),
            status: rolled.status,
        }
    }
}

/// A single flag flip inside a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagChange {
    pub flag: StatusFlag,
    pub before: bool,
    pub after: bool,
}

impl std::fmt::Display for FlagChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.flag, self.before, self.after)
    }
}

/// A day on which an action's consolidated status changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub action_key: ActionKey,
    pub date_rapport: Option<NaiveDate>,
    /// Flags after the change
    #[serde(flatten)]
    pub status: StatusFlags,
    pub changes: Vec<FlagChange>,
}

impl TransitionEvent {
    /// Human readable summary, e.g. `en_cours: true -> false; termine: false -> true`
    pub fn description(&self) -> String {
        self.changes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
