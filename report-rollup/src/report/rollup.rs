//! Temporal rollup: consolidate each action's daily flags into a monotone timeline
//!
//! Daily sheets are noisy. A finished action can be ticked "en cours" again
//! by mistake a week later. The rollup walks each action's history in date
//! order with a one-way latch on `termine`:
//!
//! - `termine` stays set from the first day it is seen
//! - `en_cours` / `reporte` carry their last observed value and are cleared
//!   once `termine` is latched
//! - `en_cours` takes precedence over `reporte` when both are ticked
//!
//! Keys never interact, so each history is rolled independently.

use std::collections::BTreeMap;

use super::key::ActionKey;
use super::types::{DailyFact, RawFlags, RolledAction, StatusFlags};

/// Status carried across one action's history
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLatch {
    termine_seen: bool,
    en_cours: bool,
    reporte: bool,
}

impl StatusLatch {
    /// Feed one day's raw flags and get the consolidated status for that day
    pub fn observe(&mut self, raw: &RawFlags) -> StatusFlags {
        self.termine_seen |= raw.termine;
        // A row always restates both flags, so the carried value is this day's
        self.en_cours = raw.en_cours;
        self.reporte = raw.reporte;
        self.current()
    }

    /// Consolidated status after the last observation
    pub fn current(&self) -> StatusFlags {
        let termine = self.termine_seen;
        let en_cours = self.en_cours && !termine;
        let reporte = self.reporte && !termine && !en_cours;
        StatusFlags {
            termine,
            en_cours,
            reporte,
        }
    }
}

/// Group daily facts by key, each group sorted by report date.
///
/// The sort is stable, so rows sharing a date keep ingestion order. Undated
/// rows sort first, which keeps a dated row last whenever one exists.
pub fn group_by_key(daily: &[DailyFact]) -> BTreeMap<&ActionKey, Vec<&DailyFact>> {
    let mut groups: BTreeMap<&ActionKey, Vec<&DailyFact>> = BTreeMap::new();
    for fact in daily {
        groups.entry(&fact.action_key).or_default().push(fact);
    }
    for history in groups.values_mut() {
        history.sort_by_key(|fact| fact.date_rapport);
    }
    groups
}

/// Roll up one action's history; `history` must already be in date order
pub fn roll_up_history(history: &[&DailyFact]) -> Vec<RolledAction> {
    let mut latch = StatusLatch::default();
    history
        .iter()
        .map(|fact| RolledAction::from_fact(fact, latch.observe(&fact.flags)))
        .collect()
}

/// Roll up the whole daily table: grouped by key, then by date
pub fn roll_up(daily: &[DailyFact]) -> Vec<RolledAction> {
    let groups = group_by_key(daily);
    log::debug!(
        "Rolling up {} actions from {} daily rows",
        groups.len(),
        daily.len()
    );

    groups
        .values()
        .flat_map(|history| roll_up_history(history))
        .collect()
}
