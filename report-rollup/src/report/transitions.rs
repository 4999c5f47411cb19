//! Change points in the consolidated timeline

use serde::{Deserialize, Serialize};

use super::types::{RolledAction, StatusFlags, TransitionEvent};

/// Options for transition extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOptions {
    /// Compare an action's first appearance against an all-clear status,
    /// so a first day already "en cours" is reported as a change
    pub include_initial: bool,
}

/// Events for one action; `history` is a single key's rolled rows in date order
pub fn history_transitions(
    history: &[RolledAction],
    options: &TransitionOptions,
) -> Vec<TransitionEvent> {
    let mut events = Vec::new();
    let mut previous: Option<StatusFlags> =
        options.include_initial.then(StatusFlags::default);

    for row in history {
        if let Some(before) = previous {
            let changes = row.status.changes_since(&before);
            if !changes.is_empty() {
                events.push(TransitionEvent {
                    action_key: row.action_key.clone(),
                    date_rapport: row.date_rapport,
                    status: row.status,
                    changes,
                });
            }
        }
        previous = Some(row.status);
    }

    events
}

/// Events for the whole rolled table, which must be grouped by key
pub fn extract_transitions(
    rolled: &[RolledAction],
    options: &TransitionOptions,
) -> Vec<TransitionEvent> {
    rolled
        .chunk_by(|a, b| a.action_key == b.action_key)
        .flat_map(|history| history_transitions(history, options))
        .collect()
}
