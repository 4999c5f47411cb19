//! Projections of the daily and rolled tables

use super::types::{DailyFact, LatestAction, RolledAction, TableSet, TransitionEvent};

/// Last rolled row of each action; `rolled` must be grouped by key in date order
pub fn latest_actions(rolled: &[RolledAction]) -> Vec<LatestAction> {
    rolled
        .chunk_by(|a, b| a.action_key == b.action_key)
        .filter_map(|history| history.last())
        .map(LatestAction::from)
        .collect()
}

/// Latest actions split into (ended, running, postponed).
///
/// Rolled flags are exclusive, so a row lands in at most one bucket; rows with
/// no flag set land in none.
pub fn partition_latest(
    latest: &[LatestAction],
) -> (Vec<LatestAction>, Vec<LatestAction>, Vec<LatestAction>) {
    let pick = |keep: fn(&LatestAction) -> bool| -> Vec<LatestAction> {
        latest.iter().filter(|a| keep(*a)).cloned().collect()
    };
    (
        pick(|a| a.status.termine),
        pick(|a| !a.status.termine && a.status.en_cours),
        pick(|a| !a.status.termine && a.status.reporte),
    )
}

/// Every daily occurrence flagged unavailable, neither merged nor rolled
pub fn equipment_downtime(daily: &[DailyFact]) -> Vec<DailyFact> {
    daily
        .iter()
        .filter(|f| f.flags.indisponible)
        .cloned()
        .collect()
}

/// Assemble the published table set
pub fn materialize(
    daily: Vec<DailyFact>,
    rolled: Vec<RolledAction>,
    transitions: Vec<TransitionEvent>,
) -> TableSet {
    let actions_latest = latest_actions(&rolled);
    let (ended_actions, running_actions, postponed_actions) = partition_latest(&actions_latest);
    let equipment_downtime = equipment_downtime(&daily);

    TableSet {
        actions_daily: daily,
        actions_consistent: rolled,
        actions_latest,
        ended_actions,
        running_actions,
        postponed_actions,
        equipment_downtime,
        transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::rollup::roll_up;
    use crate::report::types::{ActionFields, RawFlags};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn fact(desc: &str, d: u32, flags: RawFlags) -> DailyFact {
        DailyFact::new(
            ActionFields {
                champ_zone: "Z1".to_string(),
                travaux_commentaires: desc.to_string(),
                ..Default::default()
            },
            flags,
            NaiveDate::from_ymd_opt(2023, 1, d),
            format!("S{}", d),
        )
    }

    fn flags(termine: bool, en_cours: bool, reporte: bool, indisponible: bool) -> RawFlags {
        RawFlags {
            termine,
            en_cours,
            reporte,
            indisponible,
        }
    }

    #[test]
    fn test_latest_picks_last_date_per_key() {
        let daily = vec![
            fact("A", 2, flags(false, true, false, false)),
            fact("B", 1, flags(false, false, true, false)),
            fact("A", 1, flags(false, false, false, false)),
        ];
        let latest = latest_actions(&roll_up(&daily));

        assert_eq!(latest.len(), 2);
        let a = latest
            .iter()
            .find(|l| l.fields.travaux_commentaires == "A")
            .unwrap();
        assert_eq!(a.date_rapport, NaiveDate::from_ymd_opt(2023, 1, 2));
        assert!(a.status.en_cours);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let daily = vec![
            fact("done", 1, flags(true, false, false, false)),
            fact("running", 1, flags(false, true, false, false)),
            fact("postponed", 1, flags(false, false, true, false)),
            fact("both", 1, flags(false, true, true, false)),
            fact("idle", 1, flags(false, false, false, false)),
        ];
        let latest = latest_actions(&roll_up(&daily));
        let (ended, running, postponed) = partition_latest(&latest);

        assert_eq!(ended.len(), 1);
        assert_eq!(running.len(), 2);
        assert_eq!(postponed.len(), 1);

        let mut seen = HashSet::new();
        for row in ended.iter().chain(&running).chain(&postponed) {
            assert!(seen.insert(row.action_key.clone()), "row in two partitions");
        }
        assert_eq!(seen.len(), latest.len() - 1);
    }

    #[test]
    fn test_downtime_counts_each_occurrence() {
        let daily = vec![
            fact("A", 1, flags(false, true, false, true)),
            fact("B", 2, flags(false, true, false, false)),
            fact("A", 3, flags(false, true, false, true)),
        ];
        let downtime = equipment_downtime(&daily);

        assert_eq!(downtime.len(), 2);
        assert_eq!(downtime[0].feuille, "S1");
        assert_eq!(downtime[1].feuille, "S3");
    }

    #[test]
    fn test_materialize_keeps_daily_unmodified() {
        let daily = vec![
            fact("A", 1, flags(true, false, false, false)),
            fact("A", 2, flags(false, true, false, false)),
        ];
        let rolled = roll_up(&daily);
        let tables = materialize(daily.clone(), rolled, Vec::new());

        assert_eq!(tables.actions_daily, daily);
        assert!(tables.actions_daily[1].flags.en_cours);
        assert!(tables.actions_consistent[1].status.termine);
        assert_eq!(tables.ended_actions.len(), 1);
        assert!(tables.running_actions.is_empty());
    }
}
