//! Publishing a run as delimited files plus a manifest

mod manifest;

pub use manifest::{MANIFEST_FILE, Manifest, RunMeta};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{RunOutput, TableName, TableRow, TableSet};

/// File a table is published to inside the output directory
pub fn table_path(dir: &Path, table: TableName) -> PathBuf {
    dir.join(format!("{}.csv", table.as_str()))
}

/// Write one table with its header, even when it has no rows
pub fn write_table<R: TableRow>(path: &Path, rows: &[R], delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(R::columns())
        .context("Failed to write CSV header")?;
    for row in rows {
        wtr.write_record(row.cells())
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Write every table of the set; returns the written paths in publication order
pub fn write_tables(dir: &Path, tables: &TableSet, delimiter: u8) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(TableName::ALL.len());
    for table in TableName::ALL {
        let path = table_path(dir, table);
        match table {
            TableName::ActionsDaily => write_table(&path, &tables.actions_daily, delimiter)?,
            TableName::ActionsConsistent => {
                write_table(&path, &tables.actions_consistent, delimiter)?
            }
            TableName::ActionsLatest => write_table(&path, &tables.actions_latest, delimiter)?,
            TableName::EndedActions => write_table(&path, &tables.ended_actions, delimiter)?,
            TableName::RunningActions => write_table(&path, &tables.running_actions, delimiter)?,
            TableName::PostponedActions => {
                write_table(&path, &tables.postponed_actions, delimiter)?
            }
            TableName::EquipmentDowntime => {
                write_table(&path, &tables.equipment_downtime, delimiter)?
            }
            TableName::Transitions => write_table(&path, &tables.transitions, delimiter)?,
        }
        log::debug!("Wrote {} ({} rows)", path.display(), tables.row_count(table));
        written.push(path);
    }
    Ok(written)
}

/// Publish a run: tables first, manifest last
pub fn publish(
    dir: &Path,
    source: &str,
    config_sha1: &str,
    run: &RunOutput,
    delimiter: u8,
) -> Result<Manifest> {
    write_tables(dir, &run.tables, delimiter)?;
    let manifest = Manifest::from_run(source, config_sha1, run);
    manifest.write(dir)?;
    Ok(manifest)
}

/// Manifest of a previous run over the same bytes, settings and range whose
/// tables are all still present
pub fn up_to_date(
    dir: &Path,
    source_sha1: &str,
    config_sha1: &str,
    start_sheet: usize,
    end_sheet: usize,
) -> Result<Option<Manifest>> {
    let Some(manifest) = Manifest::read(dir)? else {
        return Ok(None);
    };
    let complete = TableName::ALL
        .iter()
        .all(|table| table_path(dir, *table).exists());

    let same_run = manifest.matches(source_sha1, config_sha1, start_sheet, end_sheet);
    Ok((complete && same_run).then_some(manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::excel::fixtures::{
        DONE, DateCell, DaySheet, RUNNING, action_row, build_workbook,
    };
    use crate::report::{PipelineOptions, SheetRange, build_tables};
    use uuid::Uuid;

    fn temp_output_dir() -> PathBuf {
        std::env::temp_dir().join(format!("report-rollup-{}", Uuid::new_v4()))
    }

    fn sample_run() -> RunOutput {
        let bytes = build_workbook(&[
            DaySheet::new(
                "S1",
                DateCell::Date(2023, 1, 1),
                vec![action_row("Z1", "TAG1", "Pump; inspection", RUNNING)],
            ),
            DaySheet::new(
                "S2",
                DateCell::Date(2023, 1, 2),
                vec![action_row("Z1", "TAG1", "Pump; inspection", DONE)],
            ),
        ]);
        build_tables(&bytes, SheetRange::all(), &PipelineOptions::default()).unwrap()
    }

    #[test]
    fn test_publish_writes_every_table_and_manifest() {
        let dir = temp_output_dir();
        let run = sample_run();
        let manifest = publish(&dir, "daily.xlsx", "cfg1", &run, b';').unwrap();

        for table in TableName::ALL {
            assert!(table_path(&dir, table).exists(), "missing {}", table);
        }
        assert!(dir.join(MANIFEST_FILE).exists());
        assert_eq!(manifest.counts["transitions"], 1);
        assert_eq!(
            manifest.meta.date_max,
            chrono::NaiveDate::from_ymd_opt(2023, 1, 2)
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_csv_uses_delimiter_and_quotes_fields() {
        let dir = temp_output_dir();
        let run = sample_run();
        write_tables(&dir, &run.tables, b';').unwrap();

        let text = fs::read_to_string(table_path(&dir, TableName::Transitions)).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("action_key;date_rapport;termine;en_cours;reporte;change_desc")
        );
        let row = lines.next().unwrap();
        assert!(row.contains(";2023-01-02;true;false;false;"));
        assert!(row.ends_with("\"en_cours: true -> false; termine: false -> true\""));

        let daily = fs::read_to_string(table_path(&dir, TableName::ActionsDaily)).unwrap();
        assert!(daily.contains("\"Pump; inspection\""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let dir = temp_output_dir();
        write_tables(&dir, &TableSet::default(), b',').unwrap();

        let text = fs::read_to_string(table_path(&dir, TableName::PostponedActions)).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("action_key,date_rapport,"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_up_to_date_requires_same_source_settings_and_range() {
        let dir = temp_output_dir();
        let run = sample_run();

        assert!(up_to_date(&dir, &run.source_sha1, "cfg1", 1, 2).unwrap().is_none());

        publish(&dir, "daily.xlsx", "cfg1", &run, b';').unwrap();
        assert!(up_to_date(&dir, &run.source_sha1, "cfg1", 1, 2).unwrap().is_some());
        assert!(up_to_date(&dir, &run.source_sha1, "cfg1", 2, 2).unwrap().is_none());
        assert!(up_to_date(&dir, &run.source_sha1, "cfg2", 1, 2).unwrap().is_none());
        assert!(up_to_date(&dir, "0000", "cfg1", 1, 2).unwrap().is_none());

        // A missing table forces a rebuild
        fs::remove_file(table_path(&dir, TableName::ActionsLatest)).unwrap();
        assert!(up_to_date(&dir, &run.source_sha1, "cfg1", 1, 2).unwrap().is_none());

        fs::remove_dir_all(&dir).unwrap();
    }
}
