//! Run manifest written next to the published tables

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::report::{RunOutput, SheetWarning};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Provenance of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Workbook file name as given by the caller
    pub source: String,
    pub source_sha1: String,
    /// Fingerprint of the settings the tables were built with
    #[serde(default)]
    pub config_sha1: String,
    pub start_sheet: usize,
    pub end_sheet: usize,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    /// Daily rows with no report date
    #[serde(default)]
    pub rows_without_date: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub meta: RunMeta,
    pub counts: BTreeMap<String, usize>,
    #[serde(default)]
    pub warnings: Vec<SheetWarning>,
}

impl Manifest {
    /// Describe a finished run
    pub fn from_run(source: &str, config_sha1: &str, run: &RunOutput) -> Self {
        let bounds = run.tables.date_bounds();
        Self {
            meta: RunMeta {
                run_id: Uuid::new_v4(),
                generated_at: Utc::now(),
                source: source.to_string(),
                source_sha1: run.source_sha1.clone(),
                config_sha1: config_sha1.to_string(),
                start_sheet: run.start_sheet,
                end_sheet: run.end_sheet,
                date_min: bounds.map(|(lo, _)| lo),
                date_max: bounds.map(|(_, hi)| hi),
                rows_without_date: run.tables.rows_without_date(),
            },
            counts: run
                .tables
                .counts()
                .into_iter()
                .map(|(table, rows)| (table.as_str().to_string(), rows))
                .collect(),
            warnings: run.warnings.clone(),
        }
    }

    /// Whether this manifest was produced from the same bytes, settings and range
    pub fn matches(
        &self,
        source_sha1: &str,
        config_sha1: &str,
        start_sheet: usize,
        end_sheet: usize,
    ) -> bool {
        self.meta.source_sha1 == source_sha1
            && self.meta.config_sha1 == config_sha1
            && self.meta.start_sheet == start_sheet
            && self.meta.end_sheet == end_sheet
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        log::info!("Manifest written to {}", path.display());
        Ok(())
    }

    /// Read the manifest of an output directory, if there is one
    pub fn read(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest = serde_json::from_str(&json)
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;
        Ok(Some(manifest))
    }
}
