pub mod build;
pub mod sheets;

pub use build::BuildArgs;
pub use sheets::SheetsArgs;

use anyhow::{Context, Result};
use std::path::Path;

/// Read a workbook file into memory
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("Workbook does not exist: {}", path.display());
    }
    std::fs::read(path).with_context(|| format!("Failed to read workbook: {}", path.display()))
}
