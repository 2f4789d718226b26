use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use eff_core::errors::{EffError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Presentation table of display strings. Row order is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names.
    pub columns: Vec<String>,
    /// Rows with one cell per column.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given schema.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Cell at `row` under column `column`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|name| name == column)?;
        self.rows.get(row).map(|cells| cells[idx].as_str())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn wrap_csv(code: &str, path: &Path, err: impl ToString) -> EffError {
    EffError::Io(
        ErrorInfo::new(code, "failed to write table")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

/// Writes the table as CSV with a header row, creating parent directories.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), EffError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| wrap_csv("table-dir", path, err))?;
        }
    }
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| wrap_csv("table-open", path, err))?;
    writer
        .write_record(&table.columns)
        .map_err(|err| wrap_csv("table-write", path, err))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|err| wrap_csv("table-write", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_csv("table-flush", path, err))
}
