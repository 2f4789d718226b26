//! Dataset discovery and CSV readers for the ADaM inputs.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use eff_core::errors::{EffError, ErrorInfo};
use eff_locf::{LabRow, LabTable, PopulationRow, PopulationTable};
use tracing::info;

/// Marker file identifying the study project root.
pub const PROJECT_MARKER: &str = "study.yaml";

const LAB_COLUMNS: [&str; 5] = ["USUBJID", "PARAMCD", "AVISITN", "BASE", "AVAL"];

fn io_error(code: &str, message: &str, path: &Path, err: impl ToString) -> EffError {
    EffError::Io(
        ErrorInfo::new(code, message)
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

fn missing_column(path: &Path, column: &str) -> EffError {
    EffError::MissingData(
        ErrorInfo::new("missing-column", format!("required column {column} is absent"))
            .with_context("path", path.display().to_string())
            .with_context("column", column),
    )
}

/// Walks from `start` towards the filesystem root and returns the first
/// directory containing `marker`.
pub fn find_project_root(start: &Path, marker: &str) -> Result<PathBuf, EffError> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(marker).is_file() {
            return Ok(dir.to_path_buf());
        }
        current = dir.parent();
    }
    Err(EffError::Io(
        ErrorInfo::new(
            "project-root",
            format!("could not find {marker} in any parent directory"),
        )
        .with_context("start", start.display().to_string())
        .with_hint("pass --root or the dataset paths explicitly"),
    ))
}

/// Location of an ADaM dataset below the project root: `data/<name>.csv`.
pub fn dataset_path(root: &Path, name: &str) -> PathBuf {
    root.join("data")
        .join(format!("{}.csv", name.to_lowercase()))
}

fn open_reader(path: &Path) -> Result<(csv::Reader<File>, StringRecord), EffError> {
    if !path.exists() {
        return Err(io_error(
            "dataset-missing",
            "dataset not found",
            path,
            "file does not exist",
        ));
    }
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| io_error("dataset-open", "failed to open dataset", path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| io_error("dataset-header", "failed to read header", path, err))?
        .clone();
    Ok((reader, headers))
}

fn column_index(headers: &StringRecord, path: &Path, names: &[&str]) -> Result<usize, EffError> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|header| header == *name))
        .ok_or_else(|| missing_column(path, names[0]))
}

/// Reads ADSL and keeps subjects whose `flag` column equals `Y`.
pub fn load_population(path: &Path, flag: &str) -> Result<PopulationTable, EffError> {
    let (mut reader, headers) = open_reader(path)?;
    let id_idx = column_index(&headers, path, &["USUBJID"])?;
    let trt_idx = column_index(&headers, path, &["TRT01P", "TRTP"])?;
    let flag_idx = column_index(&headers, path, &[flag])?;

    let mut rows = Vec::new();
    let mut total = 0usize;
    for record in reader.records() {
        let record =
            record.map_err(|err| io_error("dataset-row", "failed to read ADSL row", path, err))?;
        total += 1;
        if record.get(flag_idx) != Some("Y") {
            continue;
        }
        rows.push(PopulationRow {
            usubjid: record.get(id_idx).unwrap_or_default().to_string(),
            trtp: record.get(trt_idx).unwrap_or_default().to_string(),
        });
    }
    info!(path = %path.display(), flag, total, kept = rows.len(), "loaded population");
    PopulationTable::from_rows(rows)
}

/// Reads ADLBC; blank `BASE`/`AVAL` cells are missing values.
pub fn load_lab(path: &Path) -> Result<LabTable, EffError> {
    let (mut reader, headers) = open_reader(path)?;
    for column in LAB_COLUMNS {
        column_index(&headers, path, &[column])?;
    }
    let mut rows = Vec::new();
    for (line, row) in reader.deserialize::<LabRow>().enumerate() {
        let row = row.map_err(|err| {
            EffError::Serde(
                ErrorInfo::new("lab-row", "failed to decode ADLBC row")
                    .with_context("path", path.display().to_string())
                    .with_context("row", (line + 1).to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        rows.push(row);
    }
    info!(path = %path.display(), rows = rows.len(), "loaded lab measurements");
    Ok(LabTable::from_rows(rows))
}

/// Explicit dataset locations, falling back to the project layout.
#[derive(Debug, Clone, Default)]
pub struct DatasetPaths {
    /// Project root; discovered from the working directory when absent.
    pub root: Option<PathBuf>,
    /// ADSL override.
    pub population: Option<PathBuf>,
    /// ADLBC override.
    pub lab: Option<PathBuf>,
}

impl DatasetPaths {
    /// Resolves both dataset paths, discovering the root only when needed.
    pub fn resolve(&self) -> Result<(PathBuf, PathBuf), EffError> {
        if let (Some(population), Some(lab)) = (&self.population, &self.lab) {
            return Ok((population.clone(), lab.clone()));
        }
        let root = match &self.root {
            Some(root) => root.clone(),
            None => {
                let cwd = std::env::current_dir().map_err(|err| {
                    io_error("cwd", "cannot read working directory", Path::new("."), err)
                })?;
                find_project_root(&cwd, PROJECT_MARKER)?
            }
        };
        Ok((
            self.population
                .clone()
                .unwrap_or_else(|| dataset_path(&root, "adsl")),
            self.lab
                .clone()
                .unwrap_or_else(|| dataset_path(&root, "adlbc")),
        ))
    }

    /// Loads both tables.
    pub fn load(&self, flag: &str) -> Result<(PopulationTable, LabTable), EffError> {
        let (population, lab) = self.resolve()?;
        Ok((load_population(&population, flag)?, load_lab(&lab)?))
    }
}
