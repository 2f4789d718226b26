use std::collections::BTreeMap;

use eff_core::errors::{EffError, ErrorInfo};
use eff_core::{SubjectId, VisitIndex};
use serde::{Deserialize, Deserializer, Serialize};

/// One subject of the analysis population (ADSL, already filtered by the loader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRow {
    /// Unique subject identifier.
    #[serde(rename = "USUBJID")]
    pub usubjid: SubjectId,
    /// Planned treatment label.
    #[serde(rename = "TRTP", alias = "TRT01P")]
    pub trtp: String,
}

/// Subject-level population table keyed by subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PopulationTable {
    subjects: BTreeMap<SubjectId, String>,
}

impl PopulationTable {
    /// Builds the table, rejecting duplicate subject identifiers.
    pub fn from_rows(rows: impl IntoIterator<Item = PopulationRow>) -> Result<Self, EffError> {
        let mut subjects = BTreeMap::new();
        for row in rows {
            if subjects.contains_key(&row.usubjid) {
                return Err(EffError::MissingData(
                    ErrorInfo::new(
                        "duplicate-subject",
                        "population table must hold one row per subject",
                    )
                    .with_context("usubjid", row.usubjid),
                ));
            }
            subjects.insert(row.usubjid, row.trtp);
        }
        Ok(Self { subjects })
    }

    /// Treatment label of `usubjid`, if the subject is in the population.
    pub fn treatment(&self, usubjid: &str) -> Option<&str> {
        self.subjects.get(usubjid).map(String::as_str)
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Iterates over `(usubjid, treatment)` in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.subjects
            .iter()
            .map(|(id, trt)| (id.as_str(), trt.as_str()))
    }
}

/// One subject-visit-parameter measurement (ADLBC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabRow {
    /// Subject identifier.
    #[serde(rename = "USUBJID")]
    pub usubjid: SubjectId,
    /// Parameter code, e.g. `GLUC`.
    #[serde(rename = "PARAMCD")]
    pub paramcd: String,
    /// Analysis visit index in weeks; 0 is the baseline visit.
    #[serde(rename = "AVISITN", deserialize_with = "deserialize_visit")]
    pub avisitn: VisitIndex,
    /// Study baseline value recorded on the row.
    #[serde(rename = "BASE")]
    pub base: Option<f64>,
    /// Observed analysis value.
    #[serde(rename = "AVAL")]
    pub aval: Option<f64>,
}

/// Longitudinal lab table in source row order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LabTable {
    rows: Vec<LabRow>,
}

impl LabTable {
    /// Wraps rows without reordering them.
    pub fn from_rows(rows: impl IntoIterator<Item = LabRow>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[LabRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// Visit indices are exported as floats by some ADaM tooling ("24.0").
fn deserialize_visit<'de, D>(deserializer: D) -> Result<VisitIndex, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "visit index must be integral, got {raw}"
        )));
    }
    Ok(raw as VisitIndex)
}
