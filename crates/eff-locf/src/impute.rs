use std::collections::BTreeMap;

use eff_core::{SubjectId, VisitIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::tables::{LabRow, LabTable, PopulationTable};

fn default_param() -> String {
    "GLUC".to_string()
}

fn default_endpoint_week() -> VisitIndex {
    24
}

/// Selection of the parameter and endpoint window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocfOpts {
    /// Parameter code to analyse.
    #[serde(default = "default_param")]
    pub param: String,
    /// Last visit index (inclusive) eligible as the endpoint.
    #[serde(default = "default_endpoint_week")]
    pub endpoint_week: VisitIndex,
}

impl Default for LocfOpts {
    fn default() -> Self {
        Self {
            param: default_param(),
            endpoint_week: default_endpoint_week(),
        }
    }
}

/// Per-subject analysis record.
///
/// `base` is the study baseline field used as the model covariate while
/// `baseline` is the value observed at visit 0 from which the change is
/// computed. They usually coincide but are kept apart on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Subject identifier.
    pub usubjid: SubjectId,
    /// Treatment label.
    pub trtp: String,
    /// Baseline covariate (first `BASE` in visit order).
    pub base: f64,
    /// Value observed at visit 0.
    pub baseline: f64,
    /// Value at the last visit at or before the endpoint week.
    pub endpoint: f64,
    /// `endpoint - baseline`.
    pub change: f64,
    /// Last visit inside the endpoint window.
    pub last_visit: VisitIndex,
}

/// Why a subject was left out of the analysis set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    /// No non-missing value at visit 0.
    MissingBaseline,
    /// The last visit inside the endpoint window has no value.
    MissingEndpoint,
    /// No non-missing baseline covariate.
    MissingCovariate,
}

/// A subject dropped from the analysis set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    /// Subject identifier.
    pub usubjid: SubjectId,
    /// Treatment label.
    pub trtp: String,
    /// First missing requirement.
    pub reason: ExclusionReason,
}

/// LOCF analysis dataset ordered by subject identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocfDataset {
    /// Parameter and window used to derive the dataset.
    pub opts: LocfOpts,
    /// Eligible subjects.
    pub records: Vec<AnalysisRecord>,
    /// Subjects with rows in the window that could not be analysed.
    pub exclusions: Vec<Exclusion>,
}

impl LocfDataset {
    /// Records belonging to `trtp`.
    pub fn records_for<'a>(&'a self, trtp: &'a str) -> impl Iterator<Item = &'a AnalysisRecord> {
        self.records.iter().filter(move |record| record.trtp == trtp)
    }
}

/// Derives the LOCF analysis dataset.
///
/// Lab rows are inner-joined with the population, restricted to `opts.param`
/// and to visits up to `opts.endpoint_week`, and ordered by visit within
/// subject. Rows sharing a visit index keep their source order. The
/// endpoint is the value of the last row in that order; a blank or
/// non-finite value there excludes the subject.
pub fn prepare_locf(
    lab: &LabTable,
    population: &PopulationTable,
    opts: &LocfOpts,
) -> LocfDataset {
    let mut by_subject: BTreeMap<&str, (&str, Vec<&LabRow>)> = BTreeMap::new();
    for row in lab.rows() {
        if row.paramcd != opts.param || row.avisitn > opts.endpoint_week {
            continue;
        }
        let Some(trtp) = population.treatment(&row.usubjid) else {
            continue;
        };
        by_subject
            .entry(row.usubjid.as_str())
            .or_insert_with(|| (trtp, Vec::new()))
            .1
            .push(row);
    }

    let mut records = Vec::with_capacity(by_subject.len());
    let mut exclusions = Vec::new();
    for (usubjid, (trtp, mut rows)) in by_subject {
        rows.sort_by_key(|row| row.avisitn);
        match derive_record(usubjid, trtp, &rows) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!(usubjid, trtp, ?reason, "subject excluded from analysis set");
                exclusions.push(Exclusion {
                    usubjid: usubjid.to_string(),
                    trtp: trtp.to_string(),
                    reason,
                });
            }
        }
    }

    info!(
        param = %opts.param,
        endpoint_week = opts.endpoint_week,
        kept = records.len(),
        excluded = exclusions.len(),
        "derived LOCF analysis set"
    );

    LocfDataset {
        opts: opts.clone(),
        records,
        exclusions,
    }
}

fn derive_record(
    usubjid: &str,
    trtp: &str,
    rows: &[&LabRow],
) -> Result<AnalysisRecord, ExclusionReason> {
    let baseline = rows
        .iter()
        .filter(|row| row.avisitn == 0)
        .find_map(|row| observed(row.aval))
        .ok_or(ExclusionReason::MissingBaseline)?;
    let last = rows.last().ok_or(ExclusionReason::MissingEndpoint)?;
    let endpoint = observed(last.aval).ok_or(ExclusionReason::MissingEndpoint)?;
    let last_visit = last.avisitn;
    let base = rows
        .iter()
        .find_map(|row| observed(row.base))
        .ok_or(ExclusionReason::MissingCovariate)?;

    Ok(AnalysisRecord {
        usubjid: usubjid.to_string(),
        trtp: trtp.to_string(),
        base,
        baseline,
        endpoint,
        change: endpoint - baseline,
        last_visit,
    })
}

/// NaN and infinite cells count as missing.
fn observed(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
