use std::collections::BTreeMap;

use eff_core::errors::EffError;
use eff_core::{stable_hash_string, RunProvenance, SchemaVersion};
use eff_locf::{prepare_locf, LabTable, LocfDataset, PopulationTable};
use eff_stats::{
    describe, empty_group_warnings, perform_ancova, AncovaResult, AnalysisWarning,
    DescriptiveStats,
};
use eff_tables::{format_comparison_table, format_efficacy_table, Table};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::plan::AnalysisPlan;

/// Interval method applied to adjusted means and contrasts alike.
pub const CI_METHOD: &str = "student-t";

/// Everything derived from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficacyReport {
    /// Plan the run was executed with.
    pub plan: AnalysisPlan,
    /// LOCF analysis set including exclusions.
    pub analysis_set: LocfDataset,
    /// Descriptive statistics per arm.
    pub descriptive: Vec<DescriptiveStats>,
    /// Model fit, adjusted means and contrasts.
    pub ancova: AncovaResult,
    /// Efficacy summary table.
    pub efficacy_table: Table,
    /// Pairwise comparison table.
    pub comparison_table: Table,
    /// Non-fatal conditions.
    pub warnings: Vec<AnalysisWarning>,
    /// Interval method.
    pub ci_method: String,
    /// Input and plan hashes.
    pub provenance: RunProvenance,
    /// Hash of the report computed with this field empty.
    pub report_hash: String,
}

fn tool_versions() -> BTreeMap<String, String> {
    let mut versions = BTreeMap::new();
    versions.insert(
        "eff-pipeline".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    versions
}

/// Runs LOCF derivation, descriptive statistics, the ANCOVA fit and table
/// formatting. A failed model fit aborts the run; no partial report is built.
pub fn run_efficacy(
    population: &PopulationTable,
    lab: &LabTable,
    plan: &AnalysisPlan,
) -> Result<EfficacyReport, EffError> {
    plan.validate()?;
    let analysis_set = prepare_locf(lab, population, &plan.locf);
    let descriptive = describe(&analysis_set.records, &plan.treatments);
    let warnings = empty_group_warnings(&descriptive);
    let ancova = perform_ancova(&analysis_set.records, &plan.treatments, &plan.ancova)?;

    let efficacy_table = format_efficacy_table(&descriptive, &ancova.ls_means);
    let comparison_table = format_comparison_table(&ancova.contrasts);

    let provenance = RunProvenance {
        schema: SchemaVersion::default(),
        input_hash: stable_hash_string(&(population, lab))?,
        plan_hash: plan.plan_hash()?,
        tool_versions: tool_versions(),
    };

    let mut report = EfficacyReport {
        plan: plan.clone(),
        analysis_set,
        descriptive,
        ancova,
        efficacy_table,
        comparison_table,
        warnings,
        ci_method: CI_METHOD.to_string(),
        provenance,
        report_hash: String::new(),
    };
    report.report_hash = stable_hash_string(&report)?;

    info!(
        plan = %plan.name,
        subjects = report.analysis_set.records.len(),
        contrasts = report.ancova.contrasts.len(),
        report_hash = %report.report_hash,
        "efficacy analysis complete"
    );
    Ok(report)
}
