use std::fs;
use std::path::Path;

use eff_core::errors::{EffError, ErrorInfo};
use eff_core::{stable_hash_string, TreatmentArms};
use eff_locf::LocfOpts;
use eff_stats::AncovaOpts;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

fn serde_error(code: &str, err: impl ToString) -> EffError {
    EffError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, EffError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, EffError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

fn default_name() -> String {
    "efficacy".to_string()
}

fn default_population_flag() -> String {
    "EFFFL".to_string()
}

/// File stems of the artefacts written for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Efficacy summary table.
    #[serde(default = "OutputSpec::default_efficacy")]
    pub efficacy: String,
    /// Pairwise comparison table.
    #[serde(default = "OutputSpec::default_comparison")]
    pub comparison: String,
    /// Full JSON report.
    #[serde(default = "OutputSpec::default_report")]
    pub report: String,
}

impl OutputSpec {
    fn default_efficacy() -> String {
        "efficacy_table".to_string()
    }

    fn default_comparison() -> String {
        "comparison_table".to_string()
    }

    fn default_report() -> String {
        "efficacy_report".to_string()
    }
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            efficacy: Self::default_efficacy(),
            comparison: Self::default_comparison(),
            report: Self::default_report(),
        }
    }
}

/// Parameters of one efficacy analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPlan {
    /// Label recorded in the report.
    #[serde(default = "default_name")]
    pub name: String,
    /// Parameter code and endpoint window.
    #[serde(flatten)]
    pub locf: LocfOpts,
    /// Treatment arms; the first is the reference.
    pub treatments: TreatmentArms,
    /// Confidence level for every interval.
    #[serde(flatten)]
    pub ancova: AncovaOpts,
    /// ADSL flag column the loader filters on (`Y` keeps the subject).
    #[serde(default = "default_population_flag")]
    pub population_flag: String,
    /// Output file stems.
    #[serde(default)]
    pub outputs: OutputSpec,
}

impl AnalysisPlan {
    /// Plan with default settings for the given arms.
    pub fn new(treatments: TreatmentArms) -> Self {
        Self {
            name: default_name(),
            locf: LocfOpts::default(),
            treatments,
            ancova: AncovaOpts::default(),
            population_flag: default_population_flag(),
            outputs: OutputSpec::default(),
        }
    }

    /// Checks settings the type system does not enforce.
    pub fn validate(&self) -> Result<(), EffError> {
        self.ancova.validate()?;
        if self.locf.param.trim().is_empty() {
            return Err(EffError::Config(ErrorInfo::new(
                "empty-param",
                "parameter code must not be empty",
            )));
        }
        Ok(())
    }

    /// Stable hash of the plan.
    pub fn plan_hash(&self) -> Result<String, EffError> {
        stable_hash_string(self)
    }
}

/// Loads and validates a YAML plan.
pub fn load_plan(path: &Path) -> Result<AnalysisPlan, EffError> {
    let bytes = fs::read(path).map_err(|err| {
        EffError::Io(
            ErrorInfo::new("plan-read", "failed to read analysis plan")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let plan: AnalysisPlan = from_yaml_slice(&bytes)?;
    plan.validate()?;
    Ok(plan)
}
