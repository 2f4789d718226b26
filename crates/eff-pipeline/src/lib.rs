#![deny(missing_docs)]
#![doc = "Analysis plan loading and the end-to-end efficacy pipeline."]

/// YAML analysis plan.
pub mod plan;
/// Report assembly.
pub mod report;

pub use plan::{from_yaml_slice, load_plan, to_yaml_string, AnalysisPlan, OutputSpec};
pub use report::{run_efficacy, EfficacyReport, CI_METHOD};
