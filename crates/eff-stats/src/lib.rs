#![deny(missing_docs)]
#![doc = "Descriptive summaries and the ANCOVA engine for the change-from-baseline endpoint."]

/// ANCOVA adjusted means and contrasts.
pub mod ancova;
/// Per-arm descriptive statistics.
pub mod describe;
/// Reference-coded design matrix builder.
pub mod design;
/// Student-t helpers.
pub mod dist;
/// Least squares fitting.
pub mod ols;

pub use ancova::{
    perform_ancova, AncovaOpts, AncovaResult, Coefficient, Contrast, LsMean, ModelFit,
};
pub use describe::{describe, empty_group_warnings, AnalysisWarning, DescriptiveStats, Summary};
pub use design::{DesignColumn, DesignMatrix};
pub use ols::{fit_ols, OlsFit};
