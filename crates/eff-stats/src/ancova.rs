use eff_core::errors::{EffError, ErrorInfo};
use eff_core::TreatmentArms;
use eff_locf::AnalysisRecord;
use serde::{Deserialize, Serialize};

use crate::design::{DesignColumn, DesignMatrix};
use crate::dist::{t_critical, two_sided_p};
use crate::ols::{fit_ols, OlsFit};

fn default_confidence_level() -> f64 {
    0.95
}

/// Inference options. Intervals for adjusted means and contrasts both use
/// the Student-t quantile on the residual degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AncovaOpts {
    /// Two-sided confidence level.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

impl Default for AncovaOpts {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
        }
    }
}

impl AncovaOpts {
    /// Rejects levels outside the open unit interval.
    pub fn validate(&self) -> Result<(), EffError> {
        if self.confidence_level > 0.0 && self.confidence_level < 1.0 {
            Ok(())
        } else {
            Err(EffError::Config(
                ErrorInfo::new("confidence-level", "confidence level must lie in (0, 1)")
                    .with_context("confidence_level", self.confidence_level.to_string()),
            ))
        }
    }
}

/// A fitted model coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Coefficient name, e.g. `trt[Low]`.
    pub name: String,
    /// Design column the coefficient belongs to.
    pub column: DesignColumn,
    /// Point estimate.
    pub estimate: f64,
    /// Standard error.
    pub se: f64,
}

/// Immutable summary of the fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    /// Coefficients in design column order.
    pub coefficients: Vec<Coefficient>,
    /// Coefficient covariance matrix, row major.
    pub covariance: Vec<Vec<f64>>,
    /// Residual variance.
    pub sigma2: f64,
    /// Residual degrees of freedom.
    pub df_resid: usize,
    /// Number of subjects in the fit.
    pub n: usize,
    /// Pooled baseline covariate mean used for the adjusted means.
    pub baseline_mean: f64,
    /// Two-sided confidence level.
    pub confidence_level: f64,
    /// Student-t critical value applied to every interval.
    pub t_critical: f64,
}

/// Adjusted (least-squares) mean of an arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsMean {
    /// Treatment label.
    pub trtp: String,
    /// Predicted change at the pooled baseline mean.
    pub ls_mean: f64,
    /// Standard error of the prediction.
    pub se: f64,
    /// Lower confidence bound.
    pub ci_lower: f64,
    /// Upper confidence bound.
    pub ci_upper: f64,
}

/// Difference of an arm against the reference arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contrast {
    /// Label of the form `X vs. Reference`.
    pub comparison: String,
    /// Treatment label.
    pub trtp: String,
    /// Reference label.
    pub reference: String,
    /// Indicator coefficient.
    pub estimate: f64,
    /// Standard error of the coefficient.
    pub se: f64,
    /// Lower confidence bound.
    pub ci_lower: f64,
    /// Upper confidence bound.
    pub ci_upper: f64,
    /// `estimate / se`.
    pub t_stat: f64,
    /// Two-sided p-value on the residual degrees of freedom.
    pub p_value: f64,
}

/// Model fit, adjusted means and reference contrasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncovaResult {
    /// Fitted model summary.
    pub fit: ModelFit,
    /// One adjusted mean per arm, in arm order.
    pub ls_means: Vec<LsMean>,
    /// One contrast per non-reference arm, in arm order.
    pub contrasts: Vec<Contrast>,
}

/// Fits `change ~ treatment + base` over all records and derives adjusted
/// means and contrasts against the first arm.
pub fn perform_ancova(
    records: &[AnalysisRecord],
    arms: &TreatmentArms,
    opts: &AncovaOpts,
) -> Result<AncovaResult, EffError> {
    opts.validate()?;
    let design = DesignMatrix::build(records, arms)?;
    let ols = fit_ols(&design)?;
    let t_crit = t_critical(opts.confidence_level, ols.df_resid)?;
    let baseline_mean = design.covariate_mean();

    let ls_means: Vec<LsMean> = arms
        .iter()
        .enumerate()
        .map(|(idx, trtp)| {
            let row = design.prediction_row(idx, baseline_mean);
            let ls_mean = ols.predict(&row);
            let se = ols.prediction_se(&row);
            LsMean {
                trtp: trtp.to_string(),
                ls_mean,
                se,
                ci_lower: ls_mean - t_crit * se,
                ci_upper: ls_mean + t_crit * se,
            }
        })
        .collect();

    let mut contrasts = Vec::with_capacity(arms.len().saturating_sub(1));
    for (offset, trtp) in arms.non_reference().iter().enumerate() {
        let idx = offset + 1;
        let estimate = ols.beta[idx];
        let se = ols.coefficient_se(idx);
        let t_stat = estimate / se;
        contrasts.push(Contrast {
            comparison: format!("{trtp} vs. {}", arms.reference()),
            trtp: trtp.clone(),
            reference: arms.reference().to_string(),
            estimate,
            se,
            ci_lower: estimate - t_crit * se,
            ci_upper: estimate + t_crit * se,
            t_stat,
            p_value: two_sided_p(t_stat, ols.df_resid)?,
        });
    }

    Ok(AncovaResult {
        fit: summarize_fit(&design, &ols, baseline_mean, opts.confidence_level, t_crit),
        ls_means,
        contrasts,
    })
}

fn summarize_fit(
    design: &DesignMatrix,
    ols: &OlsFit,
    baseline_mean: f64,
    confidence_level: f64,
    t_critical: f64,
) -> ModelFit {
    let coefficients: Vec<Coefficient> = design
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| Coefficient {
            name: column.name(),
            column: column.clone(),
            estimate: ols.beta[idx],
            se: ols.coefficient_se(idx),
        })
        .collect();
    let covariance: Vec<Vec<f64>> = ols
        .covariance
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect();
    ModelFit {
        coefficients,
        covariance,
        sigma2: ols.sigma2,
        df_resid: ols.df_resid,
        n: design.nrows(),
        baseline_mean,
        confidence_level,
        t_critical,
    }
}
