use eff_core::errors::EffError;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::design::DesignMatrix;

/// Singular values below this fraction of the largest one count as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Ordinary least squares estimates for a [`DesignMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// Coefficients in design column order.
    pub beta: DVector<f64>,
    /// Coefficient covariance `sigma2 * (X'X)^-1`.
    pub covariance: DMatrix<f64>,
    /// Residual variance estimate.
    pub sigma2: f64,
    /// Residual degrees of freedom `n - p`.
    pub df_resid: usize,
}

impl OlsFit {
    /// Point prediction `x' beta`.
    pub fn predict(&self, row: &DVector<f64>) -> f64 {
        row.dot(&self.beta)
    }

    /// Standard error of the predicted mean, `sqrt(x' Sigma x)`.
    pub fn prediction_se(&self, row: &DVector<f64>) -> f64 {
        (row.transpose() * &self.covariance * row)[(0, 0)].max(0.0).sqrt()
    }

    /// Standard error of coefficient `idx`.
    pub fn coefficient_se(&self, idx: usize) -> f64 {
        self.covariance[(idx, idx)].max(0.0).sqrt()
    }
}

fn singular(design: &DesignMatrix, code: &str, message: &str) -> EffError {
    let info = design.describe_failure(code, message);
    warn!(%info, "ANCOVA design cannot be fitted");
    EffError::SingularDesign(info)
}

/// Fits the design by least squares. Fails when a row is not finite, when
/// the design is not full column rank or when it leaves no residual
/// degrees of freedom.
pub fn fit_ols(design: &DesignMatrix) -> Result<OlsFit, EffError> {
    if let Some(arm) = design.counts().iter().position(|&count| count == 0) {
        let label = &design.arms().labels()[arm];
        return Err(singular(
            design,
            "empty-arm",
            &format!("treatment arm {label} has no analysis subjects"),
        ));
    }

    let x = design.x();
    let non_finite = (0..design.nrows()).find(|&row| {
        !design.y()[row].is_finite() || x.row(row).iter().any(|value| !value.is_finite())
    });
    if let Some(row) = non_finite {
        let info = design
            .describe_failure("non-finite-value", "design row holds a NaN or infinite value")
            .with_context("usubjid", design.subjects()[row].clone());
        warn!(%info, "ANCOVA design cannot be fitted");
        return Err(EffError::Data(info));
    }

    let (n, p) = (x.nrows(), x.ncols());
    if n <= p {
        return Err(singular(
            design,
            "no-residual-df",
            "fewer subjects than model parameters",
        ));
    }

    let svd = x.clone().svd(false, false);
    let tolerance = svd.singular_values.max() * RANK_TOLERANCE;
    let rank = svd.rank(tolerance);
    if rank < p {
        return Err(singular(
            design,
            "rank-deficient",
            &format!("design matrix has rank {rank} with {p} columns"),
        ));
    }

    let xt = x.transpose();
    let Some(cholesky) = (&xt * x).cholesky() else {
        return Err(singular(
            design,
            "rank-deficient",
            "cross-product matrix is not positive definite",
        ));
    };
    let beta = cholesky.solve(&(&xt * design.y()));
    let residuals = design.y() - x * &beta;
    let df_resid = n - p;
    let sigma2 = residuals.norm_squared() / df_resid as f64;
    let covariance = cholesky.inverse() * sigma2;

    debug!(n, p, df_resid, sigma2, "fitted ANCOVA model");
    Ok(OlsFit {
        beta,
        covariance,
        sigma2,
        df_resid,
    })
}
