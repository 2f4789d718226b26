use eff_core::errors::{EffError, ErrorInfo};
use statrs::distribution::{ContinuousCDF, StudentsT};

fn student_t(df: usize) -> Result<StudentsT, EffError> {
    StudentsT::new(0.0, 1.0, df as f64).map_err(|err| {
        EffError::SingularDesign(
            ErrorInfo::new("invalid-df", "residual degrees of freedom must be positive")
                .with_context("df", df.to_string())
                .with_hint(err.to_string()),
        )
    })
}

/// Two-sided critical value `t(1 - alpha/2, df)` for a confidence level.
pub fn t_critical(confidence_level: f64, df: usize) -> Result<f64, EffError> {
    let dist = student_t(df)?;
    Ok(dist.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Two-sided p-value of a t statistic. A NaN statistic yields NaN.
pub fn two_sided_p(t_stat: f64, df: usize) -> Result<f64, EffError> {
    let dist = student_t(df)?;
    if t_stat.is_nan() {
        return Ok(f64::NAN);
    }
    if t_stat.is_infinite() {
        return Ok(0.0);
    }
    Ok((2.0 * dist.cdf(-t_stat.abs())).clamp(0.0, 1.0))
}
