use eff_core::errors::{EffError, ErrorInfo};
use eff_core::{SubjectId, TreatmentArms};
use eff_locf::AnalysisRecord;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Column of the ANCOVA design matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "arm", rename_all = "kebab-case")]
pub enum DesignColumn {
    /// Column of ones; carries the reference arm.
    Intercept,
    /// 0/1 membership of a non-reference arm.
    Indicator(String),
    /// Baseline covariate.
    Covariate,
}

impl DesignColumn {
    /// Display name of the coefficient estimated for this column.
    pub fn name(&self) -> String {
        match self {
            DesignColumn::Intercept => "(Intercept)".to_string(),
            DesignColumn::Indicator(arm) => format!("trt[{arm}]"),
            DesignColumn::Covariate => "base".to_string(),
        }
    }
}

/// Pooled design for `change ~ treatment + base` with reference coding.
///
/// Rows are ordered by subject identifier so the fit does not depend on the
/// order records were supplied in.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    arms: TreatmentArms,
    columns: Vec<DesignColumn>,
    x: DMatrix<f64>,
    y: DVector<f64>,
    subjects: Vec<SubjectId>,
    counts: Vec<usize>,
}

impl DesignMatrix {
    /// Builds the design, rejecting records whose arm is not in `arms`.
    pub fn build(records: &[AnalysisRecord], arms: &TreatmentArms) -> Result<Self, EffError> {
        let mut ordered: Vec<&AnalysisRecord> = records.iter().collect();
        ordered.sort_by(|a, b| a.usubjid.cmp(&b.usubjid));

        let mut columns = Vec::with_capacity(arms.len() + 1);
        columns.push(DesignColumn::Intercept);
        columns.extend(
            arms.non_reference()
                .iter()
                .map(|arm| DesignColumn::Indicator(arm.clone())),
        );
        columns.push(DesignColumn::Covariate);

        let n = ordered.len();
        let p = columns.len();
        let mut x = DMatrix::<f64>::zeros(n, p);
        let mut y = DVector::<f64>::zeros(n);
        let mut counts = vec![0usize; arms.len()];
        let mut subjects = Vec::with_capacity(n);
        for (row, record) in ordered.iter().enumerate() {
            let Some(arm) = arms.position(&record.trtp) else {
                return Err(EffError::Data(
                    ErrorInfo::new(
                        "unlisted-treatment",
                        "analysis record belongs to an arm missing from the treatment list",
                    )
                    .with_context("usubjid", record.usubjid.clone())
                    .with_context("trtp", record.trtp.clone())
                    .with_hint("add the arm to the plan or filter the population"),
                ));
            };
            counts[arm] += 1;
            x[(row, 0)] = 1.0;
            if arm > 0 {
                x[(row, arm)] = 1.0;
            }
            x[(row, p - 1)] = record.base;
            y[row] = record.change;
            subjects.push(record.usubjid.clone());
        }

        Ok(Self {
            arms: arms.clone(),
            columns,
            x,
            y,
            subjects,
            counts,
        })
    }

    /// Design vector for arm `arm` (position in the ordering) at covariate value `base`.
    pub fn prediction_row(&self, arm: usize, base: f64) -> DVector<f64> {
        let p = self.columns.len();
        let mut row = DVector::<f64>::zeros(p);
        row[0] = 1.0;
        if arm > 0 {
            row[arm] = 1.0;
        }
        row[p - 1] = base;
        row
    }

    /// Mean of the covariate pooled across all rows.
    pub fn covariate_mean(&self) -> f64 {
        let column = self.x.column(self.columns.len() - 1);
        column.iter().sum::<f64>() / self.nrows().max(1) as f64
    }

    /// Column layout.
    pub fn columns(&self) -> &[DesignColumn] {
        &self.columns
    }

    /// Treatment ordering the design was built for.
    pub fn arms(&self) -> &TreatmentArms {
        &self.arms
    }

    /// Model matrix.
    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    /// Response vector (change from baseline).
    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// Subject identifier of each row.
    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    /// Subjects per arm, in arm order.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Error payload describing the arms and their sizes.
    pub(crate) fn describe_failure(&self, code: &str, message: &str) -> ErrorInfo {
        let mut info = ErrorInfo::new(code, message)
            .with_context("subjects", self.nrows().to_string())
            .with_context("parameters", self.ncols().to_string());
        for (arm, count) in self.arms.iter().zip(self.counts.iter()) {
            info = info.with_context(format!("n[{arm}]"), count.to_string());
        }
        info
    }
}
