use eff_core::TreatmentArms;
use eff_locf::AnalysisRecord;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sample mean and standard deviation of one variable. `None` marks an
/// undefined statistic (no subjects, or a single subject for the SD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Standard deviation with the `n - 1` denominator.
    pub sd: Option<f64>,
}

impl Summary {
    /// Summarises `values` in iteration order.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        let n = values.len();
        if n == 0 {
            return Self {
                n,
                mean: None,
                sd: None,
            };
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let sd = if n > 1 {
            let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            Some((ss / (n - 1) as f64).sqrt())
        } else {
            None
        };
        Self {
            n,
            mean: Some(mean),
            sd,
        }
    }
}

/// Descriptive statistics for one treatment arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Treatment label.
    pub trtp: String,
    /// Number of analysis subjects.
    pub n: usize,
    /// Visit-0 value.
    pub baseline: Summary,
    /// LOCF endpoint value.
    pub endpoint: Summary,
    /// Change from baseline.
    pub change: Summary,
}

impl DescriptiveStats {
    /// Whether the arm has no analysis subjects.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Non-fatal conditions raised while analysing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AnalysisWarning {
    /// A treatment arm has no analysis subjects.
    EmptyGroup {
        /// Treatment label.
        trtp: String,
    },
}

/// One descriptive record per arm, in arm order.
pub fn describe(records: &[AnalysisRecord], arms: &TreatmentArms) -> Vec<DescriptiveStats> {
    arms.iter()
        .map(|trtp| {
            let group: Vec<&AnalysisRecord> =
                records.iter().filter(|record| record.trtp == trtp).collect();
            if group.is_empty() {
                warn!(trtp, "treatment arm has no analysis subjects");
            }
            DescriptiveStats {
                trtp: trtp.to_string(),
                n: group.len(),
                baseline: Summary::of(group.iter().map(|r| r.baseline)),
                endpoint: Summary::of(group.iter().map(|r| r.endpoint)),
                change: Summary::of(group.iter().map(|r| r.change)),
            }
        })
        .collect()
}

/// Warnings implied by a set of descriptive records.
pub fn empty_group_warnings(stats: &[DescriptiveStats]) -> Vec<AnalysisWarning> {
    stats
        .iter()
        .filter(|stat| stat.is_empty())
        .map(|stat| AnalysisWarning::EmptyGroup {
            trtp: stat.trtp.clone(),
        })
        .collect()
}
