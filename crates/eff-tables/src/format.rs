use eff_stats::{Contrast, DescriptiveStats, LsMean, Summary};

use crate::table::Table;

/// Smallest p-value printed as a number.
pub const P_VALUE_FLOOR: f64 = 0.0001;

/// Columns of the efficacy summary table.
pub const EFFICACY_COLUMNS: [&str; 8] = [
    "Treatment",
    "N_Base",
    "Mean_SD_Base",
    "N_End",
    "Mean_SD_End",
    "N_Chg",
    "Mean_SD_Chg",
    "LS_Mean_CI",
];

/// Columns of the pairwise comparison table.
pub const COMPARISON_COLUMNS: [&str; 3] = ["Comparison", "Diff_CI", "P_Value"];

/// `mean (SD)` with one and two decimals. A missing mean is an empty cell;
/// a missing SD leaves the mean alone.
pub fn format_mean_sd(summary: &Summary) -> String {
    match (summary.mean, summary.sd) {
        (Some(mean), Some(sd)) => format!("{mean:.1} ({sd:.2})"),
        (Some(mean), None) => format!("{mean:.1}"),
        (None, _) => String::new(),
    }
}

/// `estimate (lower, upper)` to two decimals.
pub fn format_estimate_ci(estimate: f64, lower: f64, upper: f64) -> String {
    format!("{estimate:.2} ({lower:.2}, {upper:.2})")
}

/// Four decimals, `<0.0001` below [`P_VALUE_FLOOR`], empty when undefined.
pub fn format_p_value(p_value: f64) -> String {
    if !p_value.is_finite() {
        String::new()
    } else if p_value < P_VALUE_FLOOR {
        "<0.0001".to_string()
    } else {
        format!("{p_value:.4}")
    }
}

/// One row per descriptive record, in the order given. The adjusted mean is
/// matched by treatment label.
pub fn format_efficacy_table(desc_stats: &[DescriptiveStats], ls_means: &[LsMean]) -> Table {
    let mut table = Table::new(EFFICACY_COLUMNS);
    for desc in desc_stats {
        let n = desc.n.to_string();
        let ls_cell = ls_means
            .iter()
            .find(|ls| ls.trtp == desc.trtp)
            .map(|ls| format_estimate_ci(ls.ls_mean, ls.ci_lower, ls.ci_upper))
            .unwrap_or_default();
        table.push_row(vec![
            desc.trtp.clone(),
            n.clone(),
            format_mean_sd(&desc.baseline),
            n.clone(),
            format_mean_sd(&desc.endpoint),
            n,
            format_mean_sd(&desc.change),
            ls_cell,
        ]);
    }
    table
}

/// One row per contrast, in the order given.
pub fn format_comparison_table(comparisons: &[Contrast]) -> Table {
    let mut table = Table::new(COMPARISON_COLUMNS);
    for comp in comparisons {
        table.push_row(vec![
            comp.comparison.clone(),
            format_estimate_ci(comp.estimate, comp.ci_lower, comp.ci_upper),
            format_p_value(comp.p_value),
        ]);
    }
    table
}
