#![deny(missing_docs)]
#![doc = "Fixed text layouts for the efficacy summary and pairwise comparison tables."]

/// Cell and table formatting.
pub mod format;
/// Table value and CSV export.
pub mod table;

pub use format::{
    format_comparison_table, format_efficacy_table, format_estimate_ci, format_mean_sd,
    format_p_value, COMPARISON_COLUMNS, EFFICACY_COLUMNS, P_VALUE_FLOOR,
};
pub use table::{write_csv, Table};
