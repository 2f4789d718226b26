#![deny(missing_docs)]
#![doc = "Population and lab tables plus the LOCF analysis dataset derivation."]

/// LOCF imputation.
pub mod impute;
/// Input table types.
pub mod tables;

pub use impute::{
    prepare_locf, AnalysisRecord, Exclusion, ExclusionReason, LocfDataset, LocfOpts,
};
pub use tables::{LabRow, LabTable, PopulationRow, PopulationTable};
