pub mod locf;
pub mod run;
pub mod version;

use std::path::PathBuf;

use clap::Args;
use eff_cli::DatasetPaths;

/// Dataset location flags shared by the analysis commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Project root holding `data/adsl.csv` and `data/adlbc.csv`.
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Explicit ADSL path.
    #[arg(long)]
    pub population: Option<PathBuf>,
    /// Explicit ADLBC path.
    #[arg(long)]
    pub lab: Option<PathBuf>,
}

impl InputArgs {
    pub fn paths(&self) -> DatasetPaths {
        DatasetPaths {
            root: self.root.clone(),
            population: self.population.clone(),
            lab: self.lab.clone(),
        }
    }
}
