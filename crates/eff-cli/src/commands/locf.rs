use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use eff_locf::{prepare_locf, LocfOpts};

use super::InputArgs;

#[derive(Args, Debug)]
pub struct LocfArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Parameter code to derive.
    #[arg(long, default_value = "GLUC")]
    pub param: String,
    /// Last visit index eligible as the endpoint.
    #[arg(long, default_value_t = 24)]
    pub endpoint_week: i64,
    /// ADSL population flag column.
    #[arg(long, default_value = "EFFFL")]
    pub population_flag: String,
    /// Output directory for `analysis_set.csv` and `exclusions.csv`.
    #[arg(long)]
    pub out: PathBuf,
}

/// Writes the LOCF analysis set without fitting the model.
pub fn run(args: &LocfArgs) -> Result<(), Box<dyn Error>> {
    let (population, lab) = args.input.paths().load(&args.population_flag)?;
    let opts = LocfOpts {
        param: args.param.clone(),
        endpoint_week: args.endpoint_week,
    };
    let dataset = prepare_locf(&lab, &population, &opts);

    fs::create_dir_all(&args.out)?;
    let mut records = csv::Writer::from_path(args.out.join("analysis_set.csv"))?;
    for record in &dataset.records {
        records.serialize(record)?;
    }
    records.flush()?;

    let mut exclusions = csv::Writer::from_path(args.out.join("exclusions.csv"))?;
    for exclusion in &dataset.exclusions {
        exclusions.serialize(exclusion)?;
    }
    exclusions.flush()?;
    Ok(())
}
