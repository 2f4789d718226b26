use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use eff_core::serde::to_canonical_json_pretty;
use eff_pipeline::{load_plan, run_efficacy};
use eff_tables::write_csv;
use tracing::info;

use super::InputArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML analysis plan.
    #[arg(long)]
    pub plan: PathBuf,
    #[command(flatten)]
    pub input: InputArgs,
    /// Output directory for the tables and the report.
    #[arg(long)]
    pub out: PathBuf,
}

/// Runs the full analysis and writes both tables plus the JSON report.
pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let (population, lab) = args.input.paths().load(&plan.population_flag)?;
    let report = run_efficacy(&population, &lab, &plan)?;

    fs::create_dir_all(&args.out)?;
    let efficacy_path = args.out.join(format!("{}.csv", plan.outputs.efficacy));
    let comparison_path = args.out.join(format!("{}.csv", plan.outputs.comparison));
    let report_path = args.out.join(format!("{}.json", plan.outputs.report));
    write_csv(&report.efficacy_table, &efficacy_path)?;
    write_csv(&report.comparison_table, &comparison_path)?;
    fs::write(&report_path, to_canonical_json_pretty(&report)?)?;

    info!(
        out = %args.out.display(),
        report_hash = %report.report_hash,
        "wrote efficacy tables"
    );
    Ok(())
}
