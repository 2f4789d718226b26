use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    locf::{self, LocfArgs},
    run::{self, RunArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "efficacy", about = "DEMO-001 LOCF/ANCOVA efficacy analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the analysis set, fit the ANCOVA model and write both tables.
    Run(RunArgs),
    /// Write the LOCF analysis set only.
    Locf(LocfArgs),
    /// Print the tool version.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Locf(args) => locf::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
