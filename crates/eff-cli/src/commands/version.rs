use std::error::Error;
use std::process::Command;

use clap::Args;
use eff_core::serde::to_canonical_json_bytes;
use eff_core::SchemaVersion;
use eff_pipeline::CI_METHOD;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Also print the report schema, interval method and build toolchain.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct BuildInfo {
    version: &'static str,
    report_schema: SchemaVersion,
    ci_method: &'static str,
    git_commit: String,
    rustc: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        report_schema: SchemaVersion::default(),
        ci_method: CI_METHOD,
        git_commit: first_line("git", &["rev-parse", "HEAD"])
            .unwrap_or_else(|| "unknown".into()),
        rustc: first_line("rustc", &["--version"]).unwrap_or_else(|| "unknown".into()),
    };
    println!("{}", String::from_utf8(to_canonical_json_bytes(&info)?)?);
    Ok(())
}

fn first_line(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}
