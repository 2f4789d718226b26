#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const ARMS: [&str; 3] = ["Placebo", "Low", "High"];
const EFFECT: [i64; 3] = [0, -2, -12];
const HALF_EFFECT: [i64; 3] = [0, -1, -6];

pub const PLAN: &str = "name: demo-001
param: GLUC
endpoint_week: 24
treatments: [Placebo, Low, High]
confidence_level: 0.95
";

fn lab_line(
    out: &mut String,
    id: &str,
    paramcd: &str,
    visit: &str,
    base: i64,
    aval: Option<i64>,
) {
    let aval = aval.map(|v| v.to_string()).unwrap_or_default();
    writeln!(out, "{id},{paramcd},{visit},{base},{aval}").expect("write line");
}

/// ADSL/ADLBC pair with ten analysable subjects per arm, one excluded
/// subject, and one subject outside the efficacy population.
pub fn study_csv() -> (String, String) {
    let mut adsl = String::from("USUBJID,TRT01P,EFFFL\n");
    let mut adlbc = String::from("USUBJID,PARAMCD,AVISITN,BASE,AVAL\n");
    for (k, arm) in ARMS.iter().enumerate() {
        let kk = k as i64;
        for i in 0..10i64 {
            let id = format!("01-{}-{:03}", 700 + k, i);
            writeln!(adsl, "{id},{arm},Y").expect("write line");
            let base = 90 + 2 * i + (3 * i * i + 5 * kk) % 11;
            let noise = (7 * i + 3 * kk) % 9 - 4;
            lab_line(&mut adlbc, &id, "GLUC", "0", base, Some(base));
            lab_line(&mut adlbc, &id, "GLUC", "8", base, Some(base + i % 3 - 1));
            let week16 = base + HALF_EFFECT[k] + i % 4;
            lab_line(&mut adlbc, &id, "GLUC", "16.0", base, Some(week16));
            if i != 9 {
                let week24 = base + EFFECT[k] + noise;
                lab_line(&mut adlbc, &id, "GLUC", "24", base, Some(week24));
            }
            lab_line(&mut adlbc, &id, "GLUC", "32", base, Some(500));
            lab_line(&mut adlbc, &id, "ALT", "24", 30, Some(80));
        }
    }
    adsl.push_str("01-701-900,Low,Y\n");
    adsl.push_str("01-799-001,Low,N\n");
    lab_line(&mut adlbc, "01-701-900", "GLUC", "8", 100, Some(104));
    lab_line(&mut adlbc, "01-701-900", "GLUC", "24", 100, Some(90));
    lab_line(&mut adlbc, "01-799-001", "GLUC", "0", 100, Some(100));
    lab_line(&mut adlbc, "01-799-001", "GLUC", "24", 100, Some(10));
    (adsl, adlbc)
}

/// Lays the study out as a project: `study.yaml` plus `data/*.csv`.
pub fn write_project(root: &Path) {
    let (adsl, adlbc) = study_csv();
    fs::create_dir_all(root.join("data")).expect("data dir");
    fs::write(root.join("study.yaml"), PLAN).expect("plan");
    fs::write(root.join("data").join("adsl.csv"), adsl).expect("adsl");
    fs::write(root.join("data").join("adlbc.csv"), adlbc).expect("adlbc");
}

/// Reads a CSV file back as header plus rows.
pub fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("open table");
    let header = reader
        .headers()
        .expect("header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| record.expect("row").iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}
