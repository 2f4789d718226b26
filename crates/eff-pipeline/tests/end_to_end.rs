use eff_core::{EffError, TreatmentArms};
use eff_locf::{ExclusionReason, LabRow, LabTable, PopulationRow, PopulationTable};
use eff_pipeline::{from_yaml_slice, run_efficacy, AnalysisPlan, CI_METHOD};
use eff_stats::AnalysisWarning;

const ARMS: [&str; 3] = ["Placebo", "Low", "High"];
const EFFECT: [i64; 3] = [0, -2, -12];
const HALF_EFFECT: [i64; 3] = [0, -1, -6];

fn lab(usubjid: &str, paramcd: &str, visit: i64, base: i64, aval: Option<i64>) -> LabRow {
    LabRow {
        usubjid: usubjid.into(),
        paramcd: paramcd.into(),
        avisitn: visit,
        base: Some(base as f64),
        aval: aval.map(|v| v as f64),
    }
}

/// Ten analysable subjects per arm plus subjects that must not reach the model.
fn study() -> (PopulationTable, Vec<LabRow>) {
    let mut population = Vec::new();
    let mut rows = Vec::new();
    for (k, arm) in ARMS.iter().enumerate() {
        let kk = k as i64;
        for i in 0..10i64 {
            let id = format!("01-{}-{:03}", 700 + k, i);
            population.push(PopulationRow {
                usubjid: id.clone(),
                trtp: arm.to_string(),
            });
            let base = 90 + 2 * i + (3 * i * i + 5 * kk) % 11;
            let noise = (7 * i + 3 * kk) % 9 - 4;
            rows.push(lab(&id, "GLUC", 0, base, Some(base)));
            rows.push(lab(&id, "GLUC", 8, base, Some(base + i % 3 - 1)));
            rows.push(lab(&id, "GLUC", 16, base, Some(base + HALF_EFFECT[k] + i % 4)));
            if i != 9 {
                rows.push(lab(&id, "GLUC", 24, base, Some(base + EFFECT[k] + noise)));
            }
            rows.push(lab(&id, "GLUC", 32, base, Some(500)));
            rows.push(lab(&id, "ALT", 24, 30, Some(80)));
        }
    }
    population.push(PopulationRow {
        usubjid: "01-701-900".into(),
        trtp: "Low".into(),
    });
    rows.push(lab("01-701-900", "GLUC", 8, 100, Some(104)));
    rows.push(lab("01-701-900", "GLUC", 24, 100, Some(90)));
    population.push(PopulationRow {
        usubjid: "01-702-901".into(),
        trtp: "High".into(),
    });
    rows.push(lab("01-702-901", "GLUC", 0, 100, Some(100)));
    rows.push(lab("01-702-901", "GLUC", 16, 100, Some(70)));
    rows.push(lab("01-702-901", "GLUC", 24, 100, None));
    rows.push(lab("01-799-001", "GLUC", 0, 100, Some(100)));
    rows.push(lab("01-799-001", "GLUC", 24, 100, Some(10)));
    (
        PopulationTable::from_rows(population).expect("population"),
        rows,
    )
}

fn plan() -> AnalysisPlan {
    AnalysisPlan::new(TreatmentArms::new(ARMS).expect("arms"))
}

#[test]
fn summary_and_comparison_tables() {
    let (population, rows) = study();
    let lab = LabTable::from_rows(rows);
    let report = run_efficacy(&population, &lab, &plan()).expect("report");

    let table = &report.efficacy_table;
    assert_eq!(
        table.rows,
        vec![
            vec![
                "Placebo",
                "10",
                "103.1 (7.65)",
                "10",
                "103.2 (8.80)",
                "10",
                "0.1 (2.60)",
                "0.24 (-1.58, 2.06)",
            ],
            vec![
                "Low",
                "10",
                "105.9 (6.81)",
                "10",
                "104.1 (8.20)",
                "10",
                "-1.8 (2.66)",
                "-2.06 (-3.90, -0.22)",
            ],
            vec![
                "High",
                "10",
                "103.2 (6.21)",
                "10",
                "91.9 (8.05)",
                "10",
                "-11.3 (3.40)",
                "-11.18 (-13.00, -9.36)",
            ],
        ]
    );

    let comparison = &report.comparison_table;
    assert_eq!(
        comparison.rows,
        vec![
            vec!["Low vs. Placebo", "-2.30 (-4.90, 0.31)", "0.0817"],
            vec!["High vs. Placebo", "-11.41 (-13.98, -8.85)", "<0.0001"],
        ]
    );
    assert_eq!(report.ci_method, CI_METHOD);
    assert!(report.warnings.is_empty());
}

#[test]
fn analysis_set_respects_window_and_exclusions() {
    let (population, rows) = study();
    let lab = LabTable::from_rows(rows);
    let report = run_efficacy(&population, &lab, &plan()).expect("report");
    let set = &report.analysis_set;
    assert_eq!(set.records.len(), 30);
    assert!(set.records.iter().all(|r| r.last_visit <= 24));
    assert!(set.records.iter().all(|r| r.endpoint != 500.0));
    let excluded: Vec<_> = set
        .exclusions
        .iter()
        .map(|e| (e.usubjid.as_str(), e.reason))
        .collect();
    assert_eq!(
        excluded,
        [
            ("01-701-900", ExclusionReason::MissingBaseline),
            ("01-702-901", ExclusionReason::MissingEndpoint),
        ]
    );
    assert!(set.records.iter().all(|r| r.usubjid != "01-799-001"));

    let carried = set
        .records
        .iter()
        .find(|r| r.usubjid == "01-700-009")
        .expect("placebo subject 9");
    assert_eq!(carried.last_visit, 16);
}

#[test]
fn input_row_order_does_not_change_results() {
    let (population, rows) = study();
    let forward = run_efficacy(&population, &LabTable::from_rows(rows.clone()), &plan())
        .expect("forward");
    let mut reversed_rows = rows;
    reversed_rows.reverse();
    let reversed = run_efficacy(&population, &LabTable::from_rows(reversed_rows), &plan())
        .expect("reversed");
    assert_eq!(forward.ancova, reversed.ancova);
    assert_eq!(forward.descriptive, reversed.descriptive);
    assert_eq!(forward.efficacy_table, reversed.efficacy_table);
    assert_eq!(forward.comparison_table, reversed.comparison_table);
}

#[test]
fn repeated_runs_hash_identically() {
    let (population, rows) = study();
    let lab = LabTable::from_rows(rows);
    let a = run_efficacy(&population, &lab, &plan()).expect("first");
    let b = run_efficacy(&population, &lab, &plan()).expect("second");
    assert_eq!(a, b);
    assert_eq!(a.report_hash.len(), 64);
    assert_eq!(a.provenance.plan_hash, plan().plan_hash().expect("plan hash"));
}

#[test]
fn changing_reference_changes_every_contrast() {
    let (population, rows) = study();
    let lab = LabTable::from_rows(rows);
    let mut plan = plan();
    plan.treatments = TreatmentArms::new(["High", "Low", "Placebo"]).expect("arms");
    let report = run_efficacy(&population, &lab, &plan).expect("report");
    let labels: Vec<_> = report
        .comparison_table
        .rows
        .iter()
        .map(|row| row[0].as_str())
        .collect();
    assert_eq!(labels, ["Low vs. High", "Placebo vs. High"]);
    assert_eq!(report.efficacy_table.rows[0][0], "High");
}

#[test]
fn arm_without_subjects_aborts_the_run() {
    let (population, rows) = study();
    let rows: Vec<_> = rows
        .into_iter()
        .filter(|row| !row.usubjid.starts_with("01-702"))
        .collect();
    let err = run_efficacy(&population, &LabTable::from_rows(rows), &plan()).unwrap_err();
    let EffError::SingularDesign(info) = err else {
        panic!("expected singular design, got {err:?}");
    };
    assert_eq!(info.context.get("n[High]").map(String::as_str), Some("0"));
    assert_eq!(info.context.get("n[Low]").map(String::as_str), Some("10"));
}

#[test]
fn empty_group_is_a_warning_in_single_arm_descriptives() {
    let (population, rows) = study();
    let mut plan = plan();
    plan.treatments = TreatmentArms::new(["Placebo", "Low", "High", "Extra"]).expect("arms");
    let err = run_efficacy(&population, &LabTable::from_rows(rows), &plan).unwrap_err();
    assert_eq!(err.info().code, "empty-arm");

    let stats = eff_stats::describe(&[], &plan.treatments);
    assert_eq!(
        eff_stats::empty_group_warnings(&stats)[3],
        AnalysisWarning::EmptyGroup {
            trtp: "Extra".into()
        }
    );
}

#[test]
fn plan_yaml_defaults() {
    let plan: AnalysisPlan =
        from_yaml_slice(b"treatments: [Placebo, Low, High]\n").expect("plan");
    assert_eq!(plan.locf.param, "GLUC");
    assert_eq!(plan.locf.endpoint_week, 24);
    assert_eq!(plan.ancova.confidence_level, 0.95);
    assert_eq!(plan.population_flag, "EFFFL");
    assert_eq!(plan.outputs.comparison, "comparison_table");
    assert_eq!(plan.treatments.reference(), "Placebo");

    let custom: AnalysisPlan = from_yaml_slice(
        b"name: alt-week12\nparam: ALT\nendpoint_week: 12\n\
          confidence_level: 0.9\ntreatments: [Placebo, High]\n",
    )
    .expect("plan");
    assert_eq!(custom.locf.param, "ALT");
    assert_eq!(custom.locf.endpoint_week, 12);
    assert_eq!(custom.ancova.confidence_level, 0.9);
    assert_ne!(custom.plan_hash().expect("hash"), plan.plan_hash().expect("hash"));

    let renamed: AnalysisPlan = from_yaml_slice(
        b"treatments: [Placebo, High]\noutputs:\n  efficacy: t_eff_gluc\n  report: gluc_run\n",
    )
    .expect("plan");
    assert_eq!(renamed.outputs.efficacy, "t_eff_gluc");
    assert_eq!(renamed.outputs.comparison, "comparison_table");
    assert_eq!(renamed.outputs.report, "gluc_run");
}

#[test]
fn invalid_plans_are_rejected() {
    assert!(from_yaml_slice::<AnalysisPlan>(b"treatments: []\n").is_err());
    assert!(from_yaml_slice::<AnalysisPlan>(b"treatments: [A, A]\n").is_err());

    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("plan.yaml");
    std::fs::write(&path, "treatments: [Placebo, Low]\nconfidence_level: 1.2\n").expect("write");
    let err = eff_pipeline::load_plan(&path).unwrap_err();
    assert!(matches!(err, EffError::Config(_)));

    let missing = eff_pipeline::load_plan(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(missing, EffError::Io(_)));
}
