mod common;

use common::{arms, assert_close, record, scenario_records};
use eff_core::TreatmentArms;
use eff_stats::{describe, empty_group_warnings, AnalysisWarning, Summary};

#[test]
fn scenario_descriptives_match_hand_computation() {
    let stats = describe(&scenario_records(), &arms());
    let labels: Vec<_> = stats.iter().map(|s| s.trtp.as_str()).collect();
    assert_eq!(labels, ["Placebo", "Low", "High"]);

    let placebo = &stats[0];
    assert_eq!(placebo.n, 10);
    assert_close(placebo.baseline.mean.expect("mean"), 103.1);
    assert_close(placebo.baseline.sd.expect("sd"), 7.651434142985512);
    assert_close(placebo.endpoint.mean.expect("mean"), 103.2);
    assert_close(placebo.change.sd.expect("sd"), 2.601281735350223);

    let high = &stats[2];
    assert_close(high.change.mean.expect("mean"), -11.3);
    assert_close(high.endpoint.sd.expect("sd"), 8.04777401935881);
}

#[test]
fn counts_add_up_to_analysis_set() {
    let records = scenario_records();
    let stats = describe(&records, &arms());
    assert_eq!(stats.iter().map(|s| s.n).sum::<usize>(), records.len());
}

#[test]
fn empty_groups_report_missing_statistics() {
    let records = vec![
        record("P-01", "Placebo", 100.0, 98.0),
        record("P-02", "Placebo", 102.0, 99.0),
    ];
    let stats = describe(&records, &arms());
    let low = &stats[1];
    assert_eq!(low.n, 0);
    assert_eq!(low.baseline.mean, None);
    assert_eq!(low.baseline.sd, None);
    assert_eq!(low.change.mean, None);
    assert_eq!(
        empty_group_warnings(&stats),
        vec![
            AnalysisWarning::EmptyGroup { trtp: "Low".into() },
            AnalysisWarning::EmptyGroup { trtp: "High".into() },
        ]
    );
}

#[test]
fn single_subject_has_mean_but_no_sd() {
    let arms = TreatmentArms::new(["Placebo"]).expect("arms");
    let stats = describe(&[record("P-01", "Placebo", 100.0, 94.0)], &arms);
    assert_eq!(stats[0].change.mean, Some(-6.0));
    assert_eq!(stats[0].change.sd, None);
}

#[test]
fn summary_of_values() {
    let summary = Summary::of([2.0, 4.0, 6.0]);
    assert_eq!(summary.n, 3);
    assert_eq!(summary.mean, Some(4.0));
    assert_eq!(summary.sd, Some(2.0));
}
