mod common;

use common::{arms, scenario_records};
use eff_stats::{describe, perform_ancova, AncovaOpts};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn results_ignore_record_order(
        order in Just((0..30usize).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let records = scenario_records();
        let shuffled: Vec<_> = order.iter().map(|&idx| records[idx].clone()).collect();
        let opts = AncovaOpts::default();
        let baseline = perform_ancova(&records, &arms(), &opts).expect("fit");
        let permuted = perform_ancova(&shuffled, &arms(), &opts).expect("fit");
        prop_assert_eq!(baseline, permuted);
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let records = scenario_records();
    let a = perform_ancova(&records, &arms(), &AncovaOpts::default()).expect("fit");
    let b = perform_ancova(&records, &arms(), &AncovaOpts::default()).expect("fit");
    assert_eq!(a, b);
    assert_eq!(describe(&records, &arms()), describe(&records, &arms()));
}
