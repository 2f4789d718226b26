#![allow(dead_code)]

use eff_core::TreatmentArms;
use eff_locf::AnalysisRecord;

pub const ARMS: [&str; 3] = ["Placebo", "Low", "High"];
const EFFECT: [i64; 3] = [0, -2, -12];
const HALF_EFFECT: [i64; 3] = [0, -1, -6];

pub fn arms() -> TreatmentArms {
    TreatmentArms::new(ARMS).expect("arms")
}

pub fn record(usubjid: &str, trtp: &str, base: f64, endpoint: f64) -> AnalysisRecord {
    AnalysisRecord {
        usubjid: usubjid.to_string(),
        trtp: trtp.to_string(),
        base,
        baseline: base,
        endpoint,
        change: endpoint - base,
        last_visit: 24,
    }
}

/// Ten subjects per arm with integer data; the last subject of each arm
/// has its endpoint carried from week 16.
pub fn scenario_records() -> Vec<AnalysisRecord> {
    let mut records = Vec::new();
    for (k, arm) in ARMS.iter().enumerate() {
        let k = k as i64;
        for i in 0..10i64 {
            let base = 90 + 2 * i + (3 * i * i + 5 * k) % 11;
            let noise = (7 * i + 3 * k) % 9 - 4;
            let week16 = base + HALF_EFFECT[k as usize] + i % 4;
            let week24 = base + EFFECT[k as usize] + noise;
            let endpoint = if i == 9 { week16 } else { week24 };
            records.push(record(
                &format!("{}-{:02}", &arm[..1], i),
                arm,
                base as f64,
                endpoint as f64,
            ));
        }
    }
    records
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-8 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}
