//! End-to-end tests for the ingest -> score -> report pipeline.

use dagr_rs::core::config::ReportFormat;
use dagr_rs::core::scoring::{AnomalyScorer, DayKind};
use dagr_rs::io::{ingest, reports::ReportGenerator};
use dagr_rs::DagrConfig;
use tempfile::tempdir;

#[test]
fn scores_a_flat_file_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("birthdays.dat");
    std::fs::write(&path, "0101 40\n0102 35\n0229 9\n1231 44\n").unwrap();

    let config = DagrConfig::default();
    let counts = ingest::load_counts(&path, &config).unwrap();
    assert_eq!(counts.len(), 366);
    assert_eq!(counts.total(), 128.0);

    let scorer = AnomalyScorer::new(&config).unwrap();
    let report = scorer.score_days(counts.as_slice()).unwrap();

    assert_eq!(report.days.len(), 366);
    assert_eq!(report.total_observed, 128.0);
    assert_eq!(report.degrees_of_freedom, 365);

    let sum: f64 = report.z_squared().iter().sum();
    assert_eq!(report.chi_square, sum);
}

#[test]
fn approximate_bucketing_puts_feb_29_past_the_leap_slot() {
    // The compatibility bucketing maps 0229 to (2-1)*31 + 29 = 60, so the
    // counts do not land on the slot scored with the leap parameters.
    let config = DagrConfig::default();
    let counts = ingest::parse_counts("0229 10\n", "inline", &config).unwrap();

    let report = AnomalyScorer::new(&config)
        .unwrap()
        .score_days(counts.as_slice())
        .unwrap();

    assert_eq!(report.days[60].observed, 10.0);
    assert_eq!(report.days[60].kind, DayKind::Ordinary);
    assert_eq!(report.days[59].observed, 0.0);
}

#[test]
fn calendar_accurate_bucketing_aligns_feb_29_with_the_leap_slot() {
    let config = DagrConfig::default().with_calendar_accurate(true);
    let counts = ingest::parse_counts("0229 10\n", "inline", &config).unwrap();

    let report = AnomalyScorer::new(&config)
        .unwrap()
        .score_days(counts.as_slice())
        .unwrap();

    assert_eq!(report.days[59].observed, 10.0);
    assert_eq!(report.days[59].kind, DayKind::Leap);
}

#[test]
fn written_report_round_trips_the_summary() {
    let config = DagrConfig::default();
    let counts = ingest::parse_counts("0101 40\n0315 12\n", "inline", &config).unwrap();
    let report = AnomalyScorer::new(&config)
        .unwrap()
        .score_days(counts.as_slice())
        .unwrap();

    let dir = tempdir().unwrap();
    let path = ReportGenerator::new(config)
        .write_report(&report, dir.path(), ReportFormat::Json)
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(
        value["summary"]["chi_square"].as_f64().unwrap(),
        report.chi_square
    );
    assert_eq!(
        value["summary"]["significant_day_count"].as_u64().unwrap() as usize,
        report.significant_days().len()
    );
}
