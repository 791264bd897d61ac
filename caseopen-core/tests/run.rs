use std::fs;
use std::path::PathBuf;

use caseopen_core::{run, CaseError, OpenerSettings};

fn bundled_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets/cases.json")
}

fn settings(catalog_path: PathBuf) -> OpenerSettings {
    OpenerSettings {
        catalog_path,
        count: 10,
        currency_index: 0,
        seed: Some(1234),
        batches: 1,
    }
}

#[test]
fn opens_bundled_case() {
    let summary = run(&settings(bundled_catalog())).unwrap();
    assert_eq!(summary.seed, 1234);
    assert_eq!(summary.reports.len(), 1);

    let report = &summary.reports[0];
    assert_eq!(report.price_line, "Total Price: EUR 23.50");
    assert_eq!(report.log_lines.len(), 10);
    assert!(report.failure_lines.is_empty());
    assert!(report.currency_line.is_none());
    assert!(report.log_lines[0].text.starts_with("Case 1: "));
    assert!(report.log_lines.iter().all(|line| line.rarity.is_some()));
}

#[test]
fn same_seed_replays_same_log() {
    let first = run(&settings(bundled_catalog())).unwrap();
    let second = run(&settings(bundled_catalog())).unwrap();
    assert_eq!(first.reports[0].log_lines, second.reports[0].log_lines);
}

#[test]
fn repeated_batches_share_one_session() {
    let mut opts = settings(bundled_catalog());
    opts.count = 5;
    opts.batches = 3;
    opts.currency_index = 1;

    let summary = run(&opts).unwrap();

    assert_eq!(summary.reports.len(), 3);
    let last = &summary.reports[2];
    assert_eq!(last.price_line, "Total Price: USD 12.50");
    assert_eq!(last.log_lines.len(), 15);
    assert!(last.log_lines[14].text.starts_with("Case 15: "));
    for report in &summary.reports {
        let rarity_total: u64 = report
            .rarity_lines
            .iter()
            .map(|line| line.text.rsplit(": ").next().unwrap().parse::<u64>().unwrap())
            .sum();
        assert_eq!(rarity_total, 5);
    }
}

#[test]
fn unreadable_catalog_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("cases.json");
    fs::write(&broken, "{ not json").unwrap();

    assert!(matches!(
        run(&settings(broken)),
        Err(CaseError::CatalogLoadFailure { .. })
    ));
    assert!(matches!(
        run(&settings(dir.path().join("missing.json"))),
        Err(CaseError::CatalogLoadFailure { .. })
    ));
}

#[test]
fn catalog_without_a_rarity_skips_those_draws() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.json");
    fs::write(
        &path,
        r#"{"case": {"skins": [{"name": "Only Gray", "rarity": "MilSpec"}]}}"#,
    )
    .unwrap();

    let mut opts = settings(path);
    opts.count = 500;
    let summary = run(&opts).unwrap();

    let report = &summary.reports[0];
    assert!(!report.failure_lines.is_empty());
    assert_eq!(report.log_lines.len() + report.failure_lines.len(), 500);
    assert!(report.log_lines.iter().all(|line| line.text.ends_with("Only Gray")));
}

#[test]
fn zero_batches_or_count_is_refused() {
    let mut opts = settings(bundled_catalog());
    opts.batches = 0;
    assert!(matches!(run(&opts), Err(CaseError::Config(_))));

    let mut opts = settings(bundled_catalog());
    opts.count = 0;
    assert!(matches!(run(&opts), Err(CaseError::InvalidBatchSize { .. })));
}

#[test]
fn unknown_currency_selector_is_reported() {
    let mut opts = settings(bundled_catalog());
    opts.currency_index = 7;

    let summary = run(&opts).unwrap();

    let report = &summary.reports[0];
    assert_eq!(report.price_line, "Total Price: #7 0.00");
    assert_eq!(
        report.currency_line.as_deref(),
        Some("Price not calculated: currency not supported: '#7'")
    );
    assert_eq!(report.log_lines.len(), 10);
}
