use rust_decimal::Decimal;
use superinv_core::{pseudo_identifier, ReconstructedPosition};

use super::*;

fn period(year: i32, quarter: u8) -> QuarterPeriod {
    QuarterPeriod::new(year, quarter).unwrap()
}

fn position(ticker: &str, value: i64) -> ReconstructedPosition {
    ReconstructedPosition {
        pseudo_identifier: pseudo_identifier(ticker),
        company_name: format!("{ticker} Corp"),
        estimated_shares: 1_000,
        estimated_value: Decimal::from(value),
        ticker: ticker.to_string(),
    }
}

fn snapshot(p: QuarterPeriod, positions: Vec<ReconstructedPosition>) -> QuarterlySnapshot {
    QuarterlySnapshot {
        investor_slug: "pabrai".to_string(),
        period: p,
        as_of: p.end_date(),
        positions,
    }
}

#[tokio::test]
async fn writes_record_under_folder_and_quarter_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());

    let path = store
        .write_snapshot("pabrai", &snapshot(period(2024, 4), vec![position("MU", 500_000)]))
        .await
        .unwrap()
        .expect("non-empty snapshot is written");

    assert_eq!(path, dir.path().join("pabrai").join("2024-Q4.json"));
    let record = store.read_snapshot("pabrai", period(2024, 4)).await.unwrap().unwrap();
    assert_eq!(record.date.to_string(), "2024-12-31");
    assert_eq!(record.positions[0].ticker, "MU");
    assert_eq!(record.positions[0].value, 500_000);
}

#[tokio::test]
async fn rewrite_fully_replaces_previous_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let q = period(2023, 2);

    store
        .write_snapshot("pabrai", &snapshot(q, vec![position("AAA", 3), position("BBB", 2)]))
        .await
        .unwrap();
    store
        .write_snapshot("pabrai", &snapshot(q, vec![position("CCC", 9)]))
        .await
        .unwrap();

    let record = store.read_snapshot("pabrai", q).await.unwrap().unwrap();
    let tickers: Vec<&str> = record.positions.iter().map(|p| p.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["CCC"]);
}

#[tokio::test]
async fn empty_snapshot_never_overwrites_existing_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let q = period(2022, 1);

    store
        .write_snapshot("pabrai", &snapshot(q, vec![position("AAA", 3)]))
        .await
        .unwrap();
    let written = store
        .write_snapshot("pabrai", &snapshot(q, Vec::new()))
        .await
        .unwrap();

    assert!(written.is_none());
    let record = store.read_snapshot("pabrai", q).await.unwrap().unwrap();
    assert_eq!(record.positions.len(), 1);
}

#[tokio::test]
async fn missing_record_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    assert!(store.read_snapshot("nobody", period(2020, 1)).await.unwrap().is_none());
    assert!(store.list_quarters("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn lists_quarters_oldest_first_and_ignores_other_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    for q in [period(2024, 4), period(2023, 1), period(2024, 1)] {
        store
            .write_snapshot("lilu", &snapshot(q, vec![position("RPRX", 1)]))
            .await
            .unwrap();
    }
    std::fs::write(dir.path().join("lilu").join("notes.txt"), "x").unwrap();
    std::fs::write(dir.path().join("lilu").join("latest.json"), "{}").unwrap();

    let keys: Vec<String> = store
        .list_quarters("lilu")
        .await
        .unwrap()
        .iter()
        .map(QuarterPeriod::key)
        .collect();
    assert_eq!(keys, vec!["2023-Q1", "2024-Q1", "2024-Q4"]);
}

#[test]
fn rejects_folders_that_escape_the_root() {
    let store = SnapshotStore::new("/tmp/out");
    for folder in ["", "../etc", "a/b", "a\\b", ".hidden"] {
        assert!(
            matches!(
                store.snapshot_path(folder, period(2024, 1)),
                Err(StoreError::InvalidFolder(_))
            ),
            "folder {folder:?} should be rejected"
        );
    }
}
