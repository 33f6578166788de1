//! Quarterly holdings domain types.
//!
//! [`TrendObservation`] and [`ActivityEvent`] are the in-memory products of
//! the two table extractors; [`QuarterlySnapshot`] is the only durable
//! artifact and is what the snapshot store writes.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::QuarterPeriod;

/// Length of the pseudo identifier derived from a ticker.
pub const PSEUDO_IDENTIFIER_LEN: usize = 9;

/// Maximum number of tickers kept from a trend-table top-holdings cell.
pub const MAX_TOP_TICKERS: usize = 10;

/// One accepted row of the multi-quarter trend table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendObservation {
    pub period: QuarterPeriod,
    pub end_date: NaiveDate,
    pub total_value: Decimal,
    /// Document order, at most [`MAX_TOP_TICKERS`] entries.
    pub top_tickers: Vec<String>,
}

impl TrendObservation {
    #[must_use]
    pub fn quarter_key(&self) -> String {
        self.period.key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Buy,
    Sell,
    Add,
    Reduce,
    Unknown,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityKind::Buy => "Buy",
            ActivityKind::Sell => "Sell",
            ActivityKind::Add => "Add",
            ActivityKind::Reduce => "Reduce",
            ActivityKind::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A single buy/sell/add/reduce entry from the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub period: QuarterPeriod,
    pub ticker: String,
    pub company_name: String,
    pub kind: ActivityKind,
    pub signed_percent: Decimal,
    pub share_delta: i64,
    pub portfolio_impact_percent: Decimal,
}

impl ActivityEvent {
    #[must_use]
    pub fn quarter_key(&self) -> String {
        self.period.key()
    }
}

/// An estimated, priced holding synthesized by the reconstruction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedPosition {
    pub pseudo_identifier: String,
    pub company_name: String,
    pub estimated_shares: u64,
    /// Whole dollars.
    pub estimated_value: Decimal,
    pub ticker: String,
}

/// Reconstructed positions for one investor and one quarter.
///
/// `positions` is never empty and is sorted by `estimated_value` descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterlySnapshot {
    pub investor_slug: String,
    pub period: QuarterPeriod,
    pub as_of: NaiveDate,
    pub positions: Vec<ReconstructedPosition>,
}

impl QuarterlySnapshot {
    #[must_use]
    pub fn quarter_key(&self) -> String {
        self.period.key()
    }

    /// Sum of all position values.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.positions.iter().map(|p| p.estimated_value).sum()
    }
}

/// Derives the placeholder security identifier for `ticker`: the ticker
/// right-padded with `0` and cut to [`PSEUDO_IDENTIFIER_LEN`] characters.
///
/// This is not a real CUSIP; it only gives downstream consumers a stable
/// nine-character key.
#[must_use]
pub fn pseudo_identifier(ticker: &str) -> String {
    ticker
        .chars()
        .chain(std::iter::repeat('0'))
        .take(PSEUDO_IDENTIFIER_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_identifier_pads_short_tickers() {
        assert_eq!(pseudo_identifier("RPRX"), "RPRX00000");
        assert_eq!(pseudo_identifier("V"), "V00000000");
    }

    #[test]
    fn pseudo_identifier_truncates_long_input() {
        assert_eq!(pseudo_identifier("ABCDEFGHIJ"), "ABCDEFGHI");
    }

    #[test]
    fn pseudo_identifier_keeps_dots() {
        assert_eq!(pseudo_identifier("BRK.B"), "BRK.B0000");
    }

    #[test]
    fn snapshot_total_value_sums_positions() {
        let period = QuarterPeriod::new(2024, 4).unwrap();
        let pos = |ticker: &str, value: i64| ReconstructedPosition {
            pseudo_identifier: pseudo_identifier(ticker),
            company_name: ticker.to_string(),
            estimated_shares: 1,
            estimated_value: Decimal::from(value),
            ticker: ticker.to_string(),
        };
        let snapshot = QuarterlySnapshot {
            investor_slug: "lilu".to_string(),
            period,
            as_of: period.end_date(),
            positions: vec![pos("A", 300), pos("B", 200)],
        };
        assert_eq!(snapshot.total_value(), Decimal::from(500));
        assert_eq!(snapshot.quarter_key(), "2024-Q4");
    }
}
