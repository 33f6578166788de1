//! Current holdings extractor for an investor's latest reported portfolio.
//!
//! Unlike the trend/activity pair, this page reports shares and values
//! directly, so no estimation is involved.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use superinv_core::{pseudo_identifier, QuarterPeriod, QuarterlySnapshot, ReconstructedPosition};

use crate::html::{extract_tables, page_text, Row};
use crate::normalize::{lenient_number, magnitude_value, quarter_label_to_period, try_parse_loose_date};
use crate::security::extract_security;

static PORTFOLIO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Portfolio date:\s*(\d{1,2}\s+[A-Za-z]{3,9}\.?,?(?:\s+\d{4})?|\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})",
    )
    .expect("valid portfolio date regex")
});
static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Period:\s*(Q[1-4]\s*\d{4}|\d{4}\s*Q[1-4])").expect("valid period regex")
});

/// Minimum cells in a holdings row.
const MIN_HOLDINGS_CELLS: usize = 7;

const SECURITY_CELL: usize = 1;
const SHARES_CELL: usize = 4;
const PRICE_CELL: usize = 5;
const VALUE_CELL: usize = 6;

/// Positions at or below this value are treated as noise.
pub const MIN_POSITION_VALUE: i64 = 50_000;

/// How the reporting quarter of a holdings page was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSource {
    PortfolioDate,
    PeriodLabel,
    /// Neither marker was found; the quarter containing "today" was used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentHoldings {
    pub period: QuarterPeriod,
    pub period_source: PeriodSource,
    /// Sorted by value descending.
    pub positions: Vec<ReconstructedPosition>,
}

impl CurrentHoldings {
    /// Wraps the positions as a snapshot dated at the quarter end. Returns
    /// `None` when there are no positions.
    #[must_use]
    pub fn into_snapshot(self, investor_slug: &str) -> Option<QuarterlySnapshot> {
        if self.positions.is_empty() {
            return None;
        }
        Some(QuarterlySnapshot {
            investor_slug: investor_slug.to_owned(),
            period: self.period,
            as_of: self.period.end_date(),
            positions: self.positions,
        })
    }
}

/// Extracts the latest holdings from a holdings page.
///
/// Tables are tried in document order and the first one that yields any
/// position is used.
#[must_use]
pub fn extract_current_holdings(html: &str, today: NaiveDate) -> CurrentHoldings {
    let (period, period_source) = detect_period(&page_text(html), today);

    let mut positions = extract_tables(html)
        .iter()
        .map(|table| {
            table
                .rows
                .iter()
                .filter_map(holding_row)
                .collect::<Vec<_>>()
        })
        .find(|positions| !positions.is_empty())
        .unwrap_or_default();

    positions.sort_by(|a, b| b.estimated_value.cmp(&a.estimated_value));

    tracing::debug!(
        quarter = %period,
        ?period_source,
        positions = positions.len(),
        "current holdings extracted"
    );

    CurrentHoldings {
        period,
        period_source,
        positions,
    }
}

/// Reporting quarter from `Portfolio date: ...` or `Period: ...` markers in
/// the page text, falling back to the quarter containing `today`.
#[must_use]
pub fn detect_period(text: &str, today: NaiveDate) -> (QuarterPeriod, PeriodSource) {
    let from_date = PORTFOLIO_DATE_RE
        .captures(text)
        .and_then(|cap| try_parse_loose_date(&cap[1], today).ok())
        .map(QuarterPeriod::containing);
    if let Some(period) = from_date {
        return (period, PeriodSource::PortfolioDate);
    }

    let from_label = PERIOD_RE
        .captures(text)
        .and_then(|cap| quarter_label_to_period(&cap[1]).ok());
    if let Some(period) = from_label {
        return (period, PeriodSource::PeriodLabel);
    }

    let period = QuarterPeriod::containing(today);
    tracing::warn!(quarter = %period, "holdings page has no period marker; using current quarter");
    (period, PeriodSource::Fallback)
}

fn holding_row(row: &Row) -> Option<ReconstructedPosition> {
    let cells = row.all_cells();
    if cells.len() < MIN_HOLDINGS_CELLS {
        return None;
    }

    let security = extract_security(cells[SECURITY_CELL])?;
    let shares = lenient_number(cells[SHARES_CELL]);
    let price = magnitude_value(cells[PRICE_CELL]);

    let product = if shares > Decimal::ZERO && price > Decimal::ZERO {
        shares.checked_mul(price).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let value = if product.is_zero() {
        magnitude_value(cells[VALUE_CELL])
    } else {
        product
    };

    if value <= Decimal::from(MIN_POSITION_VALUE) {
        tracing::debug!(ticker = %security.ticker, %value, "holding skipped: below minimum value");
        return None;
    }

    Some(ReconstructedPosition {
        pseudo_identifier: pseudo_identifier(&security.ticker),
        company_name: security.display_name().to_owned(),
        estimated_shares: shares.round().to_u64().unwrap_or(0),
        estimated_value: value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        ticker: security.ticker,
    })
}
