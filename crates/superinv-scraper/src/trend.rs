//! Trend table extractor: one [`TrendObservation`] per quarter row of the
//! history page.

use superinv_core::{TrendObservation, MAX_TOP_TICKERS};

use crate::html::{document_rows, Row};
use crate::normalize::{magnitude_value, quarter_label_to_period};
use crate::security::collect_tickers;

/// Minimum `<td>` cells for a trend row: period, value, top holdings.
const MIN_TREND_CELLS: usize = 3;

/// Extracts trend observations from the history page HTML, in document order.
#[must_use]
pub fn extract_trend(html: &str) -> Vec<TrendObservation> {
    extract_trend_rows(&document_rows(html))
}

/// Maps rows to observations. Rows without a quarter label or with a
/// non-positive total value are skipped.
#[must_use]
pub fn extract_trend_rows(rows: &[Row]) -> Vec<TrendObservation> {
    rows.iter().filter_map(trend_row).collect()
}

fn trend_row(row: &Row) -> Option<TrendObservation> {
    let cells = row.data_cells();
    if cells.len() < MIN_TREND_CELLS {
        return None;
    }

    let Ok(period) = quarter_label_to_period(cells[0]) else {
        tracing::debug!(label = cells[0], "trend row skipped: no quarter label");
        return None;
    };

    let total_value = magnitude_value(cells[1]);
    if total_value <= rust_decimal::Decimal::ZERO {
        tracing::debug!(quarter = %period, raw = cells[1], "trend row skipped: no portfolio value");
        return None;
    }

    let top_tickers = collect_tickers(cells[2], MAX_TOP_TICKERS);
    tracing::debug!(
        quarter = %period,
        total_value = %total_value,
        tickers = top_tickers.len(),
        "trend row accepted"
    );

    Some(TrendObservation {
        period,
        end_date: period.end_date(),
        total_value,
        top_tickers,
    })
}
