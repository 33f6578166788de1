//! Activity log extractor.
//!
//! The activity page interleaves single-cell quarter headers (`Q1 2025`)
//! with trade rows that belong to the most recent header. The scan is a fold
//! over rows in document order carrying an [`ActivityCursor`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use superinv_core::{ActivityEvent, ActivityKind, QuarterPeriod};

use crate::html::{document_rows, Row};
use crate::normalize::{lenient_number, parse_percent, quarter_label_to_period};
use crate::security::extract_security;

/// Minimum `<td>` cells for a trade row.
const MIN_ACTIVITY_CELLS: usize = 4;

const SECURITY_CELL: usize = 1;
const DESCRIPTION_CELL: usize = 2;
const SHARE_CHANGE_CELL: usize = 3;
const PORTFOLIO_IMPACT_CELL: usize = 4;

/// Scan state: the quarter that trade rows are currently attributed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCursor {
    current_quarter: Option<QuarterPeriod>,
}

impl ActivityCursor {
    #[must_use]
    pub fn current_quarter(&self) -> Option<QuarterPeriod> {
        self.current_quarter
    }

    /// Consumes one row and returns the next cursor plus the event the row
    /// produced, if any.
    #[must_use]
    pub fn advance(self, row: &Row) -> (Self, Option<ActivityEvent>) {
        let cells = row.data_cells();

        if let [only] = cells.as_slice() {
            if let Ok(period) = quarter_label_to_period(only) {
                tracing::debug!(quarter = %period, "activity quarter header");
                return (
                    Self {
                        current_quarter: Some(period),
                    },
                    None,
                );
            }
            return (self, None);
        }

        if cells.len() < MIN_ACTIVITY_CELLS {
            return (self, None);
        }

        let Some(period) = self.current_quarter else {
            tracing::debug!("activity row skipped: no quarter header seen yet");
            return (self, None);
        };

        (self, activity_event(period, &cells))
    }
}

/// Extracts activity events from the activity page HTML.
#[must_use]
pub fn extract_activity(html: &str) -> Vec<ActivityEvent> {
    extract_activity_rows(&document_rows(html))
}

/// Runs the quarter cursor over `rows` in order.
#[must_use]
pub fn extract_activity_rows(rows: &[Row]) -> Vec<ActivityEvent> {
    let (_, events) = rows.iter().fold(
        (ActivityCursor::default(), Vec::new()),
        |(cursor, mut events), row| {
            let (next, event) = cursor.advance(row);
            events.extend(event);
            (next, events)
        },
    );
    events
}

/// Classifies an activity description. The first matching keyword wins, in
/// the order `Reduce`, `Add`, `Buy`, `Sell`; matching is case-sensitive.
///
/// `Reduce`/`Add` carry the parsed percentage (negated for `Reduce`, zero
/// when absent); `Buy` is `+100` and `Sell` is `-100`.
#[must_use]
pub fn classify_activity(description: &str) -> (ActivityKind, Decimal) {
    let percent = || parse_percent(description).unwrap_or(Decimal::ZERO);

    if description.contains("Reduce") {
        (ActivityKind::Reduce, -percent())
    } else if description.contains("Add") {
        (ActivityKind::Add, percent())
    } else if description.contains("Buy") {
        (ActivityKind::Buy, Decimal::ONE_HUNDRED)
    } else if description.contains("Sell") {
        (ActivityKind::Sell, -Decimal::ONE_HUNDRED)
    } else {
        (ActivityKind::Unknown, Decimal::ZERO)
    }
}

fn activity_event(period: QuarterPeriod, cells: &[&str]) -> Option<ActivityEvent> {
    let Some(security) = extract_security(cells[SECURITY_CELL]) else {
        tracing::debug!(quarter = %period, raw = cells[SECURITY_CELL], "activity row skipped: no ticker");
        return None;
    };

    let (kind, signed_percent) = classify_activity(cells[DESCRIPTION_CELL]);
    let share_delta = lenient_number(cells[SHARE_CHANGE_CELL])
        .round()
        .to_i64()
        .unwrap_or(0);
    let portfolio_impact_percent = cells
        .get(PORTFOLIO_IMPACT_CELL)
        .map_or(Decimal::ZERO, |c| lenient_number(c));

    tracing::debug!(
        quarter = %period,
        ticker = %security.ticker,
        %kind,
        share_delta,
        "activity row accepted"
    );

    Some(ActivityEvent {
        period,
        company_name: security.display_name().to_owned(),
        ticker: security.ticker,
        kind,
        signed_percent,
        share_delta,
        portfolio_impact_percent,
    })
}
