//! Real-time activity feed normalizer.
//!
//! The feed is a cross-investor table of recent filings with columns
//! `[Transaction Date, Filing, Reporting Name, Activity, Security, Shares,
//! Price, Total]`. Rows are classified, cleaned and deduplicated into
//! [`RealtimeActivity`] records.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use superinv_core::{QuarterPeriod, RealtimeActivity, RealtimeKind};

use crate::html::{extract_tables, Table};
use crate::normalize::{lenient_number, try_parse_loose_date};

static PAREN_TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z][A-Z.]{0,5})\)").expect("valid paren ticker regex"));
static LEADING_TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z.]{0,5}$").expect("valid leading ticker regex"));
static LEGAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),?\s*\b(INC|LLC|LP|LTD|CORP|CORPORATION|MANAGEMENT|CAPITAL|FUND|TRUST)\.?\s*$")
        .expect("valid legal suffix regex")
});
static GENERATION_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),?\s*\b(JR|SR|III|II)\.?$").expect("valid generation suffix regex")
});
static NON_ID_CHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("valid id regex"));

/// Header words that identify the activity table on the feed page.
const TABLE_MARKERS: &[&str] = &["Transaction Date", "Filing", "Reporting Name", "Activity"];

/// Minimum `<td>` cells in a feed row; the total column may be missing.
const MIN_FEED_CELLS: usize = 7;

/// Normalizes the feed page into activities sorted by date, newest first.
///
/// Rows whose date cell does not parse are dropped, as are rows without a
/// resolvable ticker or with a non-positive total. Records sharing
/// date, ticker and total collapse to the first one seen.
#[must_use]
pub fn normalize_realtime(html: &str, today: NaiveDate) -> Vec<RealtimeActivity> {
    let tables = extract_tables(html);
    let activity_tables: Vec<&Table> = tables.iter().filter(|t| is_activity_table(t)).collect();

    if activity_tables.is_empty() {
        tracing::warn!(tables = tables.len(), "no activity table found on feed page");
    }

    let rows = activity_tables
        .iter()
        .flat_map(|t| t.rows.iter())
        .filter_map(|row| feed_row(&row.data_cells(), today));

    let mut activities = dedup_activities(rows);
    activities.sort_by(|a, b| b.date.cmp(&a.date));

    tracing::debug!(activities = activities.len(), "real-time feed normalized");
    activities
}

fn is_activity_table(table: &Table) -> bool {
    let text = table.text();
    TABLE_MARKERS.iter().any(|m| text.contains(m))
}

/// Drops records whose `(date, ticker, total)` was already seen.
pub fn dedup_activities(
    activities: impl IntoIterator<Item = RealtimeActivity>,
) -> Vec<RealtimeActivity> {
    let mut seen: HashSet<(NaiveDate, String, Decimal)> = HashSet::new();
    activities
        .into_iter()
        .filter(|a| seen.insert((a.date, a.ticker.clone(), a.total.normalize())))
        .collect()
}

fn feed_row(cells: &[&str], today: NaiveDate) -> Option<RealtimeActivity> {
    if cells.len() < MIN_FEED_CELLS {
        return None;
    }
    let (raw_date, raw_investor, raw_activity, raw_security) =
        (cells[0], cells[2], cells[3], cells[4]);
    if raw_date.is_empty() || raw_investor.is_empty() || raw_security.is_empty() {
        return None;
    }

    let Ok(date) = try_parse_loose_date(raw_date, today) else {
        tracing::debug!(raw = raw_date, "feed row skipped: unparseable date");
        return None;
    };

    let Some((ticker, company_name)) = split_security(raw_security) else {
        tracing::debug!(security = raw_security, "feed row skipped: no ticker");
        return None;
    };

    let shares = lenient_number(cells[5]);
    let price = lenient_number(cells[6]);
    let reported_total = cells.get(7).map_or(Decimal::ZERO, |c| lenient_number(c));
    let total = if reported_total.is_zero() {
        shares.checked_mul(price).unwrap_or(Decimal::ZERO)
    } else {
        reported_total
    };
    if total <= Decimal::ZERO {
        return None;
    }

    Some(RealtimeActivity {
        id: activity_id(date, raw_investor, raw_security),
        date,
        investor: clean_investor_name(raw_investor),
        activity_kind: normalize_kind(raw_activity),
        ticker,
        company_name,
        shares,
        price,
        total,
        quarter_key: QuarterPeriod::containing(date),
    })
}

/// Stable record id: `dataroma-{date}-{investor}-{security}` with every
/// character outside `[A-Za-z0-9-]` replaced by `-`.
#[must_use]
pub fn activity_id(date: NaiveDate, investor: &str, security: &str) -> String {
    let raw = format!("dataroma-{date}-{investor}-{security}");
    NON_ID_CHAR_RE.replace_all(&raw, "-").into_owned()
}

/// Splits a feed security cell into `(ticker, company name)`.
///
/// A parenthesised `(TICKER)` anywhere in the text wins; otherwise the first
/// token is used if it is an uppercase run. The company name is what
/// remains, or the ticker when nothing does.
#[must_use]
pub fn split_security(security: &str) -> Option<(String, String)> {
    let security = security.trim();

    if let Some(cap) = PAREN_TICKER_RE.captures(security) {
        let ticker = cap[1].to_owned();
        let name = security.replace(&cap[0], " ");
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let name = if name.is_empty() { ticker.clone() } else { name };
        return Some((ticker, name));
    }

    let (first, rest) = security
        .split_once(char::is_whitespace)
        .unwrap_or((security, ""));
    if !LEADING_TICKER_RE.is_match(first) {
        return None;
    }

    let name = rest.trim().trim_start_matches('-').trim();
    let name = if name.is_empty() { first } else { name };
    Some((first.to_owned(), name.to_owned()))
}

/// Maps a free-text activity description onto the closed vocabulary,
/// defaulting to [`RealtimeKind::Buy`].
#[must_use]
pub fn normalize_kind(activity: &str) -> RealtimeKind {
    let lower = activity.to_lowercase();
    if lower.contains("buy") || lower.contains("purchase") {
        RealtimeKind::Buy
    } else if lower.contains("sell") || lower.contains("sale") {
        RealtimeKind::Sell
    } else if lower.contains("new") {
        RealtimeKind::NewPosition
    } else if lower.contains("sold out") {
        RealtimeKind::SoldOut
    } else if lower.contains("increased") {
        RealtimeKind::Increased
    } else if lower.contains("decreased") {
        RealtimeKind::Decreased
    } else {
        RealtimeKind::Buy
    }
}

/// Strips one trailing legal-entity suffix and then one generational suffix.
///
/// `"Himalaya Capital Management LLC"` becomes
/// `"Himalaya Capital Management"`; `"ACKMAN WILLIAM A, JR."` becomes
/// `"ACKMAN WILLIAM A"`.
#[must_use]
pub fn clean_investor_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = {
        let without_legal = LEGAL_SUFFIX_RE.replace(&collapsed, "");
        GENERATION_SUFFIX_RE
            .replace(&without_legal, "")
            .trim()
            .to_owned()
    };

    if cleaned.is_empty() {
        collapsed
    } else {
        cleaned
    }
}

#[cfg(test)]
#[path = "realtime_test.rs"]
mod tests;
