//! Field-level parsing primitives shared by every extractor.
//!
//! Each `parse_*` function is total: it returns `Err(Unparsed)` rather than
//! failing the pipeline, so callers can tell a genuine zero apart from a cell
//! that could not be read. The unprefixed wrappers ([`lenient_number`],
//! [`magnitude_value`]) collapse `Unparsed` to zero for extractors that do
//! not care about the difference.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use superinv_core::QuarterPeriod;

static NUMBER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid number prefix regex")
});
static QUARTER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})\s*Q([1-4])\b|\bQ([1-4])\s*(\d{4})\b").expect("valid quarter label regex")
});
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid percent regex"));
static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+([A-Za-z]{3,9})\.?$").expect("valid day-month regex")
});
static DAY_MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+([A-Za-z]{3,9})\.?,?\s+(\d{4})$").expect("valid day-month-year regex")
});
static US_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid US date regex")
});
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid ISO date regex"));

/// A field that could not be interpreted. Carries the raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not parse {0:?}")]
pub struct Unparsed(pub String);

impl Unparsed {
    fn of(text: &str) -> Self {
        Self(text.to_owned())
    }
}

/// Parses a US-formatted number out of arbitrary text.
///
/// Every character other than digits, `,`, `.` and `-` is dropped, commas are
/// treated as thousands separators, and the longest leading numeric prefix of
/// what remains is taken. `"$1,234.5 M"` is `1234.5`; `"12-5"` is `12`.
///
/// # Errors
///
/// Returns [`Unparsed`] when no numeric prefix remains.
pub fn parse_lenient_number(text: &str) -> Result<Decimal, Unparsed> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();

    let prefix = NUMBER_PREFIX_RE
        .find(&cleaned)
        .map(|m| m.as_str().trim_end_matches('.'))
        .filter(|s| !s.is_empty() && *s != "-")
        .ok_or_else(|| Unparsed::of(text))?;

    let canonical = match prefix.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        None if prefix.starts_with('.') => format!("0{prefix}"),
        _ => prefix.to_owned(),
    };

    Decimal::from_str(&canonical).map_err(|_| Unparsed::of(text))
}

/// [`parse_lenient_number`] with `0` for unparseable input.
#[must_use]
pub fn lenient_number(text: &str) -> Decimal {
    parse_lenient_number(text).unwrap_or(Decimal::ZERO)
}

/// Parses a number with an optional `B`/`M`/`K` magnitude marker.
///
/// The marker is detected case-insensitively anywhere in `text`, checked in
/// `B`, `M`, `K` order. Without a marker the literal value is returned.
///
/// # Errors
///
/// Returns [`Unparsed`] when the numeric part does not parse, or when the
/// scaled value overflows.
pub fn parse_magnitude_value(text: &str) -> Result<Decimal, Unparsed> {
    let number = parse_lenient_number(text)?;
    if number.is_zero() {
        return Ok(number);
    }

    let upper = text.to_ascii_uppercase();
    let scale: i64 = if upper.contains('B') {
        1_000_000_000
    } else if upper.contains('M') {
        1_000_000
    } else if upper.contains('K') {
        1_000
    } else {
        1
    };

    number
        .checked_mul(Decimal::from(scale))
        .ok_or_else(|| Unparsed::of(text))
}

/// [`parse_magnitude_value`] with `0` for unparseable input.
#[must_use]
pub fn magnitude_value(text: &str) -> Decimal {
    parse_magnitude_value(text).unwrap_or(Decimal::ZERO)
}

/// Parses the first `NN.NN%` occurrence in `text`, unsigned.
///
/// # Errors
///
/// Returns [`Unparsed`] when `text` contains no percentage.
pub fn parse_percent(text: &str) -> Result<Decimal, Unparsed> {
    PERCENT_RE
        .captures(text)
        .and_then(|cap| Decimal::from_str(&cap[1]).ok())
        .ok_or_else(|| Unparsed::of(text))
}

/// Finds a quarter label in either `"2024 Q4"` or `"Q4 2024"` order.
///
/// # Errors
///
/// Returns [`Unparsed`] when no label with a quarter in `1..=4` is present.
pub fn quarter_label_to_period(label: &str) -> Result<QuarterPeriod, Unparsed> {
    let cap = QUARTER_LABEL_RE
        .captures(label)
        .ok_or_else(|| Unparsed::of(label))?;

    let (year, quarter) = match (cap.get(1), cap.get(2)) {
        (Some(y), Some(q)) => (y.as_str(), q.as_str()),
        _ => match (cap.get(4), cap.get(3)) {
            (Some(y), Some(q)) => (y.as_str(), q.as_str()),
            _ => return Err(Unparsed::of(label)),
        },
    };

    let year: i32 = year.parse().map_err(|_| Unparsed::of(label))?;
    let quarter: u8 = quarter.parse().map_err(|_| Unparsed::of(label))?;
    QuarterPeriod::new(year, quarter).ok_or_else(|| Unparsed::of(label))
}

/// End-of-quarter date for a quarter label, or `None` if there is no label.
#[must_use]
pub fn quarter_label_to_date(label: &str) -> Option<NaiveDate> {
    quarter_label_to_period(label).ok().map(|p| p.end_date())
}

/// Formats `period` the way the source labels trend rows: `"2024 Q4"`.
#[must_use]
pub fn quarter_label(period: QuarterPeriod) -> String {
    format!("{} Q{}", period.year(), period.quarter())
}

/// Result of [`parse_loose_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooseDate {
    /// The text matched one of the supported forms.
    Parsed(NaiveDate),
    /// Nothing matched; the value is the caller's "today". Treat as degraded.
    Fallback(NaiveDate),
}

impl LooseDate {
    #[must_use]
    pub fn date(self) -> NaiveDate {
        match self {
            LooseDate::Parsed(d) | LooseDate::Fallback(d) => d,
        }
    }

    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, LooseDate::Fallback(_))
    }
}

/// Parses `"D MMM"` (in `today`'s year), `"D MMM YYYY"`, `"M/D/YYYY"` or
/// `"YYYY-MM-DD"`, tried in that order against the whole trimmed field.
///
/// # Errors
///
/// Returns [`Unparsed`] when no form matches or the matched fields do not
/// form a calendar date.
pub fn try_parse_loose_date(text: &str, today: NaiveDate) -> Result<NaiveDate, Unparsed> {
    use chrono::Datelike;

    let trimmed = text.trim();

    if let Some(cap) = DAY_MONTH_RE.captures(trimmed) {
        if let Some(date) = ymd(today.year(), month_from_name(&cap[2]), cap[1].parse().ok()) {
            return Ok(date);
        }
    }
    if let Some(cap) = DAY_MONTH_YEAR_RE.captures(trimmed) {
        if let Some(date) = ymd_str(&cap[3], month_from_name(&cap[2]), &cap[1]) {
            return Ok(date);
        }
    }
    if let Some(cap) = US_DATE_RE.captures(trimmed) {
        if let Some(date) = ymd_str(&cap[3], cap[1].parse().ok(), &cap[2]) {
            return Ok(date);
        }
    }
    if let Some(cap) = ISO_DATE_RE.captures(trimmed) {
        if let Some(date) = ymd_str(&cap[1], cap[2].parse().ok(), &cap[3]) {
            return Ok(date);
        }
    }

    Err(Unparsed::of(text))
}

/// [`try_parse_loose_date`] that never blocks the pipeline: unmatched input
/// yields [`LooseDate::Fallback`] carrying `today`.
#[must_use]
pub fn parse_loose_date(text: &str, today: NaiveDate) -> LooseDate {
    match try_parse_loose_date(text, today) {
        Ok(date) => LooseDate::Parsed(date),
        Err(_) => LooseDate::Fallback(today),
    }
}

fn ymd(year: i32, month: Option<u32>, day: Option<u32>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month?, day?)
}

fn ymd_str(year: &str, month: Option<u32>, day: &str) -> Option<NaiveDate> {
    ymd(year.parse().ok()?, month, day.parse().ok())
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Full month name or its three-letter abbreviation (`Sept` too).
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    let index = MONTHS.iter().position(|full| {
        *full == name
            || full.get(..3) == Some(name.as_str())
            || (*full == "september" && name == "sept")
    })?;
    u32::try_from(index + 1).ok()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
