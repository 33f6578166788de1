//! Fiscal quarter value type.
//!
//! A [`QuarterPeriod`] is the join key between the trend table and the
//! activity log. Its canonical string form is `"YYYY-QN"` and its calendar
//! end-date comes from a fixed table (`Q1 → 03-31`, `Q2 → 06-30`,
//! `Q3 → 09-30`, `Q4 → 12-31`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A (year, quarter) pair. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuarterPeriod {
    year: i32,
    quarter: u8,
}

impl QuarterPeriod {
    /// Returns `None` unless `quarter` is in `1..=4`.
    #[must_use]
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        (1..=4).contains(&quarter).then_some(Self { year, quarter })
    }

    /// The quarter that contains `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        // month0 is 0..=11, so the quotient is always 0..=3
        let quarter = u8::try_from(date.month0() / 3 + 1).unwrap_or(1);
        Self {
            year: date.year(),
            quarter,
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Canonical `"YYYY-QN"` key, used for output file names.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Last calendar day of the quarter.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        let (month, day) = match self.quarter {
            1 => (3, 31),
            2 => (6, 30),
            3 => (9, 30),
            _ => (12, 31),
        };
        NaiveDate::from_ymd_opt(self.year, month, day).unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for QuarterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

/// Error returned when a string is not a canonical `"YYYY-QN"` key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid quarter key: {0:?}")]
pub struct InvalidQuarterKey(pub String);

impl FromStr for QuarterPeriod {
    type Err = InvalidQuarterKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidQuarterKey(s.to_string());
        let (year, quarter) = s.split_once("-Q").ok_or_else(invalid)?;
        if year.len() != 4 || quarter.len() != 1 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let quarter = quarter.parse::<u8>().map_err(|_| invalid())?;
        Self::new(year, quarter).ok_or_else(invalid)
    }
}

impl TryFrom<String> for QuarterPeriod {
    type Error = InvalidQuarterKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuarterPeriod> for String {
    fn from(value: QuarterPeriod) -> Self {
        value.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_out_of_range_quarter() {
        assert!(QuarterPeriod::new(2024, 0).is_none());
        assert!(QuarterPeriod::new(2024, 5).is_none());
    }

    #[test]
    fn key_is_zero_padded() {
        assert_eq!(QuarterPeriod::new(2024, 4).unwrap().key(), "2024-Q4");
        assert_eq!(QuarterPeriod::new(999, 1).unwrap().key(), "0999-Q1");
    }

    #[test]
    fn end_dates_follow_fixed_table() {
        let ends: Vec<NaiveDate> = (1..=4)
            .map(|q| QuarterPeriod::new(2023, q).unwrap().end_date())
            .collect();
        assert_eq!(
            ends,
            vec![
                date(2023, 3, 31),
                date(2023, 6, 30),
                date(2023, 9, 30),
                date(2023, 12, 31)
            ]
        );
    }

    #[test]
    fn containing_maps_month_to_quarter() {
        assert_eq!(QuarterPeriod::containing(date(2024, 1, 1)).key(), "2024-Q1");
        assert_eq!(QuarterPeriod::containing(date(2024, 6, 30)).key(), "2024-Q2");
        assert_eq!(QuarterPeriod::containing(date(2024, 7, 1)).key(), "2024-Q3");
        assert_eq!(QuarterPeriod::containing(date(2024, 12, 31)).key(), "2024-Q4");
    }

    #[test]
    fn parses_canonical_key() {
        let p: QuarterPeriod = "2019-Q3".parse().unwrap();
        assert_eq!((p.year(), p.quarter()), (2019, 3));
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["2019Q3", "2019-Q5", "19-Q3", "2019-Q", "Q3-2019", ""] {
            assert!(bad.parse::<QuarterPeriod>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn orders_chronologically() {
        let a = QuarterPeriod::new(2023, 4).unwrap();
        let b = QuarterPeriod::new(2024, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn serializes_as_key_string() {
        let p = QuarterPeriod::new(2024, 2).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"2024-Q2\"");
        let back: QuarterPeriod = serde_json::from_str("\"2024-Q2\"").unwrap();
        assert_eq!(back, p);
    }
}
