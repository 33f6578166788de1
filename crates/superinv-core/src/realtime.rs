//! Output records of the real-time activity feed.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::QuarterPeriod;

/// Closed vocabulary for real-time feed activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealtimeKind {
    Buy,
    Sell,
    #[serde(rename = "New Position")]
    NewPosition,
    #[serde(rename = "Sold Out")]
    SoldOut,
    Increased,
    Decreased,
}

impl fmt::Display for RealtimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RealtimeKind::Buy => "Buy",
            RealtimeKind::Sell => "Sell",
            RealtimeKind::NewPosition => "New Position",
            RealtimeKind::SoldOut => "Sold Out",
            RealtimeKind::Increased => "Increased",
            RealtimeKind::Decreased => "Decreased",
        };
        f.write_str(s)
    }
}

/// One normalized row of the real-time activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeActivity {
    pub id: String,
    pub date: NaiveDate,
    pub investor: String,
    pub activity_kind: RealtimeKind,
    pub ticker: String,
    pub company_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub shares: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub quarter_key: QuarterPeriod,
}
