//! On-disk shape of one quarterly snapshot.
//!
//! ```json
//! { "date": "2024-12-31",
//!   "positions": [ { "ticker": "RPRX", "name": "RPRX", "shares": 6775000,
//!                    "value": 677500000, "pseudoIdentifier": "RPRX00000" } ] }
//! ```

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use superinv_core::{QuarterlySnapshot, ReconstructedPosition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub date: NaiveDate,
    pub positions: Vec<StoredPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPosition {
    pub ticker: String,
    pub name: String,
    pub shares: u64,
    /// Whole dollars.
    pub value: i64,
    pub pseudo_identifier: String,
}

impl From<&ReconstructedPosition> for StoredPosition {
    fn from(position: &ReconstructedPosition) -> Self {
        Self {
            ticker: position.ticker.clone(),
            name: position.company_name.clone(),
            shares: position.estimated_shares,
            value: position.estimated_value.trunc().to_i64().unwrap_or(i64::MAX),
            pseudo_identifier: position.pseudo_identifier.clone(),
        }
    }
}

impl From<&QuarterlySnapshot> for StoredSnapshot {
    fn from(snapshot: &QuarterlySnapshot) -> Self {
        Self {
            date: snapshot.as_of,
            positions: snapshot.positions.iter().map(StoredPosition::from).collect(),
        }
    }
}
