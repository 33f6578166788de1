//! The real-time activity feed file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use superinv_core::RealtimeActivity;

use crate::{write_json_atomic, StoreError};

/// File name of the feed, directly under the output root.
pub const REALTIME_FEED_FILE: &str = "realtime-activity.json";

const FEED_SOURCE: &str = "dataroma-realtime";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeFeed {
    pub last_updated: DateTime<Utc>,
    pub source: String,
    pub total_activities: usize,
    pub activities: Vec<RealtimeActivity>,
}

impl RealtimeFeed {
    #[must_use]
    pub fn new(activities: Vec<RealtimeActivity>, last_updated: DateTime<Utc>) -> Self {
        Self {
            last_updated,
            source: FEED_SOURCE.to_owned(),
            total_activities: activities.len(),
            activities,
        }
    }
}

/// Replaces `<root>/realtime-activity.json` with `feed`.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be written.
pub async fn write_realtime_feed(root: &Path, feed: &RealtimeFeed) -> Result<PathBuf, StoreError> {
    let path = root.join(REALTIME_FEED_FILE);
    write_json_atomic(&path, feed).await?;
    tracing::debug!(
        activities = feed.total_activities,
        path = %path.display(),
        "real-time feed written"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use superinv_core::{QuarterPeriod, RealtimeKind};

    use super::*;

    fn activity(ticker: &str) -> RealtimeActivity {
        let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        RealtimeActivity {
            id: format!("dataroma-2025-02-14-x-{ticker}"),
            date,
            investor: "Pershing Square".to_string(),
            activity_kind: RealtimeKind::NewPosition,
            ticker: ticker.to_string(),
            company_name: format!("{ticker} Inc"),
            shares: Decimal::from(10),
            price: Decimal::from(5),
            total: Decimal::from(50),
            quarter_key: QuarterPeriod::containing(date),
        }
    }

    #[tokio::test]
    async fn writes_feed_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let updated = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let feed = RealtimeFeed::new(vec![activity("HHH"), activity("OXY")], updated);

        let path = write_realtime_feed(dir.path(), &feed).await.unwrap();

        assert_eq!(path, dir.path().join(REALTIME_FEED_FILE));
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["source"], "dataroma-realtime");
        assert_eq!(value["totalActivities"], 2);
        assert_eq!(value["lastUpdated"], "2025-03-01T12:00:00Z");
        assert_eq!(value["activities"][1]["ticker"], "OXY");
        assert_eq!(value["activities"][0]["activityKind"], "New Position");
    }
}
