//! `superinv realtime`: refresh the cross-investor activity feed file.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use superinv_scraper::{normalize_realtime, SourceClient};
use superinv_store::{write_realtime_feed, RealtimeFeed};

/// Fetches, normalizes and writes the feed. Returns the number of activities.
///
/// An empty normalization leaves any existing feed file untouched.
pub(crate) async fn collect_realtime(
    client: &SourceClient,
    output_dir: &Path,
    today: NaiveDate,
    now: DateTime<Utc>,
    dry_run: bool,
) -> anyhow::Result<usize> {
    let html = client
        .fetch_realtime()
        .await
        .context("failed to fetch real-time feed page")?;

    let activities = normalize_realtime(&html, today);
    if activities.is_empty() {
        tracing::warn!("real-time feed yielded no activities; existing feed kept");
        return Ok(0);
    }

    let count = activities.len();
    if dry_run {
        tracing::info!(activities = count, "dry run: real-time feed not written");
        return Ok(count);
    }

    let path = write_realtime_feed(output_dir, &RealtimeFeed::new(activities, now))
        .await
        .context("failed to write real-time feed")?;
    tracing::info!(activities = count, path = %path.display(), "real-time feed written");
    Ok(count)
}
