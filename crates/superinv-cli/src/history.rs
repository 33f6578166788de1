//! `superinv history`: trend and activity pages into quarterly snapshots.

use anyhow::Context;
use superinv_core::{reconstruct_all, InvestorConfig, ReconstructionParams};
use superinv_scraper::{extract_activity, extract_trend, SourceClient};
use superinv_store::SnapshotStore;

/// Reconstructs every quarter on the investor's history page and writes one
/// snapshot per quarter. Returns the number of snapshots written (or that
/// would be written on a dry run).
///
/// A history page that cannot be fetched fails the investor. An activity page
/// that cannot be fetched only degrades the run to the fallback estimate.
/// A store error aborts the investor's remaining quarters.
pub(crate) async fn collect_history(
    client: &SourceClient,
    store: &SnapshotStore,
    params: &ReconstructionParams,
    investor: &InvestorConfig,
    dry_run: bool,
) -> anyhow::Result<usize> {
    let history_html = client
        .fetch_history(&investor.source_code)
        .await
        .with_context(|| format!("failed to fetch history page for {}", investor.slug))?;

    let observations = extract_trend(&history_html);
    if observations.is_empty() {
        tracing::warn!(slug = %investor.slug, "history page has no quarter rows");
        return Ok(0);
    }

    let events = match client.fetch_activity(&investor.source_code).await {
        Ok(html) => extract_activity(&html),
        Err(e) => {
            tracing::warn!(
                slug = %investor.slug,
                error = %e,
                "activity page unavailable; estimating from top holdings only"
            );
            Vec::new()
        }
    };

    tracing::info!(
        slug = %investor.slug,
        quarters = observations.len(),
        events = events.len(),
        "history extracted"
    );

    let snapshots = reconstruct_all(&investor.slug, &observations, &events, params);
    let folder = investor.output_folder();
    let mut written = 0;

    for snapshot in &snapshots {
        if dry_run {
            tracing::info!(
                slug = %investor.slug,
                quarter = %snapshot.period,
                positions = snapshot.positions.len(),
                "dry run: snapshot not written"
            );
            written += 1;
            continue;
        }

        let path = store
            .write_snapshot(folder, snapshot)
            .await
            .with_context(|| {
                format!(
                    "failed to write {} snapshot for {}",
                    snapshot.period, investor.slug
                )
            })?;
        if let Some(path) = path {
            tracing::info!(
                slug = %investor.slug,
                quarter = %snapshot.period,
                positions = snapshot.positions.len(),
                path = %path.display(),
                "snapshot written"
            );
            written += 1;
        }
    }

    Ok(written)
}
