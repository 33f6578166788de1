//! `superinv current`: the latest reported holdings as one snapshot.

use anyhow::Context;
use chrono::NaiveDate;
use superinv_core::InvestorConfig;
use superinv_scraper::{extract_current_holdings, SourceClient};
use superinv_store::SnapshotStore;

pub(crate) async fn collect_current(
    client: &SourceClient,
    store: &SnapshotStore,
    investor: &InvestorConfig,
    today: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<usize> {
    let html = client
        .fetch_holdings(&investor.source_code)
        .await
        .with_context(|| format!("failed to fetch holdings page for {}", investor.slug))?;

    let holdings = extract_current_holdings(&html, today);
    tracing::info!(
        slug = %investor.slug,
        quarter = %holdings.period,
        source = ?holdings.period_source,
        positions = holdings.positions.len(),
        "current holdings extracted"
    );

    let Some(snapshot) = holdings.into_snapshot(&investor.slug) else {
        tracing::warn!(slug = %investor.slug, "holdings page has no positions");
        return Ok(0);
    };

    if dry_run {
        tracing::info!(
            slug = %investor.slug,
            quarter = %snapshot.period,
            positions = snapshot.positions.len(),
            "dry run: snapshot not written"
        );
        return Ok(1);
    }

    let written = store
        .write_snapshot(investor.output_folder(), &snapshot)
        .await
        .with_context(|| format!("failed to write current snapshot for {}", investor.slug))?;

    Ok(usize::from(written.is_some()))
}
