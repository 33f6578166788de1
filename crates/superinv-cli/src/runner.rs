//! Batch driver: investor selection, sequential processing with a cooldown,
//! and per-investor failure isolation.

use std::future::Future;
use std::time::Duration;

use superinv_core::{InvestorConfig, InvestorsFile};

/// Target that selects every configured investor.
pub(crate) const ALL_INVESTORS: &str = "all";

/// Resolves a command-line target to the investors it names.
pub(crate) fn select_investors<'a>(
    registry: &'a InvestorsFile,
    target: &str,
) -> anyhow::Result<Vec<&'a InvestorConfig>> {
    if target.eq_ignore_ascii_case(ALL_INVESTORS) {
        return Ok(registry.investors.iter().collect());
    }
    match registry.find(target) {
        Some(investor) => Ok(vec![investor]),
        None => anyhow::bail!(
            "unknown investor '{target}'; run `superinv investors` to list configured slugs"
        ),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    pub(crate) total: usize,
    pub(crate) failed: usize,
    pub(crate) records: usize,
}

impl BatchSummary {
    /// Prints the outcome and turns any failure into an error, so the
    /// process exits non-zero.
    pub(crate) fn finish(self, label: &str) -> anyhow::Result<()> {
        if self.failed > 0 {
            tracing::warn!(
                failed_investors = self.failed,
                total_investors = self.total,
                "{label} run finished with failures"
            );
            anyhow::bail!(
                "{label}: {} of {} investors failed",
                self.failed,
                self.total
            );
        }
        println!(
            "{label}: {} investors, {} records",
            self.total, self.records
        );
        Ok(())
    }
}

/// Runs `process` for each investor in order, pausing `cooldown` between
/// investors. An error from one investor is logged and counted; the batch
/// moves on to the next.
pub(crate) async fn run_batch<'a, F, Fut>(
    investors: &[&'a InvestorConfig],
    cooldown: Duration,
    mut process: F,
) -> BatchSummary
where
    F: FnMut(&'a InvestorConfig) -> Fut,
    Fut: Future<Output = anyhow::Result<usize>>,
{
    let mut summary = BatchSummary {
        total: investors.len(),
        ..BatchSummary::default()
    };

    for (index, investor) in investors.iter().copied().enumerate() {
        if index > 0 && !cooldown.is_zero() {
            tokio::time::sleep(cooldown).await;
        }

        tracing::info!(slug = %investor.slug, "processing investor");
        match process(investor).await {
            Ok(records) => {
                summary.records += records;
                tracing::info!(slug = %investor.slug, records, "investor done");
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(slug = %investor.slug, error = %format!("{e:#}"), "investor failed");
            }
        }
    }

    summary
}
