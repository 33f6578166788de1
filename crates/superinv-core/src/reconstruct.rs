//! Reconstruction engine: fuses one quarter's trend observation with that
//! quarter's activity events into a valued position list.
//!
//! Two tiers are tried in order:
//!
//! 1. **Primary**: every activity event whose absolute share delta exceeds
//!    the materiality threshold becomes a position valued at
//!    `max(total_value * impact% / 100, |share_delta| * floor_price)`.
//! 2. **Fallback**: only when the primary tier yields nothing and the trend
//!    row lists top holdings: the first [`FALLBACK_MAX_POSITIONS`] tickers get
//!    a synthetic weight of `max(5, 25 - 3 * rank)` percent of total value and
//!    a share count at a flat `fallback_share_price`.
//!
//! A quarter for which both tiers are empty produces no snapshot at all.
//! The engine is a pure function of its inputs; identical inputs always
//! produce identical snapshots.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::holdings::{
    pseudo_identifier, ActivityEvent, QuarterlySnapshot, ReconstructedPosition, TrendObservation,
};
use crate::period::QuarterPeriod;

/// Default primary-tier materiality threshold, in shares.
pub const DEFAULT_MATERIALITY_THRESHOLD_SHARES: u64 = 1_000;
/// Default primary-tier floor, in dollars per share.
pub const DEFAULT_PRIMARY_FLOOR_PRICE: u32 = 50;
/// Default fallback-tier share price assumption, in dollars per share.
pub const DEFAULT_FALLBACK_SHARE_PRICE: u32 = 100;

/// Number of top-holdings tickers priced by the fallback tier.
pub const FALLBACK_MAX_POSITIONS: usize = 5;
const FALLBACK_BASE_WEIGHT_PCT: i64 = 25;
const FALLBACK_WEIGHT_STEP_PCT: i64 = 3;
const FALLBACK_MIN_WEIGHT_PCT: i64 = 5;

/// Tunable constants of the estimation heuristics.
///
/// The two prices have no documented calibration; they are exposed so a run
/// can override them without touching the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionParams {
    /// Events with `|share_delta| <= threshold` are ignored by the primary tier.
    pub materiality_threshold_shares: u64,
    pub primary_floor_price: Decimal,
    pub fallback_share_price: Decimal,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            materiality_threshold_shares: DEFAULT_MATERIALITY_THRESHOLD_SHARES,
            primary_floor_price: Decimal::from(DEFAULT_PRIMARY_FLOOR_PRICE),
            fallback_share_price: Decimal::from(DEFAULT_FALLBACK_SHARE_PRICE),
        }
    }
}

/// Which tier produced a quarter's positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationPath {
    Primary,
    Fallback,
}

impl std::fmt::Display for ValuationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuationPath::Primary => write!(f, "primary"),
            ValuationPath::Fallback => write!(f, "fallback"),
        }
    }
}

/// Reconstructs one quarter.
///
/// `events` may contain events of other quarters; only those whose period
/// matches `observation.period` are considered. Returns `None` when neither
/// tier yields a position, in which case nothing should be persisted for the
/// quarter.
#[must_use]
pub fn reconstruct_quarter(
    investor_slug: &str,
    observation: &TrendObservation,
    events: &[ActivityEvent],
    params: &ReconstructionParams,
) -> Option<QuarterlySnapshot> {
    let (mut positions, path) = {
        let primary = primary_positions(observation, events, params);
        if primary.is_empty() {
            (
                fallback_positions(observation, params),
                ValuationPath::Fallback,
            )
        } else {
            (primary, ValuationPath::Primary)
        }
    };

    if positions.is_empty() {
        tracing::debug!(
            slug = investor_slug,
            quarter = %observation.period,
            "no activity and no top holdings; quarter skipped"
        );
        return None;
    }

    // Stable, so equal values keep input order.
    positions.sort_by(|a, b| b.estimated_value.cmp(&a.estimated_value));

    tracing::debug!(
        slug = investor_slug,
        quarter = %observation.period,
        %path,
        positions = positions.len(),
        "quarter reconstructed"
    );

    Some(QuarterlySnapshot {
        investor_slug: investor_slug.to_string(),
        period: observation.period,
        as_of: observation.end_date,
        positions,
    })
}

/// Joins observations with events by quarter and reconstructs each quarter.
///
/// Output follows observation order. Quarters that reconstruct to nothing
/// are omitted.
#[must_use]
pub fn reconstruct_all(
    investor_slug: &str,
    observations: &[TrendObservation],
    events: &[ActivityEvent],
    params: &ReconstructionParams,
) -> Vec<QuarterlySnapshot> {
    let by_quarter = group_events_by_quarter(events);
    observations
        .iter()
        .filter_map(|observation| {
            let quarter_events = by_quarter
                .get(&observation.period)
                .map_or(&[][..], Vec::as_slice);
            reconstruct_quarter(investor_slug, observation, quarter_events, params)
        })
        .collect()
}

/// Buckets events by quarter, keeping document order within each bucket.
#[must_use]
pub fn group_events_by_quarter(
    events: &[ActivityEvent],
) -> BTreeMap<QuarterPeriod, Vec<ActivityEvent>> {
    let mut grouped: BTreeMap<QuarterPeriod, Vec<ActivityEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.period).or_default().push(event.clone());
    }
    grouped
}

/// Primary tier: one position per material activity event, unsorted.
#[must_use]
pub fn primary_positions(
    observation: &TrendObservation,
    events: &[ActivityEvent],
    params: &ReconstructionParams,
) -> Vec<ReconstructedPosition> {
    let hundred = Decimal::ONE_HUNDRED;

    events
        .iter()
        .filter(|e| e.period == observation.period)
        .filter(|e| e.share_delta.unsigned_abs() > params.materiality_threshold_shares)
        .map(|e| {
            let shares = e.share_delta.unsigned_abs();
            let proportional = mul(observation.total_value, e.portfolio_impact_percent)
                .checked_div(hundred)
                .unwrap_or(Decimal::ZERO);
            let floor = mul(Decimal::from(shares), params.primary_floor_price);
            ReconstructedPosition {
                pseudo_identifier: pseudo_identifier(&e.ticker),
                company_name: e.company_name.clone(),
                estimated_shares: shares,
                estimated_value: whole(proportional.max(floor)),
                ticker: e.ticker.clone(),
            }
        })
        .collect()
}

/// Fallback tier: synthetic weights over the leading top-holdings tickers.
#[must_use]
pub fn fallback_positions(
    observation: &TrendObservation,
    params: &ReconstructionParams,
) -> Vec<ReconstructedPosition> {
    observation
        .top_tickers
        .iter()
        .take(FALLBACK_MAX_POSITIONS)
        .enumerate()
        .map(|(rank, ticker)| {
            let value = mul(observation.total_value, fallback_weight_pct(rank))
                .checked_div(Decimal::ONE_HUNDRED)
                .unwrap_or(Decimal::ZERO);
            let shares = value
                .checked_div(params.fallback_share_price)
                .map(whole)
                .and_then(|s| s.to_u64())
                .unwrap_or(0);
            ReconstructedPosition {
                pseudo_identifier: pseudo_identifier(ticker),
                company_name: ticker.clone(),
                estimated_shares: shares,
                estimated_value: whole(value),
                ticker: ticker.clone(),
            }
        })
        .collect()
}

/// `max(5, 25 - 3 * rank)` percent, rank 0-indexed.
#[must_use]
pub fn fallback_weight_pct(rank: usize) -> Decimal {
    let rank = i64::try_from(rank).unwrap_or(i64::MAX);
    let weight = FALLBACK_BASE_WEIGHT_PCT
        .saturating_sub(FALLBACK_WEIGHT_STEP_PCT.saturating_mul(rank))
        .max(FALLBACK_MIN_WEIGHT_PCT);
    Decimal::from(weight)
}

fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::MAX)
}

fn whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[path = "reconstruct_test.rs"]
mod tests;
