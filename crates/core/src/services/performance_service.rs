use std::cmp::Ordering;

use crate::models::analytics::{percent_of, ratio, PerformanceReport, PeriodReturn, RankedChange};
use crate::models::performance::{GainerLoserItem, PortfolioPerformanceResponse};
use crate::models::portfolio::PortfolioRef;

/// Number of gainers/losers shown by default.
pub const DEFAULT_TOP_N: usize = 5;

/// Ranks value changes reported by the performance endpoint.
///
/// All sorts are stable and keyed on `diff_usd_value` only, so equal
/// differences keep the order the feed returned them in.
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn period_return(&self, resp: &PortfolioPerformanceResponse) -> PeriodReturn {
        PeriodReturn {
            absolute: resp.usd_value_change,
            percent: percent_of(resp.usd_value_change, resp.last_snapshot_usd_value),
        }
    }

    /// Asset-type changes, largest gain first.
    ///
    /// `percent` here is `prev_usd_value / curr_usd_value` (a plain ratio, not
    /// a percent change). This matches what the portfolio service has always
    /// shown and is kept until the intended meaning is settled.
    pub fn rank_change_by_type(&self, resp: &PortfolioPerformanceResponse) -> Vec<RankedChange> {
        let mut rows: Vec<RankedChange> = resp
            .change_by_type
            .iter()
            .map(|c| RankedChange {
                label: c.asset_type.clone(),
                prev_usd_value: c.prev_usd_value,
                curr_usd_value: c.curr_usd_value,
                diff_usd_value: c.diff_usd_value,
                percent: ratio(c.prev_usd_value, c.curr_usd_value),
            })
            .collect();
        rows.sort_by(|a, b| b.diff_usd_value.total_cmp(&a.diff_usd_value));
        rows
    }

    /// The `n` largest increases.
    pub fn top_gainers(&self, resp: &PortfolioPerformanceResponse, n: usize) -> Vec<RankedChange> {
        Self::ranked(&resp.gainers_losers, n, |a, b| b.total_cmp(a))
    }

    /// The `n` largest decreases.
    pub fn top_losers(&self, resp: &PortfolioPerformanceResponse, n: usize) -> Vec<RankedChange> {
        Self::ranked(&resp.gainers_losers, n, |a, b| a.total_cmp(b))
    }

    pub fn report(
        &self,
        portfolio: &PortfolioRef,
        resp: &PortfolioPerformanceResponse,
        n: usize,
    ) -> PerformanceReport {
        PerformanceReport {
            portfolio: portfolio.clone(),
            starts_at: resp.starts_at.clone(),
            ends_at: resp.ends_at.clone(),
            period_return: self.period_return(resp),
            change_by_type: self.rank_change_by_type(resp),
            top_gainers: self.top_gainers(resp, n),
            top_losers: self.top_losers(resp, n),
        }
    }

    fn ranked(
        items: &[GainerLoserItem],
        n: usize,
        order: impl Fn(&f64, &f64) -> Ordering,
    ) -> Vec<RankedChange> {
        let mut sorted: Vec<&GainerLoserItem> = items.iter().collect();
        sorted.sort_by(|a, b| order(&a.diff_usd_value, &b.diff_usd_value));
        sorted
            .into_iter()
            .take(n)
            .map(|item| RankedChange {
                label: item.symbol.clone(),
                prev_usd_value: item.prev_usd_value,
                curr_usd_value: item.curr_usd_value,
                diff_usd_value: item.diff_usd_value,
                // A newly acquired asset has no previous value: undefined, not a fault.
                percent: percent_of(item.diff_usd_value, item.prev_usd_value),
            })
            .collect()
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
