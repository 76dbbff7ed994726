use serde::Serialize;

use super::pool::YieldLeg;
use super::portfolio::PortfolioRef;

// Every `Option<f64>` percentage below is `None` when its denominator is
// zero. Formatters render it as "n/a".

/// `numerator / denominator * 100`, or `None` when undefined.
pub fn percent_of(numerator: f64, denominator: f64) -> Option<f64> {
    ratio(numerator, denominator).map(|r| r * 100.0)
}

/// `numerator / denominator`, or `None` when undefined.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

/// Value held in one asset category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetTypeBreakdown {
    pub asset_type: String,

    /// Sum of `usd_value` over all assets of this type
    pub value: f64,

    /// `value / snapshot.usd_value * 100`
    pub percentage: Option<f64>,
}

/// An asset at or above the display threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorHolding {
    pub name: String,
    pub symbol: String,
    pub value: f64,
    pub amount: f64,
}

/// Everything the summary tool shows for one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioOverview {
    pub portfolio: PortfolioRef,
    pub total_usd: f64,
    pub account_count: usize,
    pub position_count: usize,
    pub breakdown: Vec<AssetTypeBreakdown>,
    pub major_holdings: Vec<MajorHolding>,
}

/// One supply or borrow leg with its annualized USD flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegYield {
    pub symbol: String,
    pub amount: f64,
    pub price: f64,
    pub usd_value: f64,
    pub apy: f64,
    pub annual_usd: f64,
}

impl From<&YieldLeg> for LegYield {
    fn from(leg: &YieldLeg) -> Self {
        Self {
            symbol: leg.symbol.clone(),
            amount: leg.amount,
            price: leg.price,
            usd_value: leg.usd_value(),
            apy: leg.apy,
            annual_usd: leg.annual_usd(),
        }
    }
}

/// Per-pool exposure and net yield.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolYield {
    pub platform: String,
    pub network: String,
    pub account: String,
    pub supply: Vec<LegYield>,
    pub borrow: Vec<LegYield>,
    pub supply_usd: f64,
    pub borrow_usd: f64,
    /// Annual income per supply leg, index-aligned with `supply`
    pub receive_usd: Vec<f64>,
    /// Annual cost per borrow leg, index-aligned with `borrow`
    pub pay_usd: Vec<f64>,
    /// `Σ receive_usd − Σ pay_usd`
    pub net_yield_usd: f64,
}

/// Portfolio-wide reduction over [`PoolYield`]s.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct YieldTotals {
    pub total_supply_usd: f64,
    pub total_borrow_usd: f64,
    pub total_yield_usd: f64,
    /// `total_yield_usd / total_supply_usd * 100`
    pub avg_apy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldSummary {
    pub portfolio: PortfolioRef,
    pub pools: Vec<PoolYield>,
    pub totals: YieldTotals,
}

/// Absolute and relative change over the performance window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodReturn {
    pub absolute: f64,
    /// `usd_value_change / last_snapshot_usd_value * 100`
    pub percent: Option<f64>,
}

/// A ranked change row (asset type or asset symbol).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedChange {
    pub label: String,
    pub prev_usd_value: f64,
    pub curr_usd_value: f64,
    pub diff_usd_value: f64,
    /// Percent change for gainers and losers; the plain `prev / curr` ratio
    /// for asset-type rows
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub portfolio: PortfolioRef,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub period_return: PeriodReturn,
    pub change_by_type: Vec<RankedChange>,
    pub top_gainers: Vec<RankedChange>,
    pub top_losers: Vec<RankedChange>,
}
