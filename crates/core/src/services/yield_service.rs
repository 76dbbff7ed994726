use crate::errors::CoreError;
use crate::models::analytics::{percent_of, LegYield, PoolYield, YieldSummary, YieldTotals};
use crate::models::pool::{PairedPool, Pool, YieldResponse};
use crate::models::portfolio::PortfolioRef;

/// Computes USD exposure and annualized net yield of lending pools.
///
/// Pools are independent of each other: [`YieldEngine::compute_pool`] can run
/// in any order, and [`YieldEngine::aggregate`] is a plain sum over its
/// results, so reordering pools only changes floating-point rounding.
pub struct YieldEngine;

impl YieldEngine {
    pub fn new() -> Self {
        Self
    }

    /// Exposure and net yield of one pool.
    ///
    /// Fails with `DataContract` when `supply`/`receive` or `borrow`/`pay`
    /// differ in length; mismatched legs are never zero-filled.
    pub fn compute_pool(&self, pool: &Pool) -> Result<PoolYield, CoreError> {
        let paired = PairedPool::try_from(pool)?;
        Ok(self.compute_paired(paired))
    }

    fn compute_paired(&self, pool: PairedPool) -> PoolYield {
        let supply: Vec<LegYield> = pool.supply.iter().map(LegYield::from).collect();
        let borrow: Vec<LegYield> = pool.borrow.iter().map(LegYield::from).collect();

        let receive_usd: Vec<f64> = supply.iter().map(|l| l.annual_usd).collect();
        let pay_usd: Vec<f64> = borrow.iter().map(|l| l.annual_usd).collect();
        let net_yield_usd = receive_usd.iter().sum::<f64>() - pay_usd.iter().sum::<f64>();

        PoolYield {
            platform: pool.platform,
            network: pool.network,
            account: pool.account,
            supply_usd: supply.iter().map(|l| l.usd_value).sum(),
            borrow_usd: borrow.iter().map(|l| l.usd_value).sum(),
            supply,
            borrow,
            receive_usd,
            pay_usd,
            net_yield_usd,
        }
    }

    /// Portfolio-wide totals. `avg_apy` is `None` when nothing is supplied.
    pub fn aggregate(&self, pools: &[PoolYield]) -> YieldTotals {
        let mut totals = pools.iter().fold(YieldTotals::default(), |mut acc, p| {
            acc.total_supply_usd += p.supply_usd;
            acc.total_borrow_usd += p.borrow_usd;
            acc.total_yield_usd += p.net_yield_usd;
            acc
        });
        totals.avg_apy = percent_of(totals.total_yield_usd, totals.total_supply_usd);
        totals
    }

    /// Per-pool results plus totals for one portfolio.
    pub fn summarize(
        &self,
        portfolio: &PortfolioRef,
        response: &YieldResponse,
    ) -> Result<YieldSummary, CoreError> {
        let pools = response
            .pools
            .iter()
            .map(|p| self.compute_pool(p))
            .collect::<Result<Vec<_>, _>>()?;
        let totals = self.aggregate(&pools);

        Ok(YieldSummary {
            portfolio: portfolio.clone(),
            pools,
            totals,
        })
    }
}

impl Default for YieldEngine {
    fn default() -> Self {
        Self::new()
    }
}
