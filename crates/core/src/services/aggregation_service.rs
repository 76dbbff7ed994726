use std::collections::HashMap;

use tracing::warn;

use crate::models::analytics::{percent_of, AssetTypeBreakdown, MajorHolding, PortfolioOverview};
use crate::models::portfolio::PortfolioRef;
use crate::models::snapshot::Snapshot;

/// Minimum USD value for an asset to be listed as a major holding.
pub const DEFAULT_MAJOR_HOLDING_THRESHOLD: f64 = 1000.0;

/// Derives allocation analytics from a portfolio snapshot.
///
/// Pure functions of the snapshot: no network, no file I/O, no caching.
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Total USD value per asset type, largest first.
    ///
    /// Percentages divide by `snapshot.usd_value` (the authoritative total),
    /// not by the sum of the groups. Equal values keep the order in which
    /// their type was first seen.
    pub fn breakdown_by_asset_type(&self, snapshot: &Snapshot) -> Vec<AssetTypeBreakdown> {
        // Vec + index map keeps first-encounter order for the stable sort below.
        let mut groups: Vec<(String, f64)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for asset in snapshot.assets() {
            match index.get(asset.asset_type.as_str()) {
                Some(&i) => groups[i].1 += asset.usd_value,
                None => {
                    index.insert(asset.asset_type.as_str(), groups.len());
                    groups.push((asset.asset_type.clone(), asset.usd_value));
                }
            }
        }

        let mut breakdown: Vec<AssetTypeBreakdown> = groups
            .into_iter()
            .map(|(asset_type, value)| AssetTypeBreakdown {
                percentage: percent_of(value, snapshot.usd_value),
                asset_type,
                value,
            })
            .collect();

        breakdown.sort_by(|a, b| b.value.total_cmp(&a.value));
        breakdown
    }

    /// Assets worth at least `threshold` USD, largest first (stable on ties).
    pub fn major_holdings(&self, snapshot: &Snapshot, threshold: f64) -> Vec<MajorHolding> {
        let mut holdings: Vec<MajorHolding> = snapshot
            .assets()
            .filter(|a| a.usd_value >= threshold)
            .map(|a| MajorHolding {
                name: a.name.clone(),
                symbol: a.symbol.clone(),
                value: a.usd_value,
                amount: a.amount,
            })
            .collect();

        holdings.sort_by(|a, b| b.value.total_cmp(&a.value));
        holdings
    }

    /// Breakdown and major holdings bundled for one portfolio.
    pub fn overview(
        &self,
        portfolio: &PortfolioRef,
        snapshot: &Snapshot,
        threshold: f64,
    ) -> PortfolioOverview {
        let orphans = snapshot.orphan_positions();
        if !orphans.is_empty() {
            warn!(
                portfolio = %portfolio.slug,
                count = orphans.len(),
                "positions reference accounts missing from the snapshot"
            );
        }

        PortfolioOverview {
            portfolio: portfolio.clone(),
            total_usd: snapshot.usd_value,
            account_count: snapshot.accounts.len(),
            position_count: snapshot.positions.len(),
            breakdown: self.breakdown_by_asset_type(snapshot),
            major_holdings: self.major_holdings(snapshot, threshold),
        }
    }
}

impl Default for PortfolioAggregator {
    fn default() -> Self {
        Self::new()
    }
}
