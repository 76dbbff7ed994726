use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::number::lenient_f64;

/// Value change of one asset between the two ends of the window.
/// `diff_usd_value` comes from the feed and is ranked as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GainerLoserItem {
    #[serde(default)]
    pub symbol: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub prev_usd_value: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub curr_usd_value: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub diff_usd_value: f64,
}

/// Value change of one asset category between the two ends of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeByTypeItem {
    #[serde(rename = "type", default)]
    pub asset_type: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub prev_usd_value: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub curr_usd_value: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub diff_usd_value: f64,
}

/// Body of the performance endpoint for one portfolio over
/// `[starts_at, ends_at]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPerformanceResponse {
    #[serde(default)]
    pub starts_at: Option<String>,

    #[serde(default)]
    pub ends_at: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd_value_change: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub last_snapshot_usd_value: f64,

    #[serde(default)]
    pub change_by_type: Vec<ChangeByTypeItem>,

    #[serde(default)]
    pub gainers_losers: Vec<GainerLoserItem>,
}

impl GainerLoserItem {
    pub fn new(symbol: impl Into<String>, prev_usd_value: f64, curr_usd_value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            prev_usd_value,
            curr_usd_value,
            diff_usd_value: curr_usd_value - prev_usd_value,
        }
    }
}

impl ChangeByTypeItem {
    pub fn new(asset_type: impl Into<String>, prev_usd_value: f64, curr_usd_value: f64) -> Self {
        Self {
            asset_type: asset_type.into(),
            prev_usd_value,
            curr_usd_value,
            diff_usd_value: curr_usd_value - prev_usd_value,
        }
    }
}

impl PortfolioPerformanceResponse {
    /// Reject responses whose USD figures cannot be ranked or divided.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("usdValueChange", self.usd_value_change),
            ("lastSnapshotUsdValue", self.last_snapshot_usd_value),
        ] {
            if !value.is_finite() {
                return Err(CoreError::DataContract(format!(
                    "performance {field} is not a finite number: {value}"
                )));
            }
        }

        let by_type = self.change_by_type.iter().map(|c| {
            (
                c.asset_type.as_str(),
                [c.prev_usd_value, c.curr_usd_value, c.diff_usd_value],
            )
        });
        let by_asset = self.gainers_losers.iter().map(|g| {
            (
                g.symbol.as_str(),
                [g.prev_usd_value, g.curr_usd_value, g.diff_usd_value],
            )
        });
        if let Some((label, _)) = by_type
            .chain(by_asset)
            .find(|(_, values)| values.iter().any(|v| !v.is_finite()))
        {
            return Err(CoreError::DataContract(format!(
                "performance change for {label} has a non-finite USD value"
            )));
        }
        Ok(())
    }
}
