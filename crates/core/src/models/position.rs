use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::number::lenient_f64;

/// A holding location: a wallet balance, a lending deposit, an NFT, ...
///
/// `usd_value` is the position total reported by the feed. The sum of
/// `assets[*].usd_value` approximates it but may diverge (rounding,
/// derivative positions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub position_type: String,

    #[serde(default)]
    pub account_id: String,

    #[serde(default)]
    pub network_id: String,

    #[serde(default)]
    pub platform_id: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd_value: f64,

    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Position {
    pub fn new(
        id: impl Into<String>,
        position_type: impl Into<String>,
        account_id: impl Into<String>,
        assets: Vec<Asset>,
    ) -> Self {
        let usd_value = assets.iter().map(|a| a.usd_value).sum();
        Self {
            id: id.into(),
            position_type: position_type.into(),
            account_id: account_id.into(),
            network_id: String::new(),
            platform_id: String::new(),
            usd_value,
            assets,
        }
    }
}
