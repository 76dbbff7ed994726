use serde::{Deserialize, Serialize};

use super::number::lenient_f64;

/// One asset line inside a position.
///
/// `usd_value` is computed by the feed (≈ `amount * price`) and is used
/// as-is; the engine never re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub id: String,

    /// Ticker symbol as reported by the feed (e.g. "ETH", "USDC")
    #[serde(default)]
    pub symbol: String,

    /// Human-readable name (e.g. "Ether")
    #[serde(default)]
    pub name: String,

    /// Open category used as a grouping key (stablecoin, native token, NFT, ...).
    /// The upstream vocabulary grows over time, so this is a plain string.
    #[serde(rename = "type", default)]
    pub asset_type: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd_value: f64,
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
        usd_value: f64,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            id: symbol.to_lowercase(),
            symbol,
            name: name.into(),
            asset_type: asset_type.into(),
            amount: 0.0,
            price: 0.0,
            usd_value,
        }
    }

    /// Attach the held amount and unit price.
    pub fn with_amount(mut self, amount: f64, price: f64) -> Self {
        self.amount = amount;
        self.price = price;
        self
    }
}
