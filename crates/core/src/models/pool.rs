use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::number::lenient_f64;

/// Asset descriptor carried by a supply or borrow leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAsset {
    #[serde(default)]
    pub symbol: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
}

/// A supplied or borrowed quantity of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegElement {
    pub asset: PoolAsset,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
}

/// The annual rate attached to a supply leg (receive) or a borrow leg (pay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateElement {
    /// Annual percentage yield, in percent (5.0 means 5 %)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub apy: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<PoolAsset>,
}

pub type SupplyElement = LegElement;
pub type BorrowElement = LegElement;
pub type ReceiveElement = RateElement;
pub type PayElement = RateElement;

/// One lending/yield position as delivered by the feed.
///
/// `supply[i]` pairs with `receive[i]` and `borrow[i]` with `pay[i]`.
/// That pairing is only positional on the wire; use [`PairedPool`] to work
/// with it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub network: String,

    #[serde(default)]
    pub account: String,

    #[serde(default)]
    pub supply: Vec<SupplyElement>,

    #[serde(default)]
    pub receive: Vec<ReceiveElement>,

    #[serde(default)]
    pub borrow: Vec<BorrowElement>,

    #[serde(default)]
    pub pay: Vec<PayElement>,
}

/// Body of the yield endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldResponse {
    #[serde(default)]
    pub pools: Vec<Pool>,
}

/// A supply or borrow leg joined with its rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldLeg {
    pub symbol: String,
    pub name: String,
    pub amount: f64,
    pub price: f64,
    pub apy: f64,
}

impl YieldLeg {
    /// Current USD exposure of the leg.
    pub fn usd_value(&self) -> f64 {
        self.amount * self.price
    }

    /// Annualized USD flow: `apy / 100 * amount * price`.
    pub fn annual_usd(&self) -> f64 {
        // Divide last so whole-number inputs stay exact (5 % of 100 × 1 is 5.0).
        self.apy * self.amount * self.price / 100.0
    }
}

/// A pool whose legs carry their own rate, built once from the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedPool {
    pub platform: String,
    pub network: String,
    pub account: String,
    pub supply: Vec<YieldLeg>,
    pub borrow: Vec<YieldLeg>,
}

impl TryFrom<&Pool> for PairedPool {
    type Error = CoreError;

    fn try_from(pool: &Pool) -> Result<Self, Self::Error> {
        Ok(Self {
            platform: pool.platform.clone(),
            network: pool.network.clone(),
            account: pool.account.clone(),
            supply: pair_legs(pool, "supply", &pool.supply, "receive", &pool.receive)?,
            borrow: pair_legs(pool, "borrow", &pool.borrow, "pay", &pool.pay)?,
        })
    }
}

fn pair_legs(
    pool: &Pool,
    leg_name: &str,
    legs: &[LegElement],
    rate_name: &str,
    rates: &[RateElement],
) -> Result<Vec<YieldLeg>, CoreError> {
    if legs.len() != rates.len() {
        return Err(CoreError::DataContract(format!(
            "pool {} on {}: {} {leg_name} legs but {} {rate_name} rates",
            pool.platform,
            pool.network,
            legs.len(),
            rates.len()
        )));
    }

    legs.iter()
        .zip(rates)
        .map(|(leg, rate)| {
            let fields = [
                ("amount", leg.amount),
                ("price", leg.asset.price),
                ("apy", rate.apy),
            ];
            if let Some((field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
                return Err(CoreError::DataContract(format!(
                    "pool {} on {}: {leg_name} leg {} has a non-finite {field}: {value}",
                    pool.platform, pool.network, leg.asset.symbol
                )));
            }
            Ok(YieldLeg {
                symbol: leg.asset.symbol.clone(),
                name: leg.asset.name.clone(),
                amount: leg.amount,
                price: leg.asset.price,
                apy: rate.apy,
            })
        })
        .collect()
}
