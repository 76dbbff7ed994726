use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

use super::account::Account;
use super::asset::Asset;
use super::number::lenient_f64;
use super::position::Position;

/// A portfolio at a point in time: authoritative total plus its positions.
///
/// `usd_value` is the denominator of every percentage computed from a
/// snapshot; it is never replaced by a recomputed sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd_value: f64,

    /// Accounts keyed by account id
    #[serde(default)]
    pub accounts: HashMap<String, Account>,

    #[serde(default)]
    pub positions: Vec<Position>,
}

impl Snapshot {
    pub fn new(usd_value: f64, positions: Vec<Position>) -> Self {
        Self {
            usd_value,
            accounts: HashMap::new(),
            positions,
        }
    }

    /// Register an account (builder style, mostly for fixtures).
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.insert(account.id.clone(), account);
        self
    }

    /// Every asset of every position, in feed order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.positions.iter().flat_map(|p| p.assets.iter())
    }

    /// Reject snapshots whose USD figures cannot be aggregated.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.usd_value.is_finite() {
            return Err(CoreError::DataContract(format!(
                "snapshot total is not a finite number: {}",
                self.usd_value
            )));
        }
        for position in &self.positions {
            if !position.usd_value.is_finite() {
                return Err(CoreError::DataContract(format!(
                    "position {} has a non-finite USD value",
                    position.id
                )));
            }
            if let Some(asset) = position.assets.iter().find(|a| !a.usd_value.is_finite()) {
                return Err(CoreError::DataContract(format!(
                    "asset {} in position {} has a non-finite USD value",
                    asset.symbol, position.id
                )));
            }
        }
        Ok(())
    }

    /// Positions whose `account_id` does not resolve to a known account.
    pub fn orphan_positions(&self) -> Vec<&Position> {
        self.positions
            .iter()
            .filter(|p| !p.account_id.is_empty() && !self.accounts.contains_key(&p.account_id))
            .collect()
    }
}
