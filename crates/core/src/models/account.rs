use serde::{Deserialize, Serialize};

/// A connected wallet or exchange identity, keyed by `id` inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Open category string (wallet, exchange, ...).
    #[serde(rename = "type", default)]
    pub account_type: String,
}
