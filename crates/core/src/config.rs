use serde::{Deserialize, Serialize};

use crate::services::aggregation_service::DEFAULT_MAJOR_HOLDING_THRESHOLD;
use crate::services::performance_service::DEFAULT_TOP_N;

/// Default feed API root.
pub const DEFAULT_API_URL: &str = "https://api.portfolio-lens.app/v1";

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Transport settings for [`crate::providers::http::HttpPortfolioProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    pub cookie_name: String,
    /// Per-request timeout (native targets only)
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Knobs of the analytic layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// USD value at or above which an asset is a major holding
    pub major_holding_threshold: f64,

    /// Length of the gainers and losers lists
    pub top_n: usize,

    /// Performance window when no start date is given
    pub default_lookback_days: i64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            major_holding_threshold: DEFAULT_MAJOR_HOLDING_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            default_lookback_days: 30,
        }
    }
}
