use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::credential::Credential;
use crate::models::performance::PortfolioPerformanceResponse;
use crate::models::pool::YieldResponse;
use crate::models::portfolio::PortfolioRef;
use crate::models::snapshot::Snapshot;

/// Source of raw portfolio documents.
///
/// Implementations perform the remote calls and return fully parsed
/// responses, or fail (`Upstream`, `Network`, `Deserialization`). They do
/// not retry. The credential is passed on every call; providers keep no
/// session of their own.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PortfolioProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Portfolios visible to the credential, in the order the service lists them.
    async fn list_portfolios(&self, credential: &Credential)
        -> Result<Vec<PortfolioRef>, CoreError>;

    /// Current snapshot of one portfolio.
    async fn fetch_snapshot(
        &self,
        credential: &Credential,
        slug: &str,
    ) -> Result<Snapshot, CoreError>;

    /// Lending/yield pools of one portfolio.
    async fn fetch_yield(
        &self,
        credential: &Credential,
        slug: &str,
    ) -> Result<YieldResponse, CoreError>;

    /// Value changes of one portfolio since `start`.
    async fn fetch_performance(
        &self,
        credential: &Credential,
        slug: &str,
        start: NaiveDate,
    ) -> Result<PortfolioPerformanceResponse, CoreError>;
}
