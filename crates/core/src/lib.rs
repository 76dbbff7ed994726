pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod tools;

use chrono::NaiveDate;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

use config::FeedSettings;
use errors::CoreError;
use models::{
    analytics::{PerformanceReport, PortfolioOverview, YieldSummary},
    credential::Credential,
    portfolio::PortfolioRef,
};
use providers::traits::PortfolioProvider;
use services::{
    aggregation_service::PortfolioAggregator, locator_service::PortfolioLocator,
    performance_service::PerformanceAnalyzer, yield_service::YieldEngine,
};
use storage::session::SessionStore;

/// Main entry point of the portfolio-lens core library.
///
/// Wires a remote [`PortfolioProvider`], an injected [`SessionStore`] and the
/// analytic services. Every data operation takes an already resolved
/// [`PortfolioRef`]; name resolution happens once, upstream, via
/// [`PortfolioFeed::resolve_portfolio`].
#[must_use]
pub struct PortfolioFeed {
    provider: Arc<dyn PortfolioProvider>,
    sessions: Arc<dyn SessionStore>,
    settings: FeedSettings,
    aggregator: PortfolioAggregator,
    yield_engine: YieldEngine,
    performance: PerformanceAnalyzer,
    locator: PortfolioLocator,
}

impl std::fmt::Debug for PortfolioFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioFeed")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PortfolioFeed {
    pub fn new(provider: Arc<dyn PortfolioProvider>, sessions: Arc<dyn SessionStore>) -> Self {
        Self::with_settings(provider, sessions, FeedSettings::default())
    }

    pub fn with_settings(
        provider: Arc<dyn PortfolioProvider>,
        sessions: Arc<dyn SessionStore>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            provider,
            sessions,
            settings,
            aggregator: PortfolioAggregator::new(),
            yield_engine: YieldEngine::new(),
            performance: PerformanceAnalyzer::new(),
            locator: PortfolioLocator::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Store a credential parsed from a raw token or a login link.
    pub fn login(&self, token_or_link: &str) -> Result<(), CoreError> {
        let credential = Credential::parse(token_or_link)?;
        self.sessions.save(&credential)?;
        info!("logged in");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.sessions.clear()?;
        info!("logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> Result<bool, CoreError> {
        Ok(self.sessions.load()?.is_some())
    }

    /// The stored credential, or `Unauthenticated`.
    pub fn credential(&self) -> Result<Credential, CoreError> {
        self.sessions.load()?.ok_or(CoreError::Unauthenticated)
    }

    // ── Portfolios ──────────────────────────────────────────────────

    pub async fn list_portfolios(&self) -> Result<Vec<PortfolioRef>, CoreError> {
        let credential = self.credential()?;
        self.provider.list_portfolios(&credential).await
    }

    /// Resolve an optional portfolio name to a reference (see [`PortfolioLocator::find`]).
    pub async fn resolve_portfolio(&self, query: Option<&str>) -> Result<PortfolioRef, CoreError> {
        let portfolios = self.list_portfolios().await?;
        let found = self.locator.find(&portfolios, query)?;
        debug!(slug = %found.slug, "portfolio resolved");
        Ok(found.clone())
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Asset-type breakdown and major holdings of one portfolio.
    pub async fn portfolio_overview(
        &self,
        portfolio: &PortfolioRef,
    ) -> Result<PortfolioOverview, CoreError> {
        let credential = self.credential()?;
        self.overview_with(&credential, portfolio).await
    }

    /// Overviews of every portfolio, fetched concurrently.
    ///
    /// Results come back in the order the service lists the portfolios, not
    /// in completion order. One portfolio failing does not hide the others.
    pub async fn overview_all(
        &self,
    ) -> Result<Vec<(PortfolioRef, Result<PortfolioOverview, CoreError>)>, CoreError> {
        let credential = self.credential()?;
        let portfolios = self.provider.list_portfolios(&credential).await?;
        debug!(count = portfolios.len(), "fetching all portfolio snapshots");

        let results = join_all(
            portfolios
                .iter()
                .map(|portfolio| self.overview_with(&credential, portfolio)),
        )
        .await;

        Ok(portfolios.into_iter().zip(results).collect())
    }

    /// Per-pool net yield and portfolio totals.
    pub async fn yield_summary(&self, portfolio: &PortfolioRef) -> Result<YieldSummary, CoreError> {
        let credential = self.credential()?;
        let response = self
            .provider
            .fetch_yield(&credential, &portfolio.slug)
            .await?;
        self.yield_engine.summarize(portfolio, &response)
    }

    /// Period return, change by type and top movers since `start`.
    pub async fn performance_report(
        &self,
        portfolio: &PortfolioRef,
        start: NaiveDate,
    ) -> Result<PerformanceReport, CoreError> {
        let credential = self.credential()?;
        let response = self
            .provider
            .fetch_performance(&credential, &portfolio.slug, start)
            .await?;
        response.validate()?;
        Ok(self
            .performance
            .report(portfolio, &response, self.settings.top_n))
    }

    /// Start date used when the caller gives none.
    #[must_use]
    pub fn default_start_date(&self) -> NaiveDate {
        let today = chrono::Utc::now().date_naive();
        today - chrono::Duration::days(self.settings.default_lookback_days)
    }

    async fn overview_with(
        &self,
        credential: &Credential,
        portfolio: &PortfolioRef,
    ) -> Result<PortfolioOverview, CoreError> {
        let snapshot = self
            .provider
            .fetch_snapshot(credential, &portfolio.slug)
            .await?;
        snapshot.validate()?;
        Ok(self.aggregator.overview(
            portfolio,
            &snapshot,
            self.settings.major_holding_threshold,
        ))
    }
}
