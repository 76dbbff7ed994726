use crate::errors::CoreError;
use crate::models::portfolio::PortfolioRef;

/// Resolves a user-supplied portfolio name against the known portfolios.
pub struct PortfolioLocator;

impl PortfolioLocator {
    pub fn new() -> Self {
        Self
    }

    /// Find a portfolio by name.
    ///
    /// 1. No query (or a blank one): the first portfolio, in source order.
    /// 2. Case-insensitive exact name match.
    /// 3. First case-insensitive substring match.
    /// 4. Otherwise `PortfolioNotFound`, listing every available name.
    pub fn find<'a>(
        &self,
        portfolios: &'a [PortfolioRef],
        query: Option<&str>,
    ) -> Result<&'a PortfolioRef, CoreError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let Some(query) = query else {
            return portfolios.first().ok_or_else(|| {
                CoreError::InvalidInput("no portfolios are available for this account".into())
            });
        };

        let needle = query.to_lowercase();

        if let Some(exact) = portfolios.iter().find(|p| p.name.to_lowercase() == needle) {
            return Ok(exact);
        }

        if let Some(partial) = portfolios
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
        {
            return Ok(partial);
        }

        Err(CoreError::PortfolioNotFound {
            query: query.to_string(),
            available: portfolios
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

impl Default for PortfolioLocator {
    fn default() -> Self {
        Self::new()
    }
}
