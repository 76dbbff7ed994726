use serde::{Deserialize, Serialize};

/// Identifies a portfolio for subsequent data fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortfolioRef {
    /// URL-safe identifier used in endpoint paths
    pub slug: String,

    /// Display name, matched by the locator
    pub name: String,
}

impl PortfolioRef {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for PortfolioRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.slug)
    }
}
