//! Tool layer: one user-invocable command per engine operation.
//!
//! Every tool answers with text. Errors raised by the engine, the session
//! store or the remote client are turned into an `Error: …` message here and
//! never propagate past [`ToolDispatcher::run`].

pub mod format;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::PortfolioFeed;
use format::Formatter;

/// Names the calling agent uses to invoke tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    Login,
    Logout,
    SessionStatus,
    ListPortfolios,
    PortfolioSummary,
    YieldSummary,
    Performance,
    AllPortfoliosSummary,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::Login,
        ToolName::Logout,
        ToolName::SessionStatus,
        ToolName::ListPortfolios,
        ToolName::PortfolioSummary,
        ToolName::YieldSummary,
        ToolName::Performance,
        ToolName::AllPortfoliosSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Login => "login",
            ToolName::Logout => "logout",
            ToolName::SessionStatus => "session_status",
            ToolName::ListPortfolios => "list_portfolios",
            ToolName::PortfolioSummary => "portfolio_summary",
            ToolName::YieldSummary => "yield_summary",
            ToolName::Performance => "performance",
            ToolName::AllPortfoliosSummary => "all_portfolios_summary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::Login => "Save a session from a token or login link (argument: token)",
            ToolName::Logout => "Forget the saved session",
            ToolName::SessionStatus => "Report whether a session is saved",
            ToolName::ListPortfolios => "List the portfolios of the logged-in user",
            ToolName::PortfolioSummary => {
                "Value by asset type and major holdings (argument: portfolio)"
            }
            ToolName::YieldSummary => {
                "Supplied, borrowed and net annual yield per lending pool (argument: portfolio)"
            }
            ToolName::Performance => {
                "Period return, change by asset type, top gainers and losers (arguments: portfolio, start_date YYYY-MM-DD)"
            }
            ToolName::AllPortfoliosSummary => "Summary of every portfolio",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "unknown tool '{s}'. Available tools: {}",
                    ToolName::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

/// A tool invocation with its (all optional) arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub tool: ToolName,
    /// Only read by `login`
    pub token: Option<String>,
    pub portfolio: Option<String>,
    /// `YYYY-MM-DD`, only read by `performance`
    pub start_date: Option<String>,
}

impl ToolRequest {
    pub fn new(tool: ToolName) -> Self {
        Self {
            tool,
            token: None,
            portfolio: None,
            start_date: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_portfolio(mut self, portfolio: impl Into<String>) -> Self {
        self.portfolio = Some(portfolio.into());
        self
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }
}

/// Text answer of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub tool: ToolName,
    pub success: bool,
    pub text: String,
}

/// JSON tool call, as sent by an agent: `{"tool": "...", "arguments": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,

    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,

    /// Echoed back in the result
    #[serde(default)]
    pub id: Option<String>,
}

/// JSON answer to a [`ToolCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub success: bool,
    pub output: String,
}

impl ToolCall {
    /// Validate the tool name and pull out the known arguments.
    pub fn to_request(&self) -> Result<ToolRequest, CoreError> {
        Ok(ToolRequest {
            tool: self.tool.parse()?,
            token: self.string_argument(&["token", "url"])?,
            portfolio: self.string_argument(&["portfolio", "portfolio_name", "name"])?,
            start_date: self.string_argument(&["start_date", "startDate"])?,
        })
    }

    fn string_argument(&self, keys: &[&str]) -> Result<Option<String>, CoreError> {
        for key in keys {
            match self.arguments.get(*key) {
                None | Some(serde_json::Value::Null) => continue,
                Some(serde_json::Value::String(s)) => return Ok(Some(s.clone())),
                Some(other) => {
                    return Err(CoreError::InvalidInput(format!(
                        "argument '{key}' must be a string, got {other}"
                    )))
                }
            }
        }
        Ok(None)
    }
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::InvalidInput(format!(
            "start date '{input}' is not a valid YYYY-MM-DD date"
        ))
    })
}

/// Maps tool requests onto [`PortfolioFeed`] operations and renders the result.
pub struct ToolDispatcher {
    feed: PortfolioFeed,
}

impl ToolDispatcher {
    pub fn new(feed: PortfolioFeed) -> Self {
        Self { feed }
    }

    pub fn feed(&self) -> &PortfolioFeed {
        &self.feed
    }

    /// Run a tool. Never fails: errors become the output text.
    pub async fn run(&self, request: &ToolRequest) -> ToolOutput {
        debug!(tool = %request.tool, "running tool");
        match self.execute(request).await {
            Ok(text) => ToolOutput {
                tool: request.tool,
                success: true,
                text,
            },
            Err(e) => {
                warn!(tool = %request.tool, error = %e, "tool failed");
                ToolOutput {
                    tool: request.tool,
                    success: false,
                    text: format!("Error: {e}"),
                }
            }
        }
    }

    /// JSON front door used by the line-oriented server.
    pub async fn call(&self, call: &ToolCall) -> ToolResult {
        let (success, output) = match call.to_request() {
            Ok(request) => {
                let out = self.run(&request).await;
                (out.success, out.text)
            }
            Err(e) => (false, format!("Error: {e}")),
        };
        ToolResult {
            tool: call.tool.clone(),
            id: call.id.clone(),
            success,
            output,
        }
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, CoreError> {
        let portfolio_query = request.portfolio.as_deref();

        match request.tool {
            ToolName::Login => {
                let token = request.token.as_deref().ok_or_else(|| {
                    CoreError::InvalidInput("login requires a token or login link".into())
                })?;
                self.feed.login(token)?;
                Ok("Logged in. Session saved.".to_string())
            }
            ToolName::Logout => {
                self.feed.logout()?;
                Ok("Logged out. Session cleared.".to_string())
            }
            ToolName::SessionStatus => Ok(if self.feed.is_logged_in()? {
                "Logged in.".to_string()
            } else {
                "Not logged in.".to_string()
            }),
            ToolName::ListPortfolios => {
                let portfolios = self.feed.list_portfolios().await?;
                Ok(Formatter::portfolio_list(&portfolios))
            }
            ToolName::PortfolioSummary => {
                let portfolio = self.feed.resolve_portfolio(portfolio_query).await?;
                let overview = self.feed.portfolio_overview(&portfolio).await?;
                Ok(Formatter::overview(
                    &overview,
                    self.feed.settings().major_holding_threshold,
                ))
            }
            ToolName::YieldSummary => {
                let portfolio = self.feed.resolve_portfolio(portfolio_query).await?;
                let summary = self.feed.yield_summary(&portfolio).await?;
                Ok(Formatter::yield_summary(&summary))
            }
            ToolName::Performance => {
                // Validate the date before any remote call.
                let start = match request.start_date.as_deref() {
                    Some(s) if !s.trim().is_empty() => parse_start_date(s)?,
                    _ => self.feed.default_start_date(),
                };
                let portfolio = self.feed.resolve_portfolio(portfolio_query).await?;
                let report = self.feed.performance_report(&portfolio, start).await?;
                Ok(Formatter::performance(&report))
            }
            ToolName::AllPortfoliosSummary => {
                let threshold = self.feed.settings().major_holding_threshold;
                let results = self.feed.overview_all().await?;
                if results.is_empty() {
                    return Ok("No portfolios found.".to_string());
                }
                let sections: Vec<String> = results
                    .iter()
                    .map(|(portfolio, result)| match result {
                        Ok(overview) => Formatter::overview(overview, threshold),
                        Err(e) => format!("Portfolio: {portfolio}\nError: {e}"),
                    })
                    .collect();
                Ok(sections.join("\n\n"))
            }
        }
    }
}
