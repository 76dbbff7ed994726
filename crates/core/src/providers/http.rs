use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientSettings;
use crate::errors::CoreError;
use crate::models::credential::Credential;
use crate::models::performance::PortfolioPerformanceResponse;
use crate::models::pool::YieldResponse;
use crate::models::portfolio::PortfolioRef;
use crate::models::snapshot::Snapshot;
use super::traits::PortfolioProvider;

/// Header carrying a per-request correlation id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest slice of an error body copied into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP client for the portfolio feed API.
///
/// - **Auth**: session cookie (`Cookie: <cookie_name>=<token>`), supplied per call.
/// - **Endpoints**: `/portfolios`, `/portfolios/{slug}/snapshot`,
///   `/portfolios/{slug}/yield`, `/portfolios/{slug}/performance?startDate=YYYY-MM-DD`
///
/// An unparsable base URL does not fail construction: it is reported by
/// every remote call instead, so session-only tools keep working.
pub struct HttpPortfolioProvider {
    client: Client,
    base_url: Result<Url, String>,
    cookie_name: String,
}

// ── Feed response types ─────────────────────────────────────────────

/// The list endpoint answers either with a bare array or with a wrapper object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortfolioListResponse {
    Bare(Vec<PortfolioRef>),
    Wrapped { portfolios: Vec<PortfolioRef> },
}

impl PortfolioListResponse {
    fn into_portfolios(self) -> Vec<PortfolioRef> {
        match self {
            PortfolioListResponse::Bare(portfolios) => portfolios,
            PortfolioListResponse::Wrapped { portfolios } => portfolios,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpPortfolioProvider {
    pub fn new(settings: &ClientSettings) -> Result<Self, CoreError> {
        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let mut base = settings.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .map_err(|e| format!("invalid API base URL '{}': {e}", settings.base_url));
        if let Err(reason) = &base_url {
            warn!("{reason}");
        }

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        let client = builder
            .build()
            .map_err(|e| CoreError::Network(format!("failed to initialize HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            cookie_name: settings.cookie_name.clone(),
        })
    }

    /// Absolute URL of an endpoint path such as `portfolios/main/yield`.
    pub fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CoreError> {
        let base = self
            .base_url
            .as_ref()
            .map_err(|reason| CoreError::InvalidInput(reason.clone()))?;
        let mut url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| CoreError::InvalidInput(format!("invalid endpoint path '{path}': {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Path of a per-portfolio endpoint, with the slug percent-encoded.
    pub fn portfolio_path(slug: &str, resource: &str) -> Result<String, CoreError> {
        if slug.is_empty() {
            return Err(CoreError::InvalidInput("portfolio slug must not be empty".into()));
        }
        // `.` and `..` would be resolved as path segments by `Url::join`.
        if slug.bytes().all(|b| b == b'.') {
            return Err(CoreError::InvalidInput(format!("invalid portfolio slug '{slug}'")));
        }
        let encoded: String = slug
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{b:02X}"),
            })
            .collect();
        Ok(format!("portfolios/{encoded}/{resource}"))
    }

    fn headers(&self, credential: &Credential) -> Result<HeaderMap, CoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let cookie = HeaderValue::from_str(&format!("{}={}", self.cookie_name, credential.token()))
            .map_err(|_| CoreError::InvalidInput("session token is not a valid header value".into()))?;
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        url: Url,
    ) -> Result<T, CoreError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(path = url.path(), %request_id, "GET");

        let response = self
            .client
            .get(url)
            .headers(self.headers(credential)?)
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%request_id, status = status.as_u16(), bytes = body.len(), "response");

        parse_body(status, &body)
    }
}

/// Turn a status + body into a typed document or an upstream error.
pub fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, CoreError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or_else(|| {
                let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
                if snippet.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("no response body")
                        .to_string()
                } else {
                    snippet
                }
            });
        return Err(CoreError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(body)
        .map_err(|e| CoreError::Deserialization(format!("malformed response body: {e}")))
}

/// Decode the body of the list endpoint (bare array or `{"portfolios": [...]}`).
pub fn parse_portfolio_list(status: StatusCode, body: &str) -> Result<Vec<PortfolioRef>, CoreError> {
    parse_body::<PortfolioListResponse>(status, body).map(PortfolioListResponse::into_portfolios)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PortfolioProvider for HttpPortfolioProvider {
    fn name(&self) -> &str {
        "PortfolioFeedHttp"
    }

    async fn list_portfolios(
        &self,
        credential: &Credential,
    ) -> Result<Vec<PortfolioRef>, CoreError> {
        let url = self.endpoint_url("portfolios", &[])?;
        let list: PortfolioListResponse = self.get_json(credential, url).await?;
        Ok(list.into_portfolios())
    }

    async fn fetch_snapshot(
        &self,
        credential: &Credential,
        slug: &str,
    ) -> Result<Snapshot, CoreError> {
        let url = self.endpoint_url(&Self::portfolio_path(slug, "snapshot")?, &[])?;
        self.get_json(credential, url).await
    }

    async fn fetch_yield(
        &self,
        credential: &Credential,
        slug: &str,
    ) -> Result<YieldResponse, CoreError> {
        let url = self.endpoint_url(&Self::portfolio_path(slug, "yield")?, &[])?;
        self.get_json(credential, url).await
    }

    async fn fetch_performance(
        &self,
        credential: &Credential,
        slug: &str,
        start: NaiveDate,
    ) -> Result<PortfolioPerformanceResponse, CoreError> {
        let url = self.endpoint_url(
            &Self::portfolio_path(slug, "performance")?,
            &[("startDate", start.format("%Y-%m-%d").to_string())],
        )?;
        self.get_json(credential, url).await
    }
}
