// ═══════════════════════════════════════════════════════════════════
// Provider Tests — HTTP endpoint building, response decoding,
// PortfolioProvider trait objects
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::sync::Arc;

use portfolio_lens_core::config::ClientSettings;
use portfolio_lens_core::errors::CoreError;
use portfolio_lens_core::models::credential::Credential;
use portfolio_lens_core::models::performance::PortfolioPerformanceResponse;
use portfolio_lens_core::models::pool::YieldResponse;
use portfolio_lens_core::models::portfolio::PortfolioRef;
use portfolio_lens_core::models::snapshot::Snapshot;
use portfolio_lens_core::providers::http::{parse_body, parse_portfolio_list, HttpPortfolioProvider};
use portfolio_lens_core::providers::traits::PortfolioProvider;

fn provider(base_url: &str) -> HttpPortfolioProvider {
    HttpPortfolioProvider::new(&ClientSettings {
        base_url: base_url.to_string(),
        ..ClientSettings::default()
    })
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Construction & URLs
// ═══════════════════════════════════════════════════════════════════

mod urls {
    use super::*;

    #[test]
    fn default_settings_build() {
        let p = HttpPortfolioProvider::new(&ClientSettings::default()).unwrap();
        assert_eq!(p.name(), "PortfolioFeedHttp");
    }

    #[test]
    fn invalid_base_url_fails_on_use() {
        let p = HttpPortfolioProvider::new(&ClientSettings {
            base_url: "not a url".into(),
            ..ClientSettings::default()
        })
        .unwrap();
        let err = p.endpoint_url("portfolios", &[]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref m) if m.contains("invalid API base URL")));
    }

    #[tokio::test]
    async fn invalid_base_url_reported_by_remote_calls() {
        let p = HttpPortfolioProvider::new(&ClientSettings {
            base_url: "::bad".into(),
            ..ClientSettings::default()
        })
        .unwrap();
        let credential = Credential::from_token("tok".to_string()).unwrap();
        assert!(matches!(
            p.list_portfolios(&credential).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            p.fetch_snapshot(&credential, "main").await,
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn endpoint_keeps_base_path() {
        for base in ["https://api.example.com/v1", "https://api.example.com/v1/"] {
            let url = provider(base).endpoint_url("portfolios", &[]).unwrap();
            assert_eq!(url.as_str(), "https://api.example.com/v1/portfolios");
        }
    }

    #[test]
    fn endpoint_with_query() {
        let url = provider("https://api.example.com/v1")
            .endpoint_url(
                "portfolios/main/performance",
                &[("startDate", "2026-01-01".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/portfolios/main/performance?startDate=2026-01-01"
        );
    }

    #[test]
    fn leading_slash_does_not_escape_base() {
        let url = provider("https://api.example.com/v1")
            .endpoint_url("/portfolios", &[])
            .unwrap();
        assert_eq!(url.path(), "/v1/portfolios");
    }

    #[test]
    fn portfolio_path_plain_slug() {
        assert_eq!(
            HttpPortfolioProvider::portfolio_path("main", "snapshot").unwrap(),
            "portfolios/main/snapshot"
        );
    }

    #[test]
    fn portfolio_path_encodes_slug() {
        assert_eq!(
            HttpPortfolioProvider::portfolio_path("a/b c", "yield").unwrap(),
            "portfolios/a%2Fb%20c/yield"
        );
    }

    #[test]
    fn portfolio_path_rejects_dot_segments() {
        for slug in [".", ".."] {
            assert!(HttpPortfolioProvider::portfolio_path(slug, "yield").is_err());
        }
        assert_eq!(
            HttpPortfolioProvider::portfolio_path("v1.2", "yield").unwrap(),
            "portfolios/v1.2/yield"
        );
    }

    #[test]
    fn portfolio_path_rejects_empty_slug() {
        assert!(matches!(
            HttpPortfolioProvider::portfolio_path("", "snapshot"),
            Err(CoreError::InvalidInput(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Response decoding
// ═══════════════════════════════════════════════════════════════════

mod decoding {
    use super::*;

    #[test]
    fn success_body_is_parsed() {
        let snapshot: Snapshot = parse_body(StatusCode::OK, r#"{"usdValue": 12.5}"#).unwrap();
        assert_eq!(snapshot.usd_value, 12.5);
    }

    #[test]
    fn malformed_success_body() {
        let err = parse_body::<Snapshot>(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(ref m) if m.contains("malformed")));
    }

    #[test]
    fn upstream_json_message() {
        let err = parse_body::<Snapshot>(
            StatusCode::UNAUTHORIZED,
            r#"{"message": "session expired"}"#,
        )
        .unwrap_err();
        match err {
            CoreError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "session expired");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn upstream_error_field() {
        let err = parse_body::<Snapshot>(StatusCode::NOT_FOUND, r#"{"error": "no such portfolio"}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::Upstream { status: 404, ref message } if message == "no such portfolio"));
    }

    #[test]
    fn upstream_plain_body_is_truncated() {
        let body = "x".repeat(500);
        let err = parse_body::<Snapshot>(StatusCode::BAD_GATEWAY, &body).unwrap_err();
        match err {
            CoreError::Upstream { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), 200);
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn upstream_empty_body_uses_reason() {
        let err = parse_body::<Snapshot>(StatusCode::SERVICE_UNAVAILABLE, "").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Upstream { status: 503, ref message } if message == "Service Unavailable"
        ));
    }

    #[test]
    fn portfolio_list_bare_array() {
        let list = parse_portfolio_list(
            StatusCode::OK,
            r#"[{"slug":"main","name":"Main"},{"slug":"trading","name":"Trading"}]"#,
        )
        .unwrap();
        assert_eq!(
            list,
            vec![
                PortfolioRef::new("main", "Main"),
                PortfolioRef::new("trading", "Trading")
            ]
        );
    }

    #[test]
    fn portfolio_list_wrapped() {
        let list = parse_portfolio_list(
            StatusCode::OK,
            r#"{"portfolios":[{"slug":"main","name":"Main"}]}"#,
        )
        .unwrap();
        assert_eq!(list, vec![PortfolioRef::new("main", "Main")]);
    }

    #[test]
    fn portfolio_list_error_status() {
        assert!(matches!(
            parse_portfolio_list(StatusCode::FORBIDDEN, "denied"),
            Err(CoreError::Upstream { status: 403, .. })
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trait objects
// ═══════════════════════════════════════════════════════════════════

mod trait_objects {
    use super::*;

    /// Records the slug and start date it was asked for.
    struct EchoProvider;

    #[async_trait]
    impl PortfolioProvider for EchoProvider {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn list_portfolios(
            &self,
            credential: &Credential,
        ) -> Result<Vec<PortfolioRef>, CoreError> {
            Ok(vec![PortfolioRef::new(credential.token(), "Echo")])
        }

        async fn fetch_snapshot(
            &self,
            _credential: &Credential,
            _slug: &str,
        ) -> Result<Snapshot, CoreError> {
            Ok(Snapshot::new(1.0, vec![]))
        }

        async fn fetch_yield(
            &self,
            _credential: &Credential,
            _slug: &str,
        ) -> Result<YieldResponse, CoreError> {
            Ok(YieldResponse::default())
        }

        async fn fetch_performance(
            &self,
            _credential: &Credential,
            slug: &str,
            start: NaiveDate,
        ) -> Result<PortfolioPerformanceResponse, CoreError> {
            Ok(PortfolioPerformanceResponse {
                starts_at: Some(format!("{slug}@{start}")),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn credential_is_passed_per_call() {
        let provider: Arc<dyn PortfolioProvider> = Arc::new(EchoProvider);
        let credential = Credential::from_token("tok-9".to_string()).unwrap();
        let list = provider.list_portfolios(&credential).await.unwrap();
        assert_eq!(list[0].slug, "tok-9");
    }

    #[tokio::test]
    async fn start_date_reaches_provider() {
        let provider: Arc<dyn PortfolioProvider> = Arc::new(EchoProvider);
        let credential = Credential::from_token("tok".to_string()).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let resp = provider
            .fetch_performance(&credential, "main", start)
            .await
            .unwrap();
        assert_eq!(resp.starts_at.as_deref(), Some("main@2026-03-01"));
    }
}
