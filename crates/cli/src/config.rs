use std::path::PathBuf;

use portfolio_lens_core::config::{ClientSettings, FeedSettings};
use tracing::info;

/// Passphrase used for the session file when none is configured.
const FALLBACK_PASSPHRASE: &str = "portfolio-lens-local-session";

/// Runtime configuration read from the environment (and `.env`).
pub struct AppConfig {
    pub client: ClientSettings,
    pub feed: FeedSettings,
    pub session_file: PathBuf,
    pub passphrase: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut client = ClientSettings::default();
        if let Ok(url) = std::env::var("PORTFOLIO_LENS_API_URL") {
            client.base_url = url;
        }
        if let Ok(name) = std::env::var("PORTFOLIO_LENS_COOKIE_NAME") {
            client.cookie_name = name;
        }
        client.timeout_secs = std::env::var("PORTFOLIO_LENS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(client.timeout_secs);

        let defaults = FeedSettings::default();
        let feed = FeedSettings {
            major_holding_threshold: std::env::var("PORTFOLIO_LENS_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.major_holding_threshold),
            ..defaults
        };

        let session_file = std::env::var("PORTFOLIO_LENS_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        let passphrase = std::env::var("PORTFOLIO_LENS_PASSPHRASE").unwrap_or_else(|_| {
            info!("PORTFOLIO_LENS_PASSPHRASE is not set; the session file uses a built-in passphrase");
            FALLBACK_PASSPHRASE.to_string()
        });

        Self {
            client,
            feed,
            session_file,
            passphrase,
        }
    }
}

fn default_session_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".portfolio-lens")
        .join("session.plss")
}
