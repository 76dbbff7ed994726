use thiserror::Error;

/// Unified error type for the whole portfolio-lens-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Division by a zero total is not an error: undefined ratios are
/// `Option<f64>` (`None`) in the analytic records.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Portfolio '{query}' not found. Available portfolios: {available}")]
    PortfolioNotFound { query: String, available: String },

    // ── Session ─────────────────────────────────────────────────────
    #[error("Not logged in. Use the login tool with a session token or login link first.")]
    Unauthenticated,

    // ── Upstream / Network ──────────────────────────────────────────
    #[error("Upstream request failed (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Data contract ───────────────────────────────────────────────
    #[error("Data contract violation: {0}")]
    DataContract(String),

    // ── Session file ────────────────────────────────────────────────
    #[error("Invalid session file: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported session file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong passphrase or corrupted session file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest embeds the full URL; the start date and any login token
        // travel in the query string, so it is stripped.
        let msg = e.to_string();
        let sanitized = match msg.find('?') {
            Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
            None => msg,
        };
        CoreError::Network(sanitized)
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
