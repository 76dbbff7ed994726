use reqwest::Url;

use crate::errors::CoreError;

/// Query parameter carrying the session token in a login link.
const LOGIN_LINK_TOKEN_PARAM: &str = "token";

/// Bearer credential for the portfolio feed.
///
/// Passed explicitly into every remote call; there is no ambient session.
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Credential {
    /// Accept either a login link (`https://…?token=…`) or a raw token.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CoreError::InvalidInput(
                "session token must not be empty".into(),
            ));
        }

        if let Ok(url) = Url::parse(input) {
            if matches!(url.scheme(), "http" | "https") {
                let token = url
                    .query_pairs()
                    .find(|(k, _)| k == LOGIN_LINK_TOKEN_PARAM)
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                if token.is_empty() {
                    return Err(CoreError::InvalidInput(format!(
                        "login link has no '{LOGIN_LINK_TOKEN_PARAM}' parameter"
                    )));
                }
                return Self::from_token(token);
            }
        }

        Self::from_token(input.to_string())
    }

    /// Wrap a raw token. The token ends up inside a `Cookie` header, so it
    /// must be visible ASCII without separators.
    pub fn from_token(token: String) -> Result<Self, CoreError> {
        if token.is_empty() {
            return Err(CoreError::InvalidInput(
                "session token must not be empty".into(),
            ));
        }
        if let Some(bad) = token
            .chars()
            .find(|c| !c.is_ascii_graphic() || *c == ';' || *c == ',')
        {
            return Err(CoreError::InvalidInput(format!(
                "session token contains an invalid character {bad:?}"
            )));
        }
        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
