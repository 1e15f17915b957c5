//! Auth state and session token configuration.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use crate::token::{self, SessionTokenClaims};

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    origins: Vec<String>,
    token_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(origins: Vec<String>) -> Self {
        let origins = if origins.is_empty() {
            vec![DEFAULT_ORIGIN.to_string()]
        } else {
            origins
        };

        Self {
            origins,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub(crate) fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    /// Cookies are only marked `Secure` when every allowed origin is HTTPS.
    pub(super) fn cookie_secure(&self) -> bool {
        self.origins
            .iter()
            .all(|origin| origin.starts_with("https://"))
    }
}

pub struct AuthState {
    config: AuthConfig,
    secret: SecretString,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, secret: SecretString) -> Self {
        Self { config, secret }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Issue a signed session token with `email` as the subject.
    ///
    /// # Errors
    /// Returns an error if the claims cannot be encoded or signed.
    pub fn issue(&self, email: &str) -> Result<String, token::Error> {
        let claims = SessionTokenClaims::new(
            email,
            Utc::now().timestamp(),
            self.config.token_ttl_seconds,
        );
        token::sign_hs256(self.secret.expose_secret().as_bytes(), &claims)
    }

    /// Verify a session token and return its claims.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, forged, or expired.
    pub fn verify(&self, token: &str) -> Result<SessionTokenClaims, token::Error> {
        token::verify_hs256(
            token,
            self.secret.expose_secret().as_bytes(),
            Utc::now().timestamp(),
        )
    }
}
