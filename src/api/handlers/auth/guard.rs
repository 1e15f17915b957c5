//! Request authorization helpers.
//!
//! Flow Overview: extract the session token from the request, verify it, and
//! compare its subject against the owner email the request declares. Handlers
//! call [`require_subject`] first and return early on denial.

use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::debug;

use super::{session::extract_session_token, state::AuthState};

/// Why a request was denied.
#[derive(Debug, PartialEq, Eq)]
pub enum GuardError {
    /// No token was presented, or the presented token failed verification.
    NoCredential,
    /// The verified subject does not match the declared owner.
    Forbidden,
}

impl IntoResponse for GuardError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::NoCredential => {
                (StatusCode::UNAUTHORIZED, "Unauthorized access").into_response()
            }
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden access").into_response(),
        }
    }
}

/// Authorize a token against an optional declared owner email.
///
/// All verification failures collapse into `NoCredential`; the reason is
/// logged server-side and never echoed to the client.
///
/// # Errors
/// Returns `NoCredential` when no valid token is presented, `Forbidden` when
/// the subject does not match `declared_owner`.
pub fn authorize(
    carrier: Option<&str>,
    declared_owner: Option<&str>,
    auth_state: &AuthState,
) -> Result<String, GuardError> {
    let Some(token) = carrier else {
        return Err(GuardError::NoCredential);
    };

    let claims = match auth_state.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            debug!("Session token rejected: {err}");
            return Err(GuardError::NoCredential);
        }
    };

    if let Some(owner) = declared_owner {
        if claims.sub != owner {
            return Err(GuardError::Forbidden);
        }
    }

    Ok(claims.sub)
}

/// Resolve the session cookie into a subject, or deny the request.
///
/// # Errors
/// See [`authorize`].
pub fn require_subject(
    headers: &HeaderMap,
    declared_owner: Option<&str>,
    auth_state: &AuthState,
) -> Result<String, GuardError> {
    let token = extract_session_token(headers);
    authorize(token.as_deref(), declared_owner, auth_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;
    use axum::http::{HeaderValue, header::COOKIE};
    use secrecy::SecretString;
    use std::sync::Arc;

    fn auth_state() -> AuthState {
        AuthState::new(
            AuthConfig::new(Vec::new()),
            SecretString::from("guard-secret".to_string()),
        )
    }

    #[test]
    fn missing_carrier_is_no_credential() {
        let result = authorize(None, None, &auth_state());
        assert_eq!(result, Err(GuardError::NoCredential));
    }

    #[test]
    fn garbage_token_is_no_credential() {
        let result = authorize(Some("not-a-token"), None, &auth_state());
        assert_eq!(result, Err(GuardError::NoCredential));
    }

    #[test]
    fn expired_token_is_no_credential() -> Result<(), crate::token::Error> {
        let expired = AuthState::new(
            AuthConfig::new(Vec::new()).with_token_ttl_seconds(-10),
            SecretString::from("guard-secret".to_string()),
        );
        let token = expired.issue("user@example.com")?;

        let result = authorize(Some(&token), None, &auth_state());
        assert_eq!(result, Err(GuardError::NoCredential));
        Ok(())
    }

    #[tokio::test]
    /// Concurrent authorizations resolve each subject independently.
    async fn concurrent_authorize_keeps_subjects_apart() -> Result<(), crate::token::Error> {
        let state = Arc::new(auth_state());
        let token_a = state.issue("a@example.com")?;
        let token_b = state.issue("b@example.com")?;

        let state_a = Arc::clone(&state);
        let state_b = Arc::clone(&state);
        let first =
            tokio::spawn(
                async move { authorize(Some(&token_a), Some("a@example.com"), &state_a) },
            );
        let second =
            tokio::spawn(
                async move { authorize(Some(&token_b), Some("b@example.com"), &state_b) },
            );

        assert_eq!(
            first.await.ok().and_then(Result::ok),
            Some("a@example.com".to_string())
        );
        assert_eq!(
            second.await.ok().and_then(Result::ok),
            Some("b@example.com".to_string())
        );
        Ok(())
    }

    #[test]
    fn subject_mismatch_is_forbidden() -> Result<(), crate::token::Error> {
        let state = auth_state();
        let token = state.issue("user@example.com")?;

        let result = authorize(Some(&token), Some("other@example.com"), &state);
        assert_eq!(result, Err(GuardError::Forbidden));
        Ok(())
    }

    #[test]
    fn subject_match_returns_subject() -> Result<(), crate::token::Error> {
        let state = auth_state();
        let token = state.issue("user@example.com")?;

        let subject = authorize(Some(&token), Some("user@example.com"), &state)
            .map_err(|_| crate::token::Error::InvalidSignature)?;
        assert_eq!(subject, "user@example.com");
        Ok(())
    }

    #[test]
    fn no_declared_owner_only_authenticates() -> Result<(), crate::token::Error> {
        let state = auth_state();
        let token = state.issue("user@example.com")?;

        let subject = authorize(Some(&token), None, &state)
            .map_err(|_| crate::token::Error::InvalidSignature)?;
        assert_eq!(subject, "user@example.com");
        Ok(())
    }

    #[test]
    fn require_subject_reads_the_cookie() -> Result<(), crate::token::Error> {
        let state = auth_state();
        let token = state.issue("user@example.com")?;

        let mut headers = HeaderMap::new();
        let cookie = format!("careercode_token={token}");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.insert(COOKIE, value);
        }
        let subject = require_subject(&headers, None, &state)
            .map_err(|_| crate::token::Error::InvalidSignature)?;
        assert_eq!(subject, "user@example.com");

        let empty = HeaderMap::new();
        assert_eq!(
            require_subject(&empty, None, &state),
            Err(GuardError::NoCredential)
        );
        Ok(())
    }
}
