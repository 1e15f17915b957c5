//! Session endpoints for cookie auth.

use axum::{
    Json,
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, InvalidHeaderValue, SET_COOKIE},
    },
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use super::state::AuthState;
use crate::api::handlers::valid_email;

const TOKEN_COOKIE_NAME: &str = "careercode_token";

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/auth/session",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Session token issued and set as a cookie"),
        (status = 400, description = "Invalid email address", body = String)
    ),
    tag = "auth"
)]
/// Issues a session token for the posted email and sets it as a cookie.
/// The email is not authenticated here: the token attests the claimed
/// address only, and guarded routes enforce ownership against it.
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = payload.email.trim();
    if !valid_email(email) {
        return (StatusCode::BAD_REQUEST, "Invalid email address.").into_response();
    }

    let token = match auth_state.issue(email) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to issue session token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(&auth_state, &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Missing cookies are treated as "no session" to avoid leaking auth state.
    let Some(token) = extract_session_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    match auth_state.verify(&token) {
        Ok(claims) => {
            let response = SessionResponse { email: claims.sub };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            debug!("Session token rejected: {err}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Always clear the cookie; the token itself stays valid until it expires.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(&auth_state) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

/// Build an `HttpOnly` cookie holding the session token.
pub(super) fn session_cookie(
    auth_state: &AuthState,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = auth_state.config().token_ttl_seconds();
    // Cross-site frontends need SameSite=None, which browsers only accept with Secure.
    let secure = auth_state.config().cookie_secure();
    let same_site = if secure { "None" } else { "Lax" };
    let mut cookie = format!(
        "{TOKEN_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite={same_site}; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(auth_state: &AuthState) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = auth_state.config().cookie_secure();
    let same_site = if secure { "None" } else { "Lax" };
    let mut cookie =
        format!("{TOKEN_COOKIE_NAME}=; Path=/; HttpOnly; SameSite={same_site}; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == TOKEN_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;
    use axum::http::header::COOKIE;
    use secrecy::SecretString;

    fn state(origins: Vec<&str>) -> AuthState {
        let origins = origins.into_iter().map(str::to_string).collect();
        AuthState::new(
            AuthConfig::new(origins).with_token_ttl_seconds(3600),
            SecretString::from("cookie-secret".to_string()),
        )
    }

    #[test]
    fn session_cookie_is_lax_for_http_origins() -> Result<(), InvalidHeaderValue> {
        let cookie = session_cookie(&state(vec!["http://localhost:5173"]), "tok")?;
        assert_eq!(
            cookie.to_str().ok(),
            Some("careercode_token=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600")
        );
        Ok(())
    }

    #[test]
    fn session_cookie_is_none_and_secure_for_https_origins() -> Result<(), InvalidHeaderValue> {
        let cookie = session_cookie(&state(vec!["https://jobs.example.com"]), "tok")?;
        assert_eq!(
            cookie.to_str().ok(),
            Some("careercode_token=tok; Path=/; HttpOnly; SameSite=None; Max-Age=3600; Secure")
        );
        Ok(())
    }

    #[test]
    fn clear_cookie_expires_immediately() -> Result<(), InvalidHeaderValue> {
        let cookie = clear_session_cookie(&state(vec!["http://localhost:5173"]))?;
        assert_eq!(
            cookie.to_str().ok(),
            Some("careercode_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        );
        Ok(())
    }

    #[test]
    fn extracts_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; careercode_token=abc123; lang=en"),
        );
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extracts_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_carrier_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_token(&headers), None);
    }
}
