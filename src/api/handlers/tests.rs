//! Handler tests that drive the router without a database.
//!
//! Session endpoints and guard denials resolve before any query runs, so
//! these tests use a lazy pool pointing at a closed port. Paths that reach
//! Postgres are covered by the store tests.

use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::{Body, to_bytes},
    http::{
        Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
    routing::{delete, get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

use super::auth::{AuthConfig, AuthState};
use super::valid_email;

fn unreachable_pool() -> PgPool {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("invalid")
        .database("invalid")
        .ssl_mode(PgSslMode::Disable);
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy_with(options)
}

fn test_state() -> Arc<AuthState> {
    Arc::new(AuthState::new(
        AuthConfig::new(vec!["http://localhost:5173".to_string()]),
        SecretString::from("handler-tests".to_string()),
    ))
}

/// Builds an `axum::Router` with the production routes mounted, backed by the
/// given pool and auth state.
fn app_router(pool: PgPool, state: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/auth/session",
            post(super::auth::session::login).get(super::auth::session::session),
        )
        .route("/auth/logout", post(super::auth::session::logout))
        .route("/jobs", get(super::jobs::list_jobs))
        .route("/jobs/:id", get(super::jobs::get_job))
        .route(
            "/job-post",
            post(super::job_posts::create_job_post).get(super::job_posts::list_job_posts),
        )
        .route(
            "/job-post/:id",
            get(super::job_posts::get_job_post)
                .patch(super::job_posts::patch_job_post)
                .delete(super::job_posts::delete_job_post),
        )
        .route(
            "/job-applications",
            post(super::applications::create_application)
                .get(super::applications::list_applications),
        )
        .route(
            "/job-applications/:id",
            delete(super::applications::delete_application),
        )
        .layer(Extension(pool))
        .layer(Extension(state))
}

fn json_request(method: &str, uri: &str, body: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

fn session_cookie_for(state: &AuthState, email: &str) -> Result<String> {
    let token = state.issue(email)?;
    Ok(format!("careercode_token={token}"))
}

#[tokio::test]
/// Verifies that a valid login returns `204` and sets the session cookie with
/// the attributes the frontend relies on.
async fn login_sets_session_cookie() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/session",
            &json!({ "email": "hr@example.com" }),
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?;
    assert!(cookie.starts_with("careercode_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=3600"));
    Ok(())
}

#[tokio::test]
async fn login_rejects_invalid_email() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/session",
            &json!({ "email": "not-an-email" }),
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Invalid email address.");
    Ok(())
}

#[tokio::test]
/// A session cookie round-trips: the whoami endpoint reports the subject the
/// token was issued for.
async fn session_reflects_cookie() -> Result<()> {
    let state = test_state();
    let cookie = session_cookie_for(&state, "hr@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .header(COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let payload: Value = serde_json::from_slice(&body)?;
    assert_eq!(payload, json!({ "email": "hr@example.com" }));
    Ok(())
}

#[tokio::test]
async fn session_without_cookie_is_anonymous() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(Request::builder().uri("/auth/session").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
/// Bearer tokens are accepted as an alternative carrier for non-browser
/// clients.
async fn bearer_token_is_accepted() -> Result<()> {
    let state = test_state();
    let token = state.issue("applicant@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?;
    assert_eq!(
        cookie,
        "careercode_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    );
    Ok(())
}

#[tokio::test]
/// Creating a job post without a session is rejected before any validation
/// or database work happens.
async fn create_job_post_requires_session() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(json_request(
            "POST",
            "/job-post",
            &json!({ "hr_email": "hr@example.com", "title": "Rust Engineer" }),
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Unauthorized access");
    Ok(())
}

#[tokio::test]
/// A valid session cannot create documents declaring someone else as owner.
async fn create_job_post_rejects_foreign_owner() -> Result<()> {
    let state = test_state();
    let cookie = session_cookie_for(&state, "applicant@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let mut request = json_request(
        "POST",
        "/job-post",
        &json!({ "hr_email": "hr@example.com", "title": "Rust Engineer" }),
    )?;
    request
        .headers_mut()
        .insert(COOKIE, cookie.parse()?);
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Forbidden access");
    Ok(())
}

#[tokio::test]
async fn create_job_post_requires_owner_field() -> Result<()> {
    let state = test_state();
    let cookie = session_cookie_for(&state, "hr@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let mut request = json_request("POST", "/job-post", &json!({ "title": "Rust Engineer" }))?;
    request
        .headers_mut()
        .insert(COOKIE, cookie.parse()?);
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"hr_email is required.");
    Ok(())
}

#[tokio::test]
/// The owner-scoped job post listing only serves the session subject.
async fn scoped_job_post_listing_checks_subject() -> Result<()> {
    let state = test_state();
    let cookie = session_cookie_for(&state, "hr@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/job-post?email=other@example.com")
                .header(COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/job-post?email=hr@example.com")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn applications_listing_requires_email_filter() -> Result<()> {
    let state = test_state();
    let cookie = session_cookie_for(&state, "applicant@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/job-applications")
                .header(COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"email query parameter is required.");
    Ok(())
}

#[tokio::test]
async fn applications_listing_requires_session() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/job-applications?email=applicant@example.com")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
/// An expired credential on a guarded route yields `401`, never the data.
async fn expired_session_cannot_list_applications() -> Result<()> {
    // Same secret as the router state, but issuing already-expired tokens.
    let expired_issuer = AuthState::new(
        AuthConfig::new(vec!["http://localhost:5173".to_string()]).with_token_ttl_seconds(-10),
        SecretString::from("handler-tests".to_string()),
    );
    let cookie = session_cookie_for(&expired_issuer, "applicant@example.com")?;

    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/job-applications?email=applicant@example.com")
                .header(COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Unauthorized access");
    Ok(())
}

#[tokio::test]
async fn get_job_rejects_malformed_id() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/not-a-uuid")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Invalid id.");
    Ok(())
}

#[tokio::test]
async fn delete_application_requires_session() -> Result<()> {
    let app = app_router(unreachable_pool(), test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/job-applications/{}", Uuid::new_v4()))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
/// A patch declaring a different owner is refused even when the session is
/// otherwise valid.
async fn patch_job_post_rejects_foreign_owner() -> Result<()> {
    let state = test_state();
    let cookie = session_cookie_for(&state, "applicant@example.com")?;

    let app = app_router(unreachable_pool(), state);
    let mut request = json_request(
        "PATCH",
        &format!("/job-post/{}", Uuid::new_v4()),
        &json!({ "hr_email": "hr@example.com" }),
    )?;
    request
        .headers_mut()
        .insert(COOKIE, cookie.parse()?);
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[test]
fn test_valid_email() {
    assert!(valid_email("user@example.com"));
    assert!(valid_email("hr@jobs.example.co"));
    assert!(!valid_email("user"));
    assert!(!valid_email("user@"));
    assert!(!valid_email("@example.com"));
    assert!(!valid_email("user@example"));
    assert!(!valid_email("us er@example.com"));
    assert!(!valid_email(""));
}
