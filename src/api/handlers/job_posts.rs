//! Job post CRUD handlers.
//!
//! This module implements the HR-facing endpoints and delegates database
//! access to the shared `store` module. Writes against documents owned by
//! someone else return `404` to avoid leaking their existence.

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::auth::{AuthState, guard::require_subject};
use super::store::{
    fetch_job_post, fetch_job_posts, insert_job_post, parse_id, remove_job_post, update_job_post,
};
use super::{CreatedResponse, DeletedResponse, ModifiedResponse};

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    email: Option<String>,
}

#[utoipa::path(
    post,
    path = "/job-post",
    request_body = Value,
    responses(
        (status = 201, description = "Job post created.", body = CreatedResponse),
        (status = 400, description = "Missing `hr_email` field.", body = String),
        (status = 401, description = "Missing or invalid session token."),
        (status = 403, description = "Session subject does not match `hr_email`."),
    ),
    tag = "job-posts"
)]
/// Creates a job post owned by the `hr_email` declared in the document.
/// The session subject must match the declared owner.
pub async fn create_job_post(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let declared = payload
        .get("hr_email")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Err(err) = require_subject(&headers, declared.as_deref(), &auth_state) {
        return err.into_response();
    }
    if declared.is_none() {
        return (StatusCode::BAD_REQUEST, "hr_email is required.").into_response();
    }

    match insert_job_post(&pool, &payload).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreatedResponse { id: id.to_string() }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/job-post",
    params(("email" = Option<String>, Query, description = "Scope results to this owner email")),
    responses(
        (status = 200, description = "Job posts, newest first."),
        (status = 401, description = "Owner filter given without a valid session token."),
        (status = 403, description = "Owner filter does not match the session subject."),
    ),
    tag = "job-posts"
)]
/// Lists job posts, newest first. Without a filter the listing is public;
/// `?email=` scopes it to one owner and requires a matching session.
pub async fn list_job_posts(
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if let Some(email) = &query.email {
        if let Err(err) = require_subject(&headers, Some(email), &auth_state) {
            return err.into_response();
        }
    }

    match fetch_job_posts(&pool, query.email.as_deref()).await {
        Ok(docs) => (StatusCode::OK, Json(docs)).into_response(),
        Err(err) => {
            error!("Failed to list job posts: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/job-post/{id}",
    params(("id" = String, Path, description = "Job post id")),
    responses(
        (status = 200, description = "Job post detail."),
        (status = 400, description = "Malformed id.", body = String),
        (status = 404, description = "Job post not found."),
    ),
    tag = "job-posts"
)]
/// Fetches a single job post by id.
pub async fn get_job_post(Path(id): Path<String>, pool: Extension<PgPool>) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match fetch_job_post(&pool, id).await {
        Ok(Some(doc)) => (StatusCode::OK, Json(doc)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to get job post: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/job-post/{id}",
    request_body = Value,
    params(("id" = String, Path, description = "Job post id")),
    responses(
        (status = 200, description = "Job post updated.", body = ModifiedResponse),
        (status = 400, description = "Malformed id or non-object body.", body = String),
        (status = 401, description = "Missing or invalid session token."),
        (status = 403, description = "Body declares a different `hr_email`."),
        (status = 404, description = "No job post with this id owned by the caller."),
    ),
    tag = "job-posts"
)]
/// Shallow-merges the body into a job post owned by the caller.
/// Unknown and foreign ids are both `404`.
pub async fn patch_job_post(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let declared = payload
        .get("hr_email")
        .and_then(Value::as_str)
        .map(str::to_string);
    let subject = match require_subject(&headers, declared.as_deref(), &auth_state) {
        Ok(subject) => subject,
        Err(err) => return err.into_response(),
    };

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    if !payload.is_object() {
        return (StatusCode::BAD_REQUEST, "Expected a JSON object.").into_response();
    }

    match update_job_post(&pool, id, &subject, &payload).await {
        Ok(true) => (StatusCode::OK, Json(ModifiedResponse { modified: 1 })).into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/job-post/{id}",
    params(("id" = String, Path, description = "Job post id")),
    responses(
        (status = 200, description = "Job post deleted.", body = DeletedResponse),
        (status = 400, description = "Malformed id.", body = String),
        (status = 401, description = "Missing or invalid session token."),
        (status = 404, description = "No job post with this id owned by the caller."),
    ),
    tag = "job-posts"
)]
/// Deletes a job post owned by the caller. Unknown and foreign ids are both `404`.
pub async fn delete_job_post(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let subject = match require_subject(&headers, None, &auth_state) {
        Ok(subject) => subject,
        Err(err) => return err.into_response(),
    };

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match remove_job_post(&pool, id, &subject).await {
        Ok(true) => (StatusCode::OK, Json(DeletedResponse { deleted: 1 })).into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => err.into_response(),
    }
}
