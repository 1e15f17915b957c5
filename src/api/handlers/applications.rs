//! Job application handlers.
//!
//! Applications are always scoped to their applicant: the listing requires an
//! `email` filter matching the session subject, and deletes against foreign
//! documents return `404`.

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
use super::store::{fetch_applications_for, insert_application, parse_id, remove_application};
use super::{CreatedResponse, DeletedResponse};

#[derive(Debug, Deserialize)]
pub struct ApplicantQuery {
    email: Option<String>,
}

#[utoipa::path(
    post,
    path = "/job-applications",
    request_body = Value,
    responses(
        (status = 201, description = "Application created.", body = CreatedResponse),
        (status = 400, description = "Missing `applicant_email` field.", body = String),
        (status = 401, description = "Missing or invalid session token."),
        (status = 403, description = "Session subject does not match `applicant_email`."),
    ),
    tag = "applications"
)]
/// Creates an application owned by the `applicant_email` declared in the
/// document. The session subject must match the declared owner.
pub async fn create_application(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let declared = payload
        .get("applicant_email")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Err(err) = require_subject(&headers, declared.as_deref(), &auth_state) {
        return err.into_response();
    }
    if declared.is_none() {
        return (StatusCode::BAD_REQUEST, "applicant_email is required.").into_response();
    }

    match insert_application(&pool, &payload).await {
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
    path = "/job-applications",
    params(("email" = String, Query, description = "Applicant email, must match the session subject")),
    responses(
        (status = 200, description = "The applicant's applications, newest first."),
        (status = 400, description = "Missing `email` query parameter.", body = String),
        (status = 401, description = "Missing or invalid session token."),
        (status = 403, description = "Filter does not match the session subject."),
    ),
    tag = "applications"
)]
/// Lists the caller's applications, newest first. Each entry carries the
/// title, company, and logo of the job it points at.
pub async fn list_applications(
    headers: HeaderMap,
    Query(query): Query<ApplicantQuery>,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let Some(email) = query.email.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            "email query parameter is required.",
        )
            .into_response();
    };
    if let Err(err) = require_subject(&headers, Some(email), &auth_state) {
        return err.into_response();
    }

    match fetch_applications_for(&pool, email).await {
        Ok(docs) => (StatusCode::OK, Json(docs)).into_response(),
        Err(err) => {
            error!("Failed to list applications: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/job-applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application deleted.", body = DeletedResponse),
        (status = 400, description = "Malformed id.", body = String),
        (status = 401, description = "Missing or invalid session token."),
        (status = 404, description = "No application with this id owned by the caller."),
    ),
    tag = "applications"
)]
/// Deletes an application owned by the caller. Unknown and foreign ids are
/// both `404`.
pub async fn delete_application(
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

    match remove_application(&pool, id, &subject).await {
        Ok(true) => (StatusCode::OK, Json(DeletedResponse { deleted: 1 })).into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => err.into_response(),
    }
}
