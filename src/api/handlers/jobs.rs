//! Public job listing handlers.

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::error;

use super::store::{fetch_job, fetch_jobs, parse_id};

#[utoipa::path(
    get,
    path = "/jobs",
    responses(
        (status = 200, description = "All jobs, newest first."),
    ),
    tag = "jobs"
)]
/// Lists every job, newest first. Listings are public, so no authentication.
pub async fn list_jobs(pool: Extension<PgPool>) -> impl IntoResponse {
    match fetch_jobs(&pool).await {
        Ok(docs) => (StatusCode::OK, Json(docs)).into_response(),
        Err(err) => {
            error!("Failed to list jobs: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job detail."),
        (status = 400, description = "Malformed id.", body = String),
        (status = 404, description = "Job not found."),
    ),
    tag = "jobs"
)]
/// Fetches a single job by id. Malformed ids are `400`, unknown ids `404`.
pub async fn get_job(Path(id): Path<String>, pool: Extension<PgPool>) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match fetch_job(&pool, id).await {
        Ok(Some(doc)) => (StatusCode::OK, Json(doc)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to get job: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
