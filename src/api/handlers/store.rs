//! Shared SQL storage for job board documents.
//!
//! Documents are schemaless JSONB rows keyed by application-generated UUIDv7
//! ids, so ordering by id is ordering by creation time. Owner-scoped writes
//! filter on the owner email stored inside the document and report zero
//! affected rows as "not found", which keeps foreign ids indistinguishable
//! from missing ones.

use axum::{http::StatusCode, response::IntoResponse};
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::error;
use uuid::Uuid;

#[derive(Debug)]
pub(super) enum StoreError {
    InvalidId,
    Database(sqlx::Error),
}

impl IntoResponse for StoreError {
    /// Maps storage-layer failures into stable HTTP responses for handlers.
    /// Database errors are logged server-side and surfaced as `500` without leaking details.
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::InvalidId => (StatusCode::BAD_REQUEST, "Invalid id.").into_response(),
            Self::Database(err) => {
                error!("Database error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Parse a path id, mapping malformed input to `InvalidId`.
pub(super) fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::InvalidId)
}

/// Graft the row id into the outgoing document.
fn with_id(mut doc: Value, id: Uuid) -> Value {
    if let Some(map) = doc.as_object_mut() {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    doc
}

/// Fetches all jobs, newest first.
pub(super) async fn fetch_jobs(pool: &PgPool) -> Result<Vec<Value>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, doc FROM jobs ORDER BY id DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| with_id(row.get("doc"), row.get("id")))
        .collect())
}

/// Fetches a single job by id.
pub(super) async fn fetch_job(pool: &PgPool, id: Uuid) -> Result<Option<Value>, sqlx::Error> {
    let row = sqlx::query("SELECT doc FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|row| with_id(row.get("doc"), id)))
}

/// Inserts a job post document and returns its new id.
pub(super) async fn insert_job_post(pool: &PgPool, doc: &Value) -> Result<Uuid, StoreError> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO job_post (id, doc) VALUES ($1, $2)")
        .bind(id)
        .bind(doc)
        .execute(pool)
        .await
        .map_err(StoreError::Database)?;
    Ok(id)
}

/// Fetches job posts, newest first, optionally scoped to an owner email.
pub(super) async fn fetch_job_posts(
    pool: &PgPool,
    owner: Option<&str>,
) -> Result<Vec<Value>, sqlx::Error> {
    let rows = match owner {
        Some(email) => {
            sqlx::query(
                "SELECT id, doc FROM job_post WHERE doc ->> 'hr_email' = $1 ORDER BY id DESC",
            )
            .bind(email)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query("SELECT id, doc FROM job_post ORDER BY id DESC")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows
        .into_iter()
        .map(|row| with_id(row.get("doc"), row.get("id")))
        .collect())
}

/// Fetches a single job post by id.
pub(super) async fn fetch_job_post(pool: &PgPool, id: Uuid) -> Result<Option<Value>, sqlx::Error> {
    let row = sqlx::query("SELECT doc FROM job_post WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|row| with_id(row.get("doc"), id)))
}

/// Shallow-merges `patch` into a job post owned by `owner`.
///
/// Returns `false` when no row matched, either because the id does not exist
/// or because the document belongs to someone else.
pub(super) async fn update_job_post(
    pool: &PgPool,
    id: Uuid,
    owner: &str,
    patch: &Value,
) -> Result<bool, StoreError> {
    let result =
        sqlx::query("UPDATE job_post SET doc = doc || $3 WHERE id = $1 AND doc ->> 'hr_email' = $2")
            .bind(id)
            .bind(owner)
            .bind(patch)
            .execute(pool)
            .await
            .map_err(StoreError::Database)?;
    Ok(result.rows_affected() > 0)
}

/// Deletes a job post owned by `owner`. Returns `false` when no row matched.
pub(super) async fn remove_job_post(
    pool: &PgPool,
    id: Uuid,
    owner: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM job_post WHERE id = $1 AND doc ->> 'hr_email' = $2")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(StoreError::Database)?;
    Ok(result.rows_affected() > 0)
}

/// Inserts a job application document and returns its new id.
pub(super) async fn insert_application(pool: &PgPool, doc: &Value) -> Result<Uuid, StoreError> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO job_applications (id, doc) VALUES ($1, $2)")
        .bind(id)
        .bind(doc)
        .execute(pool)
        .await
        .map_err(StoreError::Database)?;
    Ok(id)
}

/// Fetches an applicant's applications, newest first, each enriched with the
/// title, company, and logo of the job it points at.
///
/// Matching on `job_id` is textual so a malformed id degrades to "no job"
/// instead of a cast error.
pub(super) async fn fetch_applications_for(
    pool: &PgPool,
    applicant: &str,
) -> Result<Vec<Value>, sqlx::Error> {
    let query = r"
        SELECT a.id, a.doc, j.doc AS job_doc
        FROM job_applications a
        LEFT JOIN jobs j ON j.id::text = a.doc ->> 'job_id'
        WHERE a.doc ->> 'applicant_email' = $1
        ORDER BY a.id DESC
    ";
    let rows = sqlx::query(query).bind(applicant).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let job: Option<Value> = row.get("job_doc");
            let mut doc = with_id(row.get("doc"), row.get("id"));
            if let Some(job) = job {
                if let Some(map) = doc.as_object_mut() {
                    for field in ["title", "company", "company_logo"] {
                        if let Some(value) = job.get(field) {
                            map.insert(field.to_string(), value.clone());
                        }
                    }
                }
            }
            doc
        })
        .collect())
}

/// Deletes an application owned by `applicant`. Returns `false` when no row matched.
pub(super) async fn remove_application(
    pool: &PgPool,
    id: Uuid,
    applicant: &str,
) -> Result<bool, StoreError> {
    let result =
        sqlx::query("DELETE FROM job_applications WHERE id = $1 AND doc ->> 'applicant_email' = $2")
            .bind(id)
            .bind(applicant)
            .execute(pool)
            .await
            .map_err(StoreError::Database)?;
    Ok(result.rows_affected() > 0)
}
