use axum::response::IntoResponse;

// axum handler for the index route
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " is running")
}
