//! API handlers and shared utilities for Careercode.
//!
//! This module organizes the service's route handlers and provides the
//! validation helpers and response envelopes they share.

pub mod applications;
pub mod auth;
pub mod health;
pub mod job_posts;
pub mod jobs;
pub mod root;
mod store;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lightweight email sanity check used before issuing tokens.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Body returned by create endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

/// Body returned by delete endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// Body returned by update endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModifiedResponse {
    pub modified: u64,
}

#[cfg(test)]
mod tests;
