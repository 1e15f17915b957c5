//! # Careercode (Job Board API)
//!
//! `careercode` is the HTTP backend for a job board. It serves public job
//! listings and lets signed-in users manage the documents they own: HR users
//! manage job posts, applicants manage job applications.
//!
//! ## Sessions
//!
//! Signing in issues a signed, time-bounded token carrying the user's email
//! and stores it in an `HttpOnly` cookie. Requests that read or write
//! owner-scoped data present that cookie; handlers verify the token offline
//! (no session table) and compare its subject against the owner email the
//! request declares.
//!
//! ## Ownership
//!
//! - **Job posts** belong to the `hr_email` stored in the document.
//! - **Job applications** belong to the `applicant_email` stored in the document.
//! - Writes against documents owned by someone else return `404 Not Found`
//!   rather than `403 Forbidden` to prevent probing for foreign ids.
//!
//! Documents are schemaless JSONB with application-generated UUIDv7 ids, so
//! id order is creation order.

pub mod api;
pub mod cli;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
