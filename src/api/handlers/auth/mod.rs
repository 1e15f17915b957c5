//! Auth handlers and supporting modules.
//!
//! This module coordinates session issuance and request authorization.
//!
//! ## Sessions
//!
//! Signing in exchanges an email for a signed, time-bounded token set as an
//! `HttpOnly` cookie. Tokens are verified offline on every request; there is
//! no session table, so logout only clears the cookie.
//!
//! ## Ownership checks
//!
//! Handlers that act on owned documents resolve the token's subject through
//! [`guard::require_subject`], passing the owner email the request declares
//! (body field or query parameter). A mismatch is `403`, a missing or invalid
//! token is `401`.

pub(crate) mod guard;
pub(crate) mod session;
mod state;

pub use state::{AuthConfig, AuthState};
