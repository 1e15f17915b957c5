//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_ORIGINS, ARG_TOKEN_SECRET, ARG_TOKEN_TTL};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3000);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let token_secret = matches
        .get_one::<String>(ARG_TOKEN_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --token-secret")?;

    let token_ttl_seconds = matches
        .get_one::<i64>(ARG_TOKEN_TTL)
        .copied()
        .unwrap_or(3600);

    let origins: Vec<String> = matches
        .get_many::<String>(ARG_ORIGINS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret,
        token_ttl_seconds,
        origins,
    }))
}
