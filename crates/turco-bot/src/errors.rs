//! Discord API error classification.
//!
//! Turns serenity errors into an `ErrorOutcome` so callers can log them at
//! the right level: rate limits and transient failures are warnings,
//! permanent rejections are errors.

use serenity::http::HttpError;
use tracing::{error, warn};

/// How a failed Discord call should be treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// HTTP 429; the next scheduled attempt may succeed.
    RateLimited,
    /// The request itself was rejected (4xx); repeating it will not help.
    Permanent(String),
    /// Network trouble or a Discord-side failure.
    Transient(String),
}

pub fn classify(err: &serenity::Error) -> ErrorOutcome {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => outcome_for_status(
            resp.status_code.as_u16(),
            resp.error.code as i64,
            &resp.error.message,
        ),
        _ => ErrorOutcome::Transient(err.to_string()),
    }
}

/// Log a serenity error for the given operation at the appropriate level.
pub fn log_error(context: &str, err: &serenity::Error) {
    match classify(err) {
        ErrorOutcome::RateLimited => warn!("{}: rate limited by Discord", context),
        ErrorOutcome::Permanent(msg) => error!("{}: {}", context, msg),
        ErrorOutcome::Transient(msg) => warn!("{}: {}", context, msg),
    }
}

fn outcome_for_status(status: u16, discord_code: i64, message: &str) -> ErrorOutcome {
    let described = format!("HTTP {} / code {}: {}", status, discord_code, message);
    match status {
        429 => ErrorOutcome::RateLimited,
        400..=499 => ErrorOutcome::Permanent(described),
        _ => ErrorOutcome::Transient(described),
    }
}
