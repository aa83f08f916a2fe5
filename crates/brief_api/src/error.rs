use std::time::Duration;

use thiserror::Error;

/// How much of an error response body is kept in messages.
const EXCERPT_LEN: usize = 200;

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network-level failure: DNS, refused connection, aborted transfer.
    #[error("network error: {0}")]
    Transport(String),
    /// Non-2xx response, with a truncated body excerpt.
    #[error("HTTP {code}: {excerpt}")]
    Status { code: u16, excerpt: String },
    /// Markup arrived where JSON was expected. Almost always a wrong base
    /// URL or webhook path, not a transient fault.
    #[error("received markup instead of JSON; check the configured base URL and webhook path")]
    MarkupResponse,
    /// The body was non-empty but not valid JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
    /// The generation call exceeded its client-side deadline.
    #[error("generation timed out after {}s", .limit.as_secs())]
    Timeout { limit: Duration },
}

impl ApiError {
    /// Builds the non-2xx variant, truncating the body on a character
    /// boundary.
    pub(crate) fn status(code: u16, body: &str) -> Self {
        let excerpt = if body.chars().count() > EXCERPT_LEN {
            let mut cut: String = body.chars().take(EXCERPT_LEN).collect();
            cut.push_str("...");
            cut
        } else {
            body.to_string()
        };
        Self::Status { code, excerpt }
    }
}
