//! Request and response logging for test execution.
//!
//! Request lines are logged at info level, headers at debug and bodies at
//! trace. Credential-bearing headers are always redacted and response bodies
//! are truncated to `APIPROBE_LOG_MAX_BODY` characters.

use crate::constants;
use crate::model::HttpMethod;
use tracing::{debug, info, trace};

const REDACTED: &str = "[REDACTED]";

/// Checks if a header name should be redacted
#[must_use]
pub fn should_redact_header(header_name: &str) -> bool {
    let lower = header_name.to_lowercase();
    matches!(
        lower.as_str(),
        "authorization"
            | "proxy-authorization"
            | "cookie"
            | "set-cookie"
            | "x-api-key"
            | "x-goog-api-key"
            | "x-access-token"
            | "x-auth-token"
            | "api-key"
            | "api_key"
            | "token"
            | "secret"
            | "password"
    )
}

/// Logs the request a test case is about to send
pub fn log_request(test_name: &str, method: HttpMethod, url: &str, body: Option<&str>) {
    info!(
        target: "apiprobe::executor",
        test = test_name,
        "→ {} {}",
        method,
        url
    );

    if let Some(body_content) = body {
        trace!(target: "apiprobe::executor", "Request body: {}", body_content);
    }
}

/// Logs a received response
pub fn log_response<'a>(
    status: u16,
    duration_ms: u64,
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
    body: &str,
    max_body_len: usize,
) {
    info!(
        target: "apiprobe::executor",
        "← {} ({}ms)",
        status,
        duration_ms
    );

    for (name, value) in headers {
        let display_value = if should_redact_header(name) {
            REDACTED
        } else {
            value
        };
        debug!(target: "apiprobe::executor", "  {}: {}", name, display_value);
    }

    if body.is_empty() {
        return;
    }
    match truncate_at_char_boundary(body, max_body_len) {
        Some(truncated) => trace!(
            target: "apiprobe::executor",
            "Response body: {} (truncated at {} chars)",
            truncated,
            max_body_len
        ),
        None => trace!(target: "apiprobe::executor", "Response body: {}", body),
    }
}

/// Returns the first `max_chars` characters if `text` is longer than that
fn truncate_at_char_boundary(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_chars)
        .map(|(idx, _)| &text[..idx])
}

/// Gets the maximum logged body length from `APIPROBE_LOG_MAX_BODY`
#[must_use]
pub fn get_max_body_len() -> usize {
    std::env::var(constants::ENV_APIPROBE_LOG_MAX_BODY)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(constants::DEFAULT_LOG_MAX_BODY)
}
