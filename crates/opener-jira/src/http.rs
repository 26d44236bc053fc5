//! Shared HTTP response helpers for the Jira client.
//!
//! Centralizes status-code checks (429 with `Retry-After`, non-success →
//! [`TrackerError::Api`] carrying Jira's own error text) so the client stays
//! focused on request construction.

use serde::Deserialize;

use crate::error::TrackerError;

/// Jira's error payload: `{"errorMessages": [...], "errors": {"field": "msg"}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: std::collections::BTreeMap<String, String>,
}

/// Check an HTTP response for error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`TrackerError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s).
/// - **Non-success status** → [`TrackerError::Api`] with the status code and
///   Jira's error text, or the raw body when it is not Jira's error shape.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TrackerError> {
    if resp.status() == 429 {
        return Err(TrackerError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(TrackerError::Api {
            status,
            message: error_message(&body),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

/// Flatten Jira's error body into one line; raw body otherwise.
fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<JiraErrorBody>(body) else {
        return body.trim().to_string();
    };
    let mut parts = parsed.error_messages;
    parts.extend(
        parsed
            .errors
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}")),
    );
    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join("; ")
    }
}
