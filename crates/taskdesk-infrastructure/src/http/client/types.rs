use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use taskdesk_domain::EmployeeId;

pub const USER_AGENT: &str = concat!("taskdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds (default: 1000ms)
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (default: 10000ms)
    pub max_backoff_ms: u64,
    /// Backoff multiplier (default: 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no backoff
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Non-success responses from the portal API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request rejected with status {status}: {body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => *status,
        }
    }
}

/// Signed-in user as returned by `POST /auth/login`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "employeeID", default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    #[serde(rename = "employeeID")]
    pub employee_id: &'a str,
    pub password: &'a str,
}

/// Keep error bodies short enough for a log line.
pub(super) fn truncate_body(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(500)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}
