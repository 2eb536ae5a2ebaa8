mod auth;
mod checklist;
mod types;

pub use types::{ApiError, RetryConfig, Session, UserProfile};

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::ApiConfig;
use types::{truncate_body, USER_AGENT};

/// Thin reqwest wrapper for the portal REST API.
pub struct HttpClient {
    pub(super) client: Client,
    pub(super) config: ApiConfig,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeouts.http_request)
            .connect_timeout(config.timeouts.connect)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Execute a request with retry logic
    ///
    /// Retries on:
    /// - Network errors (connection failures, timeouts)
    /// - 5xx server errors
    /// - 429 Too Many Requests
    ///
    /// Does NOT retry on:
    /// - 4xx client errors (except 429)
    /// - Successful responses (2xx, 3xx)
    pub(super) async fn execute_with_retry<F, Fut, T>(
        &self,
        operation_name: &str,
        mut request_fn: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let mut attempt = 0;
        let mut backoff_ms = retry.initial_backoff_ms;

        loop {
            attempt += 1;

            match request_fn().await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("{} succeeded after {} attempts", operation_name, attempt);
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let should_retry = attempt <= retry.max_retries && Self::is_retryable_error(&e);

                    if !should_retry {
                        if attempt > 1 {
                            warn!("{} failed after {} attempts", operation_name, attempt);
                        }
                        return Err(e);
                    }

                    warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        operation_name,
                        attempt,
                        retry.max_retries + 1,
                        e,
                        backoff_ms
                    );

                    sleep(Duration::from_millis(backoff_ms)).await;

                    // Exponential backoff with cap
                    backoff_ms = ((backoff_ms as f64 * retry.backoff_multiplier) as u64)
                        .min(retry.max_backoff_ms);
                }
            }
        }
    }

    /// Check if an error is retryable
    fn is_retryable_error(error: &anyhow::Error) -> bool {
        if let Some(api_err) = error.downcast_ref::<ApiError>() {
            let status = api_err.status();
            return status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
        }

        if let Some(reqwest_err) = error.downcast_ref::<reqwest::Error>() {
            return reqwest_err.is_connect() || reqwest_err.is_timeout() || reqwest_err.is_request();
        }

        false
    }

    /// Turn a non-2xx response into an [`ApiError`].
    pub(super) async fn ensure_success(response: Response, operation_name: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        let body = truncate_body(&body).to_string();

        warn!("{} returned {}: {}", operation_name, status, body);

        let err = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Unauthorized { status, body }
        } else {
            ApiError::Status { status, body }
        };
        Err(err.into())
    }
}
