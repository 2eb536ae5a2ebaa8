use anyhow::{Context, Result};
use reqwest::{header, StatusCode};

use super::types::{ApiError, LoginRequest, Session};

impl super::HttpClient {
    /// Exchange employee credentials for a bearer token.
    ///
    /// Not retried: a rejected password must surface immediately, and a
    /// 400 from this endpoint means bad credentials rather than a bad
    /// request shape.
    pub async fn login(&self, employee_id: &str, password: &str) -> Result<Session> {
        let url = self.config.endpoint("auth/login")?;
        log::info!("[auth] login employee_id={}", employee_id);

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest {
                employee_id,
                password,
            })
            .send()
            .await
            .context("Failed to send login request")?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized {
                status: StatusCode::BAD_REQUEST,
                body,
            }
            .into());
        }

        let response = Self::ensure_success(response, "Login").await?;
        let session: Session = response
            .json()
            .await
            .context("Failed to parse login response")?;

        if session.token.trim().is_empty() {
            anyhow::bail!("Login response did not contain a token");
        }

        log::info!(
            "[auth] login succeeded employee_id={} name={:?}",
            employee_id,
            session.user.name
        );

        Ok(session)
    }
}
