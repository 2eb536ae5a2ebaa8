use std::sync::Arc;

use taskdesk_domain::DomainError;
use taskdesk_infrastructure::http::{ApiError, HttpClient, Session};

use super::ConfigService;
use crate::application::ResultExt;

/// Sign-in and sign-out against the portal, persisting the session locally.
pub struct AuthService {
    client: Arc<HttpClient>,
    config: Arc<ConfigService>,
}

impl AuthService {
    pub fn new(client: Arc<HttpClient>, config: Arc<ConfigService>) -> Self {
        Self { client, config }
    }

    pub async fn login(&self, employee_id: &str, password: &str) -> Result<Session, DomainError> {
        if employee_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("Employee ID is required".to_string()));
        }
        if password.is_empty() {
            return Err(DomainError::InvalidInput("Password is required".to_string()));
        }

        let session = self
            .client
            .login(employee_id.trim(), password)
            .await
            .map_err(login_error)?;

        self.config
            .save_session(&session)
            .to_infra_err_with("Failed to store session")?;

        log::info!("[auth] signed in employee_id={}", employee_id.trim());
        Ok(session)
    }

    /// Forget the stored token. Returns whether one was present.
    pub fn logout(&self) -> Result<bool, DomainError> {
        self.config.clear_session().to_infra_err()
    }
}

fn login_error(error: anyhow::Error) -> DomainError {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized { .. }) => {
            DomainError::InvalidCredentials("Employee ID or password is incorrect".to_string())
        }
        _ => DomainError::Infrastructure(format!("{:#}", error)),
    }
}
