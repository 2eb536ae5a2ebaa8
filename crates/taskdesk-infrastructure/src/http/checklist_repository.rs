use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;

use taskdesk_domain::checklist::{ChecklistRepository, TaskRecord};
use taskdesk_domain::{DomainError, TaskId};

use super::{ApiError, HttpClient};

/// [`ChecklistRepository`] backed by the portal REST API.
pub struct ApiChecklistRepository {
    client: Arc<HttpClient>,
    token: String,
}

impl ApiChecklistRepository {
    pub fn new(client: Arc<HttpClient>, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

#[async_trait]
impl ChecklistRepository for ApiChecklistRepository {
    async fn fetch_all(&self) -> Result<Vec<TaskRecord>, DomainError> {
        self.client
            .fetch_checklists(&self.token)
            .await
            .map_err(to_domain_error)
    }

    async fn mark_done(&self, id: &TaskId) -> Result<(), DomainError> {
        self.client
            .mark_checklist_done(&self.token, id)
            .await
            .map_err(|e| match to_domain_error(e) {
                DomainError::NotFound(_) => DomainError::NotFound(format!("Checklist task {}", id)),
                other => other,
            })
    }
}

fn to_domain_error(error: anyhow::Error) -> DomainError {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized { .. }) => DomainError::Unauthorized(error.to_string()),
        Some(ApiError::Status { status, .. }) if *status == StatusCode::NOT_FOUND => {
            DomainError::NotFound(error.to_string())
        }
        _ if error.downcast_ref::<serde_json::Error>().is_some() => {
            DomainError::Deserialization(format!("{:#}", error))
        }
        _ => DomainError::Infrastructure(format!("{:#}", error)),
    }
}
