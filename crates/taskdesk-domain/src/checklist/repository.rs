use async_trait::async_trait;

use super::TaskRecord;
use crate::shared::{DomainError, TaskId};

#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Fetch the current checklist snapshot for the signed-in user.
    async fn fetch_all(&self) -> Result<Vec<TaskRecord>, DomainError>;

    /// Mark a checklist task as done.
    ///
    /// The backend stamps `Actual`; callers re-fetch to observe it.
    async fn mark_done(&self, id: &TaskId) -> Result<(), DomainError>;
}
