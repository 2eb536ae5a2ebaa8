use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use taskdesk_domain::checklist::{Bucket, ChecklistClassifier, ChecklistRepository, TaskRecord};
use taskdesk_domain::{DomainError, TaskId};

use crate::application::dtos::{BucketSummaryDto, ChecklistItemDto};

/// Records as last fetched, with the local time of the fetch.
#[derive(Debug, Clone)]
pub struct ChecklistSnapshot {
    pub records: Vec<TaskRecord>,
    pub fetched_at: NaiveDateTime,
}

/// Owns the fetch / classify / mark-done cycle for the checklist screen.
pub struct ChecklistService {
    repository: Arc<dyn ChecklistRepository>,
    in_flight: Mutex<HashSet<TaskId>>,
}

impl ChecklistService {
    pub fn new(repository: Arc<dyn ChecklistRepository>) -> Self {
        Self {
            repository,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub async fn load(&self) -> Result<ChecklistSnapshot, DomainError> {
        let records = self.repository.fetch_all().await?;
        let fetched_at = Local::now().naive_local();

        log::info!(
            "[checklist] snapshot loaded records={} at={}",
            records.len(),
            fetched_at
        );

        Ok(ChecklistSnapshot {
            records,
            fetched_at,
        })
    }

    pub fn view(
        &self,
        snapshot: &ChecklistSnapshot,
        bucket: Bucket,
        now: NaiveDateTime,
    ) -> Vec<ChecklistItemDto> {
        ChecklistClassifier::classify(&snapshot.records, bucket, now)
            .into_iter()
            .map(ChecklistItemDto::from)
            .collect()
    }

    /// [`ChecklistService::view`] against the local wall clock.
    pub fn view_now(&self, snapshot: &ChecklistSnapshot, bucket: Bucket) -> Vec<ChecklistItemDto> {
        ChecklistClassifier::classify_now(&snapshot.records, bucket)
            .into_iter()
            .map(ChecklistItemDto::from)
            .collect()
    }

    pub fn summary(&self, snapshot: &ChecklistSnapshot, now: NaiveDateTime) -> BucketSummaryDto {
        BucketSummaryDto::new(ChecklistClassifier::summarize(&snapshot.records, now), now)
    }

    /// Mark a task done, then re-fetch.
    ///
    /// A second request for a task whose mutation has not yet completed is
    /// rejected with `Validation`.
    pub async fn mark_done(&self, id: &TaskId) -> Result<ChecklistSnapshot, DomainError> {
        let _marker = InFlight::acquire(&self.in_flight, id)?;

        log::info!("[checklist] mark done requested task_id={}", id);
        if let Err(e) = self.repository.mark_done(id).await {
            log::warn!("[checklist] mark done failed task_id={}: {}", id, e);
            return Err(e);
        }

        self.load().await
    }

    pub fn is_in_flight(&self, id: &TaskId) -> bool {
        lock(&self.in_flight).contains(id)
    }
}

fn lock(set: &Mutex<HashSet<TaskId>>) -> std::sync::MutexGuard<'_, HashSet<TaskId>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Released on drop, so the marker clears on success, failure and cancellation.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<TaskId>>,
    id: TaskId,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<TaskId>>, id: &TaskId) -> Result<Self, DomainError> {
        if !lock(set).insert(id.clone()) {
            return Err(DomainError::Validation(format!(
                "Task {} is already being marked done",
                id
            )));
        }

        Ok(Self {
            set,
            id: id.clone(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tokio::sync::Notify;

    // Mock repository for testing

    struct MockChecklistRepository {
        records: tokio::sync::RwLock<Vec<TaskRecord>>,
        fetch_count: tokio::sync::RwLock<usize>,
        fail_ids: HashMap<String, DomainError>,
        gate: Option<Arc<Notify>>,
    }

    impl MockChecklistRepository {
        fn new(records: Vec<TaskRecord>) -> Self {
            Self {
                records: tokio::sync::RwLock::new(records),
                fetch_count: tokio::sync::RwLock::new(0),
                fail_ids: HashMap::new(),
                gate: None,
            }
        }

        fn failing_on(mut self, id: &str, error: DomainError) -> Self {
            self.fail_ids.insert(id.to_string(), error);
            self
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        async fn fetch_count(&self) -> usize {
            *self.fetch_count.read().await
        }
    }

    #[async_trait::async_trait]
    impl ChecklistRepository for MockChecklistRepository {
        async fn fetch_all(&self) -> Result<Vec<TaskRecord>, DomainError> {
            *self.fetch_count.write().await += 1;
            Ok(self.records.read().await.clone())
        }

        async fn mark_done(&self, id: &TaskId) -> Result<(), DomainError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(err) = self.fail_ids.get(id.as_str()) {
                return Err(err.clone());
            }

            let mut records = self.records.write().await;
            match records.iter_mut().find(|r| r.id() == id) {
                Some(record) => {
                    *record = record.clone().with_actual("2024-03-14");
                    Ok(())
                }
                None => Err(DomainError::NotFound(format!("Checklist task {}", id))),
            }
        }
    }

    fn thursday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn sample_records() -> Vec<TaskRecord> {
        vec![
            TaskRecord::new(TaskId::from_string("1"), "Yesterday's log", "D", "13/03/2024"),
            TaskRecord::new(TaskId::from_string("2"), "Today's log", "D", "14/03/2024"),
            TaskRecord::new(TaskId::from_string("3"), "Last week's report", "W", "04/03/2024"),
            TaskRecord::new(TaskId::from_string("4"), "This week's report", "W", "11/03/2024"),
            TaskRecord::new(TaskId::from_string("5"), "Filed already", "D", "12/03/2024")
                .with_actual("12/03/2024"),
        ]
    }

    fn ids(items: &[ChecklistItemDto]) -> Vec<&str> {
        items.iter().map(|i| i.task_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_and_view_buckets() {
        let repo = Arc::new(MockChecklistRepository::new(sample_records()));
        let service = ChecklistService::new(repo.clone());

        let snapshot = service.load().await.unwrap();
        assert_eq!(snapshot.records.len(), 5);
        assert_eq!(repo.fetch_count().await, 1);

        let now = thursday();
        assert_eq!(ids(&service.view(&snapshot, Bucket::Pending, now)), vec!["1", "3"]);
        assert_eq!(ids(&service.view(&snapshot, Bucket::Daily, now)), vec!["2"]);
        assert_eq!(ids(&service.view(&snapshot, Bucket::Weekly, now)), vec!["4"]);
        assert!(service.view(&snapshot, Bucket::Monthly, now).is_empty());
    }

    #[tokio::test]
    async fn test_view_now_matches_view_at_local_time() {
        let today = Local::now().date_naive();
        let records = vec![
            TaskRecord::new(
                TaskId::from_string("old"),
                "Long overdue",
                "D",
                "01/01/2000",
            ),
            TaskRecord::new(
                TaskId::from_string("today"),
                "Due today",
                "D",
                today.format("%d/%m/%Y").to_string(),
            ),
        ];
        let service = ChecklistService::new(Arc::new(MockChecklistRepository::new(records)));
        let snapshot = service.load().await.unwrap();

        assert_eq!(ids(&service.view_now(&snapshot, Bucket::Pending)), vec!["old"]);
        assert_eq!(ids(&service.view_now(&snapshot, Bucket::Daily)), vec!["today"]);
    }

    #[tokio::test]
    async fn test_summary_matches_views() {
        let service = ChecklistService::new(Arc::new(MockChecklistRepository::new(sample_records())));
        let snapshot = service.load().await.unwrap();
        let now = thursday();

        let summary = service.summary(&snapshot, now);

        assert_eq!(summary.pending, 2);
        assert_eq!(summary.daily, 1);
        assert_eq!(summary.weekly, 1);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.as_of, "2024-03-14T10:00:00");
    }

    #[tokio::test]
    async fn test_mark_done_refetches_and_moves_task_out() {
        let repo = Arc::new(MockChecklistRepository::new(sample_records()));
        let service = ChecklistService::new(repo.clone());

        let refreshed = service.mark_done(&TaskId::from_string("1")).await.unwrap();

        assert_eq!(repo.fetch_count().await, 1);
        assert_eq!(
            ids(&service.view(&refreshed, Bucket::Pending, thursday())),
            vec!["3"]
        );
        assert!(!service.is_in_flight(&TaskId::from_string("1")));
    }

    #[tokio::test]
    async fn test_mark_done_failure_releases_marker() {
        let repo = MockChecklistRepository::new(sample_records())
            .failing_on("3", DomainError::Infrastructure("connection reset".to_string()));
        let repo = Arc::new(repo);
        let service = ChecklistService::new(repo.clone());
        let id = TaskId::from_string("3");

        let err = service.mark_done(&id).await.unwrap_err();
        assert!(matches!(err, DomainError::Infrastructure(_)));
        assert!(!service.is_in_flight(&id));
        // No reload after a failed mutation
        assert_eq!(repo.fetch_count().await, 0);
    }

    #[tokio::test]
    async fn test_mark_done_unknown_task_is_not_found() {
        let service = ChecklistService::new(Arc::new(MockChecklistRepository::new(sample_records())));

        let result = service.mark_done(&TaskId::from_string("404")).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_mark_done_same_task_is_rejected() {
        let gate = Arc::new(Notify::new());
        let repo = Arc::new(MockChecklistRepository::new(sample_records()).gated(gate.clone()));
        let service = Arc::new(ChecklistService::new(repo));
        let id = TaskId::from_string("1");

        let first = {
            let service = service.clone();
            let id = id.clone();
            tokio::spawn(async move { service.mark_done(&id).await })
        };

        while !service.is_in_flight(&id) {
            tokio::task::yield_now().await;
        }

        let second = service.mark_done(&id).await;
        assert!(matches!(second, Err(DomainError::Validation(_))));

        gate.notify_one();
        let first = first.await.unwrap();
        assert!(first.is_ok());
        assert!(!service.is_in_flight(&id));
    }
}
