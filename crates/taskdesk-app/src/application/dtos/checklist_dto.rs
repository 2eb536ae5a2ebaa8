use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use taskdesk_domain::checklist::{BucketSummary, TaskRecord};

/// One checklist card as the renderer shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItemDto {
    pub task_id: String,
    pub description: String,
    pub frequency_code: String,
    pub frequency_label: Option<String>,
    pub planned: Option<String>,
    pub planned_date: Option<String>, // YYYY-MM-DD, when the planned value parses
    pub actual: Option<String>,
    pub is_done: bool,
}

impl From<&TaskRecord> for ChecklistItemDto {
    fn from(record: &TaskRecord) -> Self {
        Self {
            task_id: record.id().as_str().to_string(),
            description: record.description().to_string(),
            frequency_code: record.frequency_code().to_string(),
            frequency_label: record.frequency().map(|f| f.label().to_string()),
            planned: record.planned().map(str::to_string),
            planned_date: record
                .planned_date()
                .map(|d| d.date().format("%Y-%m-%d").to_string()),
            actual: record.actual().map(str::to_string),
            is_done: record.is_done(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummaryDto {
    pub pending: usize,
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub yearly: usize,
    pub done: usize,
    pub unclassifiable: usize,
    pub total: usize,
    pub as_of: String, // ISO 8601 local datetime
}

impl BucketSummaryDto {
    pub fn new(summary: BucketSummary, as_of: NaiveDateTime) -> Self {
        Self {
            pending: summary.pending,
            daily: summary.daily,
            weekly: summary.weekly,
            monthly: summary.monthly,
            yearly: summary.yearly,
            done: summary.done,
            unclassifiable: summary.unclassifiable,
            total: summary.total,
            as_of: as_of.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdesk_domain::TaskId;

    #[test]
    fn test_item_from_record() {
        let record = TaskRecord::new(
            TaskId::from_string("7"),
            "Back up the shared drive",
            "W",
            "11/03/2024 09:30",
        );

        let dto = ChecklistItemDto::from(&record);

        assert_eq!(dto.task_id, "7");
        assert_eq!(dto.frequency_label.as_deref(), Some("Weekly"));
        assert_eq!(dto.planned.as_deref(), Some("11/03/2024 09:30"));
        assert_eq!(dto.planned_date.as_deref(), Some("2024-03-11"));
        assert!(!dto.is_done);
    }

    #[test]
    fn test_item_keeps_unparseable_values_raw() {
        let record = TaskRecord::new(TaskId::from_string("8"), "Odd one", "Q", "soon")
            .with_actual("2024-03-12");

        let dto = ChecklistItemDto::from(&record);

        assert_eq!(dto.frequency_label, None);
        assert_eq!(dto.planned.as_deref(), Some("soon"));
        assert_eq!(dto.planned_date, None);
        assert!(dto.is_done);
    }
}
