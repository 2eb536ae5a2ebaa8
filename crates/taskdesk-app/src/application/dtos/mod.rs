mod checklist_dto;

pub use checklist_dto::{BucketSummaryDto, ChecklistItemDto};
