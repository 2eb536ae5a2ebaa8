mod classifier;
mod dates;
mod record;
mod repository;
mod value_objects;


pub use classifier::{BucketSummary, ChecklistClassifier};
pub use dates::{normalize_to_day_start, parse_flexible_date, week_range, WeekRange};
pub use record::TaskRecord;
pub use repository::ChecklistRepository;
pub use value_objects::{Bucket, Frequency};
