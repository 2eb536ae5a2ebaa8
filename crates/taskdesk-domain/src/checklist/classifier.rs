use chrono::{Datelike, Local, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

use super::dates::{normalize_to_day_start, week_range, WeekRange};
use super::record::TaskRecord;
use super::value_objects::{Bucket, Frequency};

/// Recurrence classifier for checklist tasks.
///
/// Stateless: every call is a pure function of the task snapshot, the
/// requested bucket and the reference instant. Records whose planned date
/// cannot be parsed are left out of every bucket.
pub struct ChecklistClassifier;

/// Per-bucket counts over one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub pending: usize,
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub yearly: usize,
    /// Classifiable records with a parseable `Actual`.
    pub done: usize,
    /// Records without a parseable planned date.
    pub unclassifiable: usize,
    pub total: usize,
}

impl BucketSummary {
    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Pending => self.pending,
            Bucket::Daily => self.daily,
            Bucket::Weekly => self.weekly,
            Bucket::Monthly => self.monthly,
            Bucket::Yearly => self.yearly,
        }
    }

    fn increment(&mut self, bucket: Bucket) {
        let slot = match bucket {
            Bucket::Pending => &mut self.pending,
            Bucket::Daily => &mut self.daily,
            Bucket::Weekly => &mut self.weekly,
            Bucket::Monthly => &mut self.monthly,
            Bucket::Yearly => &mut self.yearly,
        };
        *slot += 1;
    }
}

/// Reference point shared by every record in one classification pass.
struct Reference {
    today: NaiveDateTime,
    current_week: WeekRange,
}

impl Reference {
    fn at(now: NaiveDateTime) -> Self {
        let today = normalize_to_day_start(now);
        Self {
            today,
            current_week: week_range(today),
        }
    }
}

/// The three inputs the predicates look at, extracted once per record.
struct Facts {
    frequency: Option<Frequency>,
    planned_day: NaiveDateTime,
    is_done: bool,
}

impl Facts {
    fn of(task: &TaskRecord) -> Option<Self> {
        let Some(planned) = task.planned_date() else {
            debug!(
                "[checklist] skipping task_id={} unparseable planned date {:?}",
                task.id(),
                task.planned()
            );
            return None;
        };

        Some(Self {
            frequency: task.frequency(),
            planned_day: normalize_to_day_start(planned),
            is_done: task.is_done(),
        })
    }
}

impl ChecklistClassifier {
    /// Tasks matching `bucket` at `now`, in input order.
    pub fn classify(tasks: &[TaskRecord], bucket: Bucket, now: NaiveDateTime) -> Vec<&TaskRecord> {
        let reference = Reference::at(now);

        tasks
            .iter()
            .filter(|task| {
                Facts::of(task).is_some_and(|facts| Self::bucket_matches(&facts, bucket, &reference))
            })
            .collect()
    }

    /// `classify` against the local wall clock.
    pub fn classify_now(tasks: &[TaskRecord], bucket: Bucket) -> Vec<&TaskRecord> {
        Self::classify(tasks, bucket, Local::now().naive_local())
    }

    /// Whether a single task belongs to `bucket` at `now`.
    pub fn matches(task: &TaskRecord, bucket: Bucket, now: NaiveDateTime) -> bool {
        let reference = Reference::at(now);
        Facts::of(task).is_some_and(|facts| Self::bucket_matches(&facts, bucket, &reference))
    }

    /// Whether a task's recurrence period has fully elapsed.
    ///
    /// Both arguments are expected at day start. Weekly tasks are measured
    /// against the end of their own planned week, not the current one.
    pub fn is_overdue(frequency: Frequency, planned_day: NaiveDateTime, today: NaiveDateTime) -> bool {
        match frequency {
            Frequency::Daily => planned_day < today,
            Frequency::Weekly => week_range(planned_day).end < today,
            Frequency::Monthly => {
                (planned_day.year(), planned_day.month()) < (today.year(), today.month())
            }
            Frequency::Yearly => planned_day.year() < today.year(),
        }
    }

    /// Count every bucket in a single pass.
    ///
    /// `summary.count(b)` always equals `classify(tasks, b, now).len()`.
    pub fn summarize(tasks: &[TaskRecord], now: NaiveDateTime) -> BucketSummary {
        let reference = Reference::at(now);
        let mut summary = BucketSummary {
            total: tasks.len(),
            ..BucketSummary::default()
        };

        for task in tasks {
            let Some(facts) = Facts::of(task) else {
                summary.unclassifiable += 1;
                continue;
            };

            if facts.is_done {
                summary.done += 1;
                continue;
            }

            for bucket in Bucket::ALL {
                if Self::bucket_matches(&facts, bucket, &reference) {
                    summary.increment(bucket);
                }
            }
        }

        summary
    }

    fn bucket_matches(facts: &Facts, bucket: Bucket, reference: &Reference) -> bool {
        if facts.is_done {
            return false;
        }

        let Some(frequency) = facts.frequency else {
            return false;
        };

        let planned = facts.planned_day;
        let today = reference.today;

        match bucket {
            Bucket::Pending => Self::is_overdue(frequency, planned, today),
            Bucket::Daily => frequency == Frequency::Daily && planned == today,
            Bucket::Weekly => {
                frequency == Frequency::Weekly && reference.current_week.contains(planned)
            }
            Bucket::Monthly => {
                frequency == Frequency::Monthly
                    && planned.year() == today.year()
                    && planned.month() == today.month()
            }
            Bucket::Yearly => frequency == Frequency::Yearly && planned.year() == today.year(),
        }
    }
}
