use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::dates::parse_flexible_date;
use super::value_objects::Frequency;
use crate::shared::TaskId;

/// A checklist task as returned by `GET /checklist/`.
///
/// Records are snapshots owned by the backend; the classifier only reads
/// them. Date fields stay in their raw wire form so that malformed values
/// survive deserialization and can be excluded at classification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "TaskID")]
    id: TaskId,
    #[serde(rename = "Task", default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(rename = "Freq", default, deserialize_with = "null_as_default")]
    frequency_code: String,
    #[serde(rename = "Planned", default)]
    planned: Option<String>,
    #[serde(rename = "Actual", default)]
    actual: Option<String>,
}

impl TaskRecord {
    pub fn new(
        id: TaskId,
        description: impl Into<String>,
        frequency_code: impl Into<String>,
        planned: impl Into<String>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            frequency_code: frequency_code.into(),
            planned: Some(planned.into()),
            actual: None,
        }
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw `Freq` value as sent by the backend.
    pub fn frequency_code(&self) -> &str {
        &self.frequency_code
    }

    /// `None` when the code is not one of the four known cadences.
    pub fn frequency(&self) -> Option<Frequency> {
        Frequency::from_code(&self.frequency_code)
    }

    pub fn planned(&self) -> Option<&str> {
        self.planned.as_deref()
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    pub fn planned_date(&self) -> Option<NaiveDateTime> {
        self.planned.as_deref().and_then(parse_flexible_date)
    }

    pub fn actual_date(&self) -> Option<NaiveDateTime> {
        self.actual.as_deref().and_then(parse_flexible_date)
    }

    /// Done iff `Actual` parses to a date.
    pub fn is_done(&self) -> bool {
        self.actual_date().is_some()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
