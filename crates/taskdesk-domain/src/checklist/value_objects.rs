use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// Recurrence cadence of a checklist task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// Resolve a wire code (`D`, `W`, `M`, `Y`) or long name.
    ///
    /// Returns `None` for anything else; such tasks never match a bucket.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "d" | "daily" => Some(Frequency::Daily),
            "w" | "weekly" => Some(Frequency::Weekly),
            "m" | "monthly" => Some(Frequency::Monthly),
            "y" | "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
            Frequency::Monthly => "M",
            Frequency::Yearly => "Y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

/// Named classification view requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    #[default]
    Pending,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Pending,
        Bucket::Daily,
        Bucket::Weekly,
        Bucket::Monthly,
        Bucket::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Pending => "pending",
            Bucket::Daily => "daily",
            Bucket::Weekly => "weekly",
            Bucket::Monthly => "monthly",
            Bucket::Yearly => "yearly",
        }
    }

    /// Tab title
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Pending => "Pending",
            Bucket::Daily => "Daily",
            Bucket::Weekly => "Weekly",
            Bucket::Monthly => "Monthly",
            Bucket::Yearly => "Yearly",
        }
    }

    /// The frequency a frequency-specific bucket filters on.
    /// `Pending` spans all frequencies.
    pub fn frequency(&self) -> Option<Frequency> {
        match self {
            Bucket::Pending => None,
            Bucket::Daily => Some(Frequency::Daily),
            Bucket::Weekly => Some(Frequency::Weekly),
            Bucket::Monthly => Some(Frequency::Monthly),
            Bucket::Yearly => Some(Frequency::Yearly),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "Unknown bucket '{}', expected one of: pending, daily, weekly, monthly, yearly",
                    s
                ))
            })
    }
}
