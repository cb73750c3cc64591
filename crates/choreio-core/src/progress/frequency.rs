//! Chore frequency and its normalization to days.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Days per week.
pub const DAYS_PER_WEEK: u32 = 7;

/// Fixed month length; calendar months are not modelled.
pub const DAYS_PER_MONTH: u32 = 30;

/// Unit of a chore's repeat interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Days,
    Weeks,
    Months,
}

impl FrequencyUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyUnit::Days => "days",
            FrequencyUnit::Weeks => "weeks",
            FrequencyUnit::Months => "months",
        }
    }

    /// Number of days one unit spans.
    pub fn days(self) -> u32 {
        match self {
            FrequencyUnit::Days => 1,
            FrequencyUnit::Weeks => DAYS_PER_WEEK,
            FrequencyUnit::Months => DAYS_PER_MONTH,
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(FrequencyUnit::Days),
            "week" | "weeks" => Ok(FrequencyUnit::Weeks),
            "month" | "months" => Ok(FrequencyUnit::Months),
            other => Err(ValidationError::InvalidValue {
                field: "frequency_unit".into(),
                message: format!("expected days, weeks or months, got '{other}'"),
            }),
        }
    }
}

/// Normalize a frequency to a cycle length in days.
///
/// `frequency` must be at least 1; that is enforced by [`Frequency::new`]
/// before a chore is ever stored.
pub fn frequency_to_days(frequency: u32, unit: FrequencyUnit) -> u32 {
    frequency.saturating_mul(unit.days())
}

/// A validated repeat interval, e.g. "every 2 weeks".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    every: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    /// # Errors
    /// Returns an error if `every` is zero.
    pub fn new(every: u32, unit: FrequencyUnit) -> Result<Self, ValidationError> {
        if every == 0 {
            return Err(ValidationError::InvalidValue {
                field: "frequency".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(Self { every, unit })
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    pub fn total_days(&self) -> u32 {
        frequency_to_days(self.every, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_each_unit() {
        assert_eq!(frequency_to_days(5, FrequencyUnit::Days), 5);
        assert_eq!(frequency_to_days(1, FrequencyUnit::Weeks), 7);
        assert_eq!(frequency_to_days(2, FrequencyUnit::Months), 60);
    }

    #[test]
    fn unit_parses_singular_and_plural() {
        assert_eq!("week".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::Weeks);
        assert_eq!("Months".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::Months);
        assert!("year".parse::<FrequencyUnit>().is_err());
    }

    #[test]
    fn unit_serializes_lowercase_plural() {
        let json = serde_json::to_string(&FrequencyUnit::Weeks).unwrap();
        assert_eq!(json, "\"weeks\"");
    }

    #[test]
    fn zero_frequency_is_rejected() {
        assert!(Frequency::new(0, FrequencyUnit::Days).is_err());
        let f = Frequency::new(3, FrequencyUnit::Weeks).unwrap();
        assert_eq!(f.total_days(), 21);
    }
}
