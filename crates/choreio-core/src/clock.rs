//! Source of "now" for progress computation.
//!
//! Admins can preview due states on another date without touching data.
//! The chosen instant is resolved once and passed down explicitly; nothing
//! below this module reads the wall clock.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{AccessError, ValidationError};
use crate::household::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    /// Debug date chosen by an admin.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Debug clock at `at`, allowed only for admin accounts.
    pub fn debug(at: DateTime<Utc>, user: &User) -> Result<Self, AccessError> {
        if !user.is_admin() {
            return Err(AccessError::NotAdmin);
        }
        Ok(Clock::Fixed(at))
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }

    pub fn previous_day(&self) -> Self {
        Clock::Fixed(self.now() - Duration::days(1))
    }

    pub fn next_day(&self) -> Self {
        Clock::Fixed(self.now() + Duration::days(1))
    }

    pub fn reset(&self) -> Self {
        Clock::System
    }
}

/// Parse a debug date: `YYYY-MM-DD` (taken at noon UTC) or RFC 3339.
pub fn parse_debug_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map(|noon| noon.and_utc())
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "date".into(),
            message: format!("expected YYYY-MM-DD or RFC 3339, got '{input}'"),
        })
}
