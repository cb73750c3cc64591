//! Whole days elapsed since a chore was last completed.

use chrono::{DateTime, Utc};

/// Sentinel elapsed-day count for a chore that has never been completed.
pub const NEVER_COMPLETED_DAYS: i64 = 999;

const SECONDS_PER_DAY: i64 = 86_400;

/// Days between `last_completed_at` and `now`, floored.
///
/// Returns the raw signed value: a completion recorded after `now` (for
/// example while previewing an earlier debug date) yields a negative count.
/// Callers clamp once with [`clamp_elapsed`].
pub fn days_since(last_completed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match last_completed_at {
        None => NEVER_COMPLETED_DAYS,
        Some(last) => (now - last).num_seconds().div_euclid(SECONDS_PER_DAY),
    }
}

/// Clamp a raw elapsed-day count to the non-negative range.
pub fn clamp_elapsed(raw: i64) -> u32 {
    raw.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn never_completed_is_sentinel() {
        assert_eq!(days_since(None, at(1, 0)), NEVER_COMPLETED_DAYS);
    }

    #[test]
    fn same_instant_is_zero() {
        let now = at(10, 12);
        assert_eq!(days_since(Some(now), now), 0);
    }

    #[test]
    fn partial_days_floor() {
        assert_eq!(days_since(Some(at(1, 12)), at(3, 11)), 1);
        assert_eq!(days_since(Some(at(1, 12)), at(3, 12)), 2);
    }

    #[test]
    fn future_completion_is_negative_and_floors_down() {
        let now = at(5, 0);
        assert_eq!(days_since(Some(now + Duration::hours(1)), now), -1);
        assert_eq!(clamp_elapsed(days_since(Some(now + Duration::days(3)), now)), 0);
    }
}
