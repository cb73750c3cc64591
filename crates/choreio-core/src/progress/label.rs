//! Human-readable "due in ..." labels.

use super::frequency::{DAYS_PER_MONTH, DAYS_PER_WEEK};

/// Remaining days below which the label counts in days.
const WEEK_LABEL_FROM_DAYS: i64 = 14;
/// Remaining days from which the label counts in months.
const MONTH_LABEL_FROM_DAYS: i64 = 60;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Label for a chore with `days_remaining` days left in its cycle.
pub fn due_label(days_remaining: i64, never_completed: bool) -> String {
    if never_completed {
        return "never done".to_string();
    }
    match days_remaining {
        d if d < 0 => format!("overdue by {}", plural(-d, "day")),
        0 => "due today".to_string(),
        d if d < WEEK_LABEL_FROM_DAYS => format!("due in {}", plural(d, "day")),
        d if d < MONTH_LABEL_FROM_DAYS => {
            format!("due in {}", plural(d / i64::from(DAYS_PER_WEEK), "week"))
        }
        d => format!("due in {}", plural(d / i64::from(DAYS_PER_MONTH), "month")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_pick_a_readable_unit() {
        assert_eq!(due_label(1, false), "due in 1 day");
        assert_eq!(due_label(13, false), "due in 13 days");
        assert_eq!(due_label(14, false), "due in 2 weeks");
        assert_eq!(due_label(50, false), "due in 7 weeks");
        assert_eq!(due_label(60, false), "due in 2 months");
        assert_eq!(due_label(89, false), "due in 2 months");
    }

    #[test]
    fn today_and_overdue() {
        assert_eq!(due_label(0, false), "due today");
        assert_eq!(due_label(-1, false), "overdue by 1 day");
        assert_eq!(due_label(-9, false), "overdue by 9 days");
    }

    #[test]
    fn never_done_wins() {
        assert_eq!(due_label(-992, true), "never done");
    }
}
