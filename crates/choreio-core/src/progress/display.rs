//! Display-mode selection and segmented progress geometry.
//!
//! Short cycles are drawn one square per day. Long cycles collapse the bulk
//! of the cycle into a single bar and switch to per-day squares once the
//! chore enters its final week.

use serde::{Deserialize, Serialize};

/// Length of the final stretch of a cycle that is always drawn per day.
pub const FINAL_WEEK_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    /// One bar over the non-final part of the cycle.
    ProgressBar,
    /// One square per day of the cycle.
    DaySquares,
    /// Compressed bar followed by the final week as day squares.
    Hybrid,
}

/// Choose how a chore's progress is drawn.
///
/// The progress-bar branch compares strictly: a chore with exactly
/// `final_week_days` remaining is already drawn in hybrid form.
pub fn select_display_mode(
    days_remaining: i64,
    total_days: u32,
    final_week_days: u32,
) -> DisplayMode {
    if total_days <= final_week_days {
        DisplayMode::DaySquares
    } else if days_remaining > i64::from(final_week_days) {
        DisplayMode::ProgressBar
    } else {
        DisplayMode::Hybrid
    }
}

/// The collapsed part of a long cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSegment {
    /// Days covered by the bar (`total_days - final_week_days`).
    pub span_days: u32,
    /// Filled share of the bar, 0..=100.
    pub fill_percent: f64,
}

/// One per-day square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySquare {
    /// 1-based day of the cycle this square stands for.
    pub day: u32,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSegments {
    pub bar: Option<BarSegment>,
    pub squares: Vec<DaySquare>,
}

impl ProgressSegments {
    pub fn filled_squares(&self) -> usize {
        self.squares.iter().filter(|s| s.filled).count()
    }
}

fn bar(days_since: u32, span_days: u32) -> BarSegment {
    let fill = if span_days == 0 {
        1.0
    } else {
        (f64::from(days_since) / f64::from(span_days)).min(1.0)
    };
    BarSegment {
        span_days,
        fill_percent: fill * 100.0,
    }
}

fn squares(days_since: u32, offset: u32, count: u32) -> Vec<DaySquare> {
    (0..count)
        .map(|index| {
            let day = offset + index + 1;
            DaySquare {
                day,
                filled: days_since >= day,
            }
        })
        .collect()
}

/// Build the bar and square geometry for a given mode.
pub fn segments(
    mode: DisplayMode,
    days_since: u32,
    total_days: u32,
    final_week_days: u32,
) -> ProgressSegments {
    let span = total_days.saturating_sub(final_week_days);
    match mode {
        DisplayMode::DaySquares => ProgressSegments {
            bar: None,
            squares: squares(days_since, 0, total_days),
        },
        DisplayMode::ProgressBar => ProgressSegments {
            bar: Some(bar(days_since, span)),
            squares: Vec::new(),
        },
        DisplayMode::Hybrid => ProgressSegments {
            bar: Some(bar(days_since, span)),
            squares: squares(days_since, span, total_days.min(final_week_days)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_cycles_use_day_squares() {
        for remaining in [-5, 0, 3, 7, 100] {
            assert_eq!(select_display_mode(remaining, 7, FINAL_WEEK_DAYS), DisplayMode::DaySquares);
        }
        assert_eq!(select_display_mode(1, 1, FINAL_WEEK_DAYS), DisplayMode::DaySquares);
    }

    #[test]
    fn long_cycles_far_from_due_use_bar() {
        assert_eq!(select_display_mode(10, 30, FINAL_WEEK_DAYS), DisplayMode::ProgressBar);
        assert_eq!(select_display_mode(8, 8, FINAL_WEEK_DAYS), DisplayMode::ProgressBar);
    }

    #[test]
    fn final_week_boundary_is_strict() {
        assert_eq!(select_display_mode(7, 30, FINAL_WEEK_DAYS), DisplayMode::Hybrid);
        assert_eq!(select_display_mode(3, 30, FINAL_WEEK_DAYS), DisplayMode::Hybrid);
        assert_eq!(select_display_mode(-4, 30, FINAL_WEEK_DAYS), DisplayMode::Hybrid);
    }

    #[test]
    fn hybrid_squares_start_after_bar() {
        let segs = segments(DisplayMode::Hybrid, 25, 30, 7);
        let bar = segs.bar.unwrap();
        assert_eq!(bar.span_days, 23);
        assert_eq!(bar.fill_percent, 100.0);
        assert_eq!(segs.squares.len(), 7);
        assert_eq!(segs.squares[0].day, 24);
        assert_eq!(segs.filled_squares(), 2);
    }

    #[test]
    fn progress_bar_fill_is_relative_to_span() {
        let segs = segments(DisplayMode::ProgressBar, 10, 60, 7);
        let bar = segs.bar.unwrap();
        assert_eq!(bar.span_days, 53);
        assert!((bar.fill_percent - 1000.0 / 53.0).abs() < 1e-9);
        assert!(segs.squares.is_empty());
    }

    #[test]
    fn day_squares_fill_from_the_start() {
        let segs = segments(DisplayMode::DaySquares, 3, 5, 7);
        assert!(segs.bar.is_none());
        let filled: Vec<bool> = segs.squares.iter().map(|s| s.filled).collect();
        assert_eq!(filled, vec![true, true, true, false, false]);
    }
}
