//! Per-chore progress snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::color::{due_state_for, progress_fraction, DueState};
use super::display::{segments, select_display_mode, DisplayMode, ProgressSegments, FINAL_WEEK_DAYS};
use super::elapsed::{clamp_elapsed, days_since};
use super::frequency::{frequency_to_days, FrequencyUnit};
use super::label::due_label;
use crate::household::Chore;

/// Display data for one chore at one instant.
///
/// Not persisted and not cached: build a fresh one whenever the current date
/// or the completion history changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoreProgress {
    pub total_days: u32,
    /// Whole days since the last completion, never negative.
    pub days_since_last_done: u32,
    /// Negative once the chore is overdue.
    pub days_remaining: i64,
    pub progress_fraction: f64,
    pub due_state: DueState,
    pub color: &'static str,
    pub display_mode: DisplayMode,
    pub never_completed: bool,
    pub final_week_days: u32,
}

impl ChoreProgress {
    pub fn compute(
        frequency: u32,
        unit: FrequencyUnit,
        last_completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::compute_with(frequency, unit, last_completed_at, now, FINAL_WEEK_DAYS)
    }

    /// Same as [`ChoreProgress::compute`] with a custom final-week length.
    pub fn compute_with(
        frequency: u32,
        unit: FrequencyUnit,
        last_completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        final_week_days: u32,
    ) -> Self {
        let total_days = frequency_to_days(frequency, unit);
        let never_completed = last_completed_at.is_none();
        let days_since_last_done = clamp_elapsed(days_since(last_completed_at, now));
        let elapsed = effective_elapsed(days_since_last_done, total_days, never_completed);
        let days_remaining = i64::from(total_days) - i64::from(elapsed);
        let progress_fraction = progress_fraction(elapsed, total_days);
        let due_state = due_state_for(progress_fraction);

        Self {
            total_days,
            days_since_last_done,
            days_remaining,
            progress_fraction,
            due_state,
            color: due_state.color(),
            display_mode: select_display_mode(days_remaining, total_days, final_week_days),
            never_completed,
            final_week_days,
        }
    }

    pub fn for_chore(
        chore: &Chore,
        last_completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        final_week_days: u32,
    ) -> Self {
        Self::compute_with(
            chore.frequency,
            chore.frequency_unit,
            last_completed_at,
            now,
            final_week_days,
        )
    }

    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0
    }

    pub fn segments(&self) -> ProgressSegments {
        segments(
            self.display_mode,
            effective_elapsed(self.days_since_last_done, self.total_days, self.never_completed),
            self.total_days,
            self.final_week_days,
        )
    }

    pub fn due_label(&self) -> String {
        due_label(self.days_remaining, self.never_completed)
    }
}

/// A never-done chore counts as at least one full cycle late, however long
/// the cycle is.
fn effective_elapsed(days_since_last_done: u32, total_days: u32, never_completed: bool) -> u32 {
    if never_completed {
        days_since_last_done.max(total_days)
    } else {
        days_since_last_done
    }
}
