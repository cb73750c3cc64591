//! Room-level urgency: a room is as urgent as its most urgent chore.

use serde::Serialize;

use super::color::{DueState, NO_CHORES_COLOR};
use super::engine::ChoreProgress;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomUrgency {
    pub color: &'static str,
    /// `None` when the room has no chores.
    pub due_state: Option<DueState>,
    pub progress_fraction: f64,
    pub chore_count: usize,
}

pub fn room_urgency<'a, I>(progresses: I) -> RoomUrgency
where
    I: IntoIterator<Item = &'a ChoreProgress>,
{
    let mut most_urgent: Option<&ChoreProgress> = None;
    let mut chore_count = 0;

    for progress in progresses {
        chore_count += 1;
        // Ties keep the first chore seen.
        if most_urgent.map_or(true, |m| progress.progress_fraction > m.progress_fraction) {
            most_urgent = Some(progress);
        }
    }

    match most_urgent {
        Some(p) => RoomUrgency {
            color: p.color,
            due_state: Some(p.due_state),
            progress_fraction: p.progress_fraction,
            chore_count,
        },
        None => RoomUrgency {
            color: NO_CHORES_COLOR,
            due_state: None,
            progress_fraction: 0.0,
            chore_count: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::FrequencyUnit;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn empty_room_is_gray() {
        let urgency = room_urgency(std::iter::empty());
        assert_eq!(urgency.color, "#6b7280");
        assert_eq!(urgency.chore_count, 0);
        assert!(urgency.due_state.is_none());
    }

    #[test]
    fn most_urgent_chore_sets_room_color() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let fresh = ChoreProgress::compute(1, FrequencyUnit::Months, Some(now - Duration::days(1)), now);
        let late = ChoreProgress::compute(1, FrequencyUnit::Weeks, Some(now - Duration::days(6)), now);
        let urgency = room_urgency([&fresh, &late]);
        assert_eq!(urgency.chore_count, 2);
        assert_eq!(urgency.color, late.color);
        assert_eq!(urgency.due_state, Some(DueState::Attention));
    }
}
