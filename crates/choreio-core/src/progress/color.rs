//! Due-state classification and the five-stop color palette.

use serde::{Deserialize, Serialize};

/// Qualitative urgency of a chore, ordered from calm to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueState {
    /// Plenty of time remaining
    Calm,
    /// Still comfortable
    Comfortable,
    /// Getting close
    Attention,
    /// Deadline approaching
    Urgent,
    /// Overdue or about to be
    Critical,
}

/// One stop of the palette: a due state and its inclusive progress bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    pub state: DueState,
    pub color: &'static str,
    pub limit: f64,
}

/// Palette in ascending order of `limit`.
pub const COLOR_PALETTE: [PaletteEntry; 5] = [
    PaletteEntry {
        state: DueState::Calm,
        color: "#10b981",
        limit: 0.65,
    },
    PaletteEntry {
        state: DueState::Comfortable,
        color: "#84cc16",
        limit: 0.80,
    },
    PaletteEntry {
        state: DueState::Attention,
        color: "#eab308",
        limit: 0.90,
    },
    PaletteEntry {
        state: DueState::Urgent,
        color: "#f97316",
        limit: 0.97,
    },
    PaletteEntry {
        state: DueState::Critical,
        color: "#ef4444",
        limit: 1.0,
    },
];

/// Color of a room that has no chores.
pub const NO_CHORES_COLOR: &str = "#6b7280";

impl DueState {
    pub fn color(self) -> &'static str {
        match self {
            DueState::Calm => COLOR_PALETTE[0].color,
            DueState::Comfortable => COLOR_PALETTE[1].color,
            DueState::Attention => COLOR_PALETTE[2].color,
            DueState::Urgent => COLOR_PALETTE[3].color,
            DueState::Critical => COLOR_PALETTE[4].color,
        }
    }
}

/// Elapsed share of the cycle, capped at 1.
///
/// `total_days` is at least 1 for any stored chore; a zero is treated as a
/// fully elapsed cycle rather than dividing by it.
pub fn progress_fraction(days_since: u32, total_days: u32) -> f64 {
    if total_days == 0 {
        return 1.0;
    }
    (f64::from(days_since) / f64::from(total_days)).min(1.0)
}

pub fn due_state_for(progress: f64) -> DueState {
    COLOR_PALETTE
        .iter()
        .find(|entry| progress <= entry.limit)
        .map(|entry| entry.state)
        .unwrap_or(DueState::Critical)
}

/// Palette color for a chore `days_since` days into a `total_days` cycle.
pub fn color_for(days_since: u32, total_days: u32) -> &'static str {
    due_state_for(progress_fraction(days_since, total_days)).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_thresholds() {
        assert_eq!(color_for(0, 10), "#10b981");
        assert_eq!(color_for(6, 10), "#10b981");
        assert_eq!(color_for(7, 10), "#84cc16");
        assert_eq!(color_for(8, 10), "#84cc16");
        assert_eq!(color_for(9, 10), "#eab308");
        assert_eq!(color_for(10, 10), "#ef4444");
    }

    #[test]
    fn urgent_band_sits_between_ninety_and_ninety_seven_percent() {
        assert_eq!(color_for(95, 100), "#f97316");
        assert_eq!(color_for(97, 100), "#f97316");
        assert_eq!(color_for(98, 100), "#ef4444");
    }

    #[test]
    fn overdue_stays_red() {
        assert_eq!(color_for(999, 7), "#ef4444");
        assert_eq!(due_state_for(1.5), DueState::Critical);
    }

    #[test]
    fn palette_is_ascending() {
        for pair in COLOR_PALETTE.windows(2) {
            assert!(pair[0].limit < pair[1].limit);
            assert!(pair[0].state < pair[1].state);
        }
    }
}
