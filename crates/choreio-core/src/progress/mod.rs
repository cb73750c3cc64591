//! Chore progress engine.
//!
//! Pure functions mapping a chore's frequency, its last completion and the
//! current instant to display data:
//!
//! - [`frequency_to_days`]: cycle length in days
//! - [`days_since`]: raw elapsed days (999 when never completed)
//! - [`color_for`]: five-stop palette color from the elapsed share
//! - [`select_display_mode`]: day squares, single bar, or hybrid
//! - [`ChoreProgress`]: all of the above bundled per chore
//!
//! Nothing here performs I/O or keeps state; "now" is always a parameter.

mod color;
mod display;
mod elapsed;
mod engine;
mod frequency;
mod label;
mod room;

pub use color::{
    color_for, due_state_for, progress_fraction, DueState, PaletteEntry, COLOR_PALETTE,
    NO_CHORES_COLOR,
};
pub use display::{
    segments, select_display_mode, BarSegment, DaySquare, DisplayMode, ProgressSegments,
    FINAL_WEEK_DAYS,
};
pub use elapsed::{clamp_elapsed, days_since, NEVER_COMPLETED_DAYS};
pub use engine::ChoreProgress;
pub use frequency::{frequency_to_days, Frequency, FrequencyUnit, DAYS_PER_MONTH, DAYS_PER_WEEK};
pub use label::due_label;
pub use room::{room_urgency, RoomUrgency};
