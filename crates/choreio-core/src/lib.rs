//! # Chore.io Core Library
//!
//! Core logic for Chore.io, a shared-household chore tracker. Each chore
//! repeats on a frequency; its progress toward being due drives a color and
//! a progress display. The CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Progress engine**: pure functions from (frequency, last completion, now)
//!   to a [`ChoreProgress`] snapshot. No I/O, no clock reads.
//! - **Household**: users, properties, rooms, chores, completions and invites
//! - **Floor plan**: normalized room polygons with grid and angle snapping
//! - **Storage**: SQLite persistence with access checks, TOML configuration
//! - **Mail**: invitation emails through the Resend API
//!
//! ## Key Components
//!
//! - [`ChoreProgress`]: the per-chore progress snapshot
//! - [`ChoreDb`]: household persistence and views
//! - [`Clock`]: the instant progress is computed for
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod floorplan;
pub mod household;
pub mod mail;
pub mod progress;
pub mod storage;

pub use clock::{parse_debug_date, Clock};
pub use error::{AccessError, ConfigError, CoreError, DatabaseError, MailError, ValidationError};
pub use floorplan::{Point, PolygonEditor, PropertyFloorplan, RoomShape, SnappingConfig};
pub use household::{
    Chore, ChoreCompletion, ChoreStatus, Invite, Property, Room, RoomOverview, User, UserRole,
};
pub use mail::{InviteEmail, ResendMailer};
pub use progress::{ChoreProgress, DisplayMode, DueState, Frequency, FrequencyUnit, RoomUrgency};
pub use storage::{ChoreDb, Config};
