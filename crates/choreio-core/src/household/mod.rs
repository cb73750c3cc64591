//! Household records: users, properties, rooms, chores, completions, invites.
//!
//! These are plain persisted records. Behaviour lives in the progress engine
//! and the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::floorplan::Point;
use crate::progress::{ChoreProgress, FrequencyUnit, RoomUrgency};

/// Account role. Admins may preview other dates and clear chore history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            _ => UserRole::Member,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A house, apartment or building shared by its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    /// Floor plan width / height; unset until a floor plan is saved.
    pub aspect_ratio: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    /// Floor plan polygon in normalized coordinates; empty if not drawn.
    #[serde(default)]
    pub points: Vec<Point>,
    pub created_at: DateTime<Utc>,
}

/// A recurring task in a room, e.g. "Clean mirror" every 1 week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: i64,
    pub room_id: i64,
    pub name: String,
    pub frequency: u32,
    pub frequency_unit: FrequencyUnit,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a chore's append-only completion history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreCompletion {
    pub id: i64,
    pub chore_id: i64,
    pub user_id: String,
    pub completed_at: DateTime<Utc>,
}

/// Pending invitation of an email address to a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    pub token: String,
    pub property_id: i64,
    pub inviting_user_id: String,
    pub invited_email: String,
    pub created_at: DateTime<Utc>,
}

/// A chore together with its progress at a given instant.
#[derive(Debug, Clone, Serialize)]
pub struct ChoreStatus {
    pub chore: Chore,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub progress: ChoreProgress,
    pub due_label: String,
}

impl ChoreStatus {
    pub fn new(
        chore: Chore,
        last_completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        final_week_days: u32,
    ) -> Self {
        let progress = ChoreProgress::for_chore(&chore, last_completed_at, now, final_week_days);
        let due_label = progress.due_label();
        Self {
            chore,
            last_completed_at,
            progress,
            due_label,
        }
    }
}

/// A room with the color of its most urgent chore.
#[derive(Debug, Clone, Serialize)]
pub struct RoomOverview {
    pub room: Room,
    pub urgency: RoomUrgency,
}

/// Trim a user-supplied name and reject it if nothing is left.
pub fn clean_name(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Minimal shape check for invitation addresses.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(ValidationError::InvalidValue {
            field: "email".into(),
            message: "Invalid email address".into(),
        })
    }
}
