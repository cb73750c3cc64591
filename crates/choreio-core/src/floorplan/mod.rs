//! Floor plan geometry.
//!
//! All coordinates are normalized to the unit square so a plan renders at
//! any resolution: `x` runs left to right, `y` top to bottom. A room is a
//! closed polygon of at least three points; the last point implicitly
//! connects back to the first.

mod editor;
mod snapping;

pub use editor::{DrawOutcome, PolygonEditor};
pub use snapping::{apply_snapping, snap_to_angle, snap_to_grid, SnappingConfig};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum number of vertices of a room polygon.
pub const MIN_ROOM_POINTS: usize = 3;

/// Aspect ratio shown for a property whose plan was never saved.
pub const DEFAULT_ASPECT_RATIO: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Clamp both coordinates into `[0, 1]`.
    pub fn clamped(self) -> Point {
        Point::new(self.x.clamp(0.0, 1.0), self.y.clamp(0.0, 1.0))
    }
}

/// A room outline as drawn on the floor plan.
///
/// `id` is the stored room id, or any non-numeric placeholder for a room
/// drawn in this session and not yet saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomShape {
    pub id: String,
    pub name: String,
    pub points: Vec<Point>,
}

impl RoomShape {
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// # Errors
    /// Returns the first structural problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::Empty("room id".into()));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("room name".into()));
        }
        if self.points.len() < MIN_ROOM_POINTS {
            return Err(ValidationError::InvalidValue {
                field: format!("room '{}' points", self.name),
                message: format!("a room must have at least {MIN_ROOM_POINTS} points"),
            });
        }
        if let Some(index) = self.points.iter().position(|p| !p.is_valid()) {
            return Err(ValidationError::InvalidValue {
                field: format!("room '{}' point {index}", self.name),
                message: "coordinates must lie within 0..=1".into(),
            });
        }
        Ok(())
    }

    /// Stored room id, if this shape refers to a saved room.
    pub fn stored_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

/// Complete floor plan of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFloorplan {
    pub rooms: Vec<RoomShape>,
    /// Width / height.
    pub aspect_ratio: f64,
}

impl PropertyFloorplan {
    /// # Errors
    /// Returns an error for a non-positive aspect ratio or any invalid room.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.aspect_ratio > 0.0) || !self.aspect_ratio.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "aspect_ratio".into(),
                message: "must be a positive number".into(),
            });
        }
        self.rooms.iter().try_for_each(RoomShape::validate)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![Point::new(0.1, 0.1), Point::new(0.5, 0.1), Point::new(0.3, 0.4)]
    }

    #[test]
    fn point_bounds_are_inclusive() {
        assert!(Point::new(0.0, 1.0).is_valid());
        assert!(!Point::new(-0.01, 0.5).is_valid());
        assert!(!Point::new(0.5, 1.2).is_valid());
    }

    #[test]
    fn room_needs_three_valid_points() {
        let mut room = RoomShape {
            id: "4".into(),
            name: "Kitchen".into(),
            points: triangle(),
        };
        assert!(room.is_valid());
        room.points.pop();
        assert!(!room.is_valid());
        room.points = triangle();
        room.points[1] = Point::new(1.5, 0.0);
        assert!(!room.is_valid());
    }

    #[test]
    fn unsaved_rooms_have_no_stored_id() {
        let room = RoomShape {
            id: "new-1".into(),
            name: "Hall".into(),
            points: triangle(),
        };
        assert_eq!(room.stored_id(), None);
        let saved = RoomShape {
            id: "12".into(),
            ..room
        };
        assert_eq!(saved.stored_id(), Some(12));
    }

    #[test]
    fn floorplan_rejects_bad_aspect_ratio() {
        let plan = PropertyFloorplan {
            rooms: vec![],
            aspect_ratio: 0.0,
        };
        assert!(!plan.is_valid());
        let plan = PropertyFloorplan {
            rooms: vec![],
            aspect_ratio: 1.5,
        };
        assert!(plan.is_valid());
    }

    #[test]
    fn floorplan_json_is_camel_case() {
        let plan: PropertyFloorplan = serde_json::from_str(
            r#"{"aspectRatio":1.0,"rooms":[{"id":"a","name":"Bath","points":[{"x":0,"y":0},{"x":1,"y":0},{"x":1,"y":1}]}]}"#,
        )
        .unwrap();
        assert_eq!(plan.rooms[0].points.len(), 3);
        assert!(plan.is_valid());
    }
}
